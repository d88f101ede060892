//! Extensions for mapping external errors into `TrellisResult` concisely.
//!
//! Reduces repetitive `.map_err(|e| TrellisError::from(e).shared())`
//! chains when converting format-reader errors into the crate's
//! `TrellisResult<T>` alias (`Result<T, Arc<TrellisError>>`).

use std::sync::Arc;

use crate::error::{TrellisError, TrellisResult};

/// Generic extension for mapping any `Result<T, E>` with
/// `E: Into<TrellisError>` into a `TrellisResult<T>`.
pub trait TrellisResultExt<T, E> {
    /// Convert `Result<T, E>` into `TrellisResult<T>` using
    /// `Into<TrellisError>`.
    ///
    /// # Errors
    ///
    /// Propagates the original error after conversion into
    /// `Arc<TrellisError>`.
    fn into_trellis(self) -> TrellisResult<T>;
}

impl<T, E> TrellisResultExt<T, E> for Result<T, E>
where
    E: Into<TrellisError>,
{
    fn into_trellis(self) -> TrellisResult<T> {
        self.map_err(|err| Arc::new(err.into()))
    }
}
