//! Error types produced by the binding engine.

mod constructors;
mod conversions;
mod types;

pub use types::TrellisError;

use std::sync::Arc;

/// Result alias used across the crate.
///
/// Errors are wrapped in [`Arc`] so cached read paths and multi-consumer
/// call sites can clone failures cheaply.
pub type TrellisResult<T> = Result<T, Arc<TrellisError>>;
