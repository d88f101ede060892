//! Pluggable document backends.
//!
//! A [`Source`] owns the format-specific reading and writing of one
//! document; the holder owns the source. The core treats every source call
//! as fallible and never retries internally.

mod memory;

#[cfg(feature = "serde_json")]
mod json;
#[cfg(feature = "toml")]
mod toml;

pub use memory::MemorySource;

#[cfg(feature = "serde_json")]
pub use json::JsonSource;
#[cfg(feature = "toml")]
pub use self::toml::TomlSource;

use crate::comment::CommentStore;
use crate::error::TrellisResult;
use crate::section::Section;

/// Format-specific reader/writer for one document.
///
/// Implementations must preserve key order across a round trip: writing a
/// tree and parsing the written form reproduces the same keys in the same
/// order with the same nesting.
pub trait Source: Send + Sync {
    /// Parses the backing form into a fresh section tree.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::Parse`](crate::TrellisError::Parse) when the
    /// backing form cannot be read or parsed.
    fn read_raw(&self) -> TrellisResult<Section>;

    /// Serializes the section tree back to the backing form, attaching
    /// header comments where the format supports them.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::Write`](crate::TrellisError::Write) when the
    /// tree cannot be rendered or persisted.
    fn write_raw(&self, tree: &Section, comments: &CommentStore) -> TrellisResult<()>;
}

impl<S: Source + ?Sized> Source for std::sync::Arc<S> {
    fn read_raw(&self) -> TrellisResult<Section> {
        (**self).read_raw()
    }

    fn write_raw(&self, tree: &Section, comments: &CommentStore) -> TrellisResult<()> {
        (**self).write_raw(tree, comments)
    }
}

impl<S: Source + ?Sized> Source for Box<S> {
    fn read_raw(&self) -> TrellisResult<Section> {
        (**self).read_raw()
    }

    fn write_raw(&self, tree: &Section, comments: &CommentStore) -> TrellisResult<()> {
        (**self).write_raw(tree, comments)
    }
}
