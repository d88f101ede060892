//! In-memory document source.

use parking_lot::Mutex;

use crate::comment::CommentStore;
use crate::error::TrellisResult;
use crate::section::Section;

use super::Source;

/// Source holding its document entirely in memory.
///
/// Useful for tests, ephemeral configuration, and as the seed document of
/// a holder that is later re-pointed at a file-backed source.
#[derive(Debug, Default)]
pub struct MemorySource {
    document: Mutex<Section>,
}

impl MemorySource {
    /// Creates a source with an empty document.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a source seeded with `root`.
    #[must_use]
    pub fn with_root(root: Section) -> Self {
        Self {
            document: Mutex::new(root),
        }
    }

    /// Snapshot of the currently stored document.
    #[must_use]
    pub fn snapshot(&self) -> Section {
        self.document.lock().clone()
    }
}

impl Source for MemorySource {
    fn read_raw(&self) -> TrellisResult<Section> {
        Ok(self.document.lock().clone())
    }

    fn write_raw(&self, tree: &Section, _comments: &CommentStore) -> TrellisResult<()> {
        *self.document.lock() = tree.clone();
        Ok(())
    }
}
