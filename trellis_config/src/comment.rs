//! Header-comment metadata, kept separate from document content.
//!
//! Comments are keyed by path and consulted only at save time; they never
//! affect reads or writes of values, and reloading a document does not
//! touch them.

use indexmap::IndexMap;

use crate::path::KeyPath;

/// Ordered `path -> header lines` store owned by a holder.
#[derive(Debug, Clone, Default)]
pub struct CommentStore {
    entries: IndexMap<KeyPath, Vec<String>>,
}

impl CommentStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the header comments for a path.
    ///
    /// An empty line set removes the entry.
    pub fn set<I, S>(&mut self, path: KeyPath, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        if lines.is_empty() {
            self.entries.shift_remove(&path);
        } else {
            self.entries.insert(path, lines);
        }
    }

    /// Header comments for a path, if any were registered.
    #[must_use]
    pub fn get(&self, path: &KeyPath) -> Option<&[String]> {
        self.entries.get(path).map(Vec::as_slice)
    }

    /// Ordered iterator over every `(path, lines)` entry.
    pub fn iter(&self) -> impl Iterator<Item = (&KeyPath, &[String])> {
        self.entries
            .iter()
            .map(|(path, lines)| (path, lines.as_slice()))
    }

    /// Number of commented paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no comments are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
