//! Builder wiring a schema, registry, options, and source into a holder.

use indexmap::IndexMap;

use crate::adapter::AdapterRegistry;
use crate::comment::CommentStore;
use crate::error::TrellisResult;
use crate::options::HolderOptions;
use crate::schema::{Schema, discover};
use crate::source::Source;

use super::ConfigHolder;

/// Builder for [`ConfigHolder`].
///
/// Discovery runs first and fails fast on an invalid schema; the source is
/// only read once the schema is known to be sound.
#[must_use]
pub struct HolderBuilder<S: Source> {
    source: S,
    schema: Schema,
    registry: AdapterRegistry,
    options: HolderOptions,
    comments: CommentStore,
}

impl<S: Source> HolderBuilder<S> {
    pub(crate) fn new(source: S) -> Self {
        Self {
            source,
            schema: Schema::default(),
            registry: AdapterRegistry::new(),
            options: HolderOptions::default(),
            comments: CommentStore::new(),
        }
    }

    /// Sets the declarative schema to discover fields from.
    pub fn schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }

    /// Replaces the adapter registry (defaults to the built-in scalars).
    pub fn registry(mut self, registry: AdapterRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Sets the holder's option set.
    pub fn options(mut self, options: HolderOptions) -> Self {
        self.options = options;
        self
    }

    /// Seeds the comment store with application-provided entries; comments
    /// declared on schema fields and groups are merged on top.
    pub fn comments(mut self, comments: CommentStore) -> Self {
        self.comments = comments;
        self
    }

    /// Discovers the schema, performs the initial parse, and assembles the
    /// holder.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::Schema`](crate::TrellisError::Schema) on
    /// duplicate or malformed paths (before any I/O), or the source's
    /// parse failure from the initial load.
    pub fn build(self) -> TrellisResult<ConfigHolder<S>> {
        let discovery = discover(&self.schema)?;

        let mut comments = self.comments;
        for (path, lines) in discovery.comments {
            comments.set(path, lines);
        }

        let mut entries = IndexMap::with_capacity(discovery.entries.len());
        for (path, entry) in discovery.entries {
            entries.insert(path, entry);
        }

        let tree = self.source.read_raw()?;
        let holder = ConfigHolder::from_parts(
            self.source,
            tree,
            self.registry,
            self.options,
            entries,
            comments,
        );
        if holder.options().defaults_persisted() {
            let mut tree = holder.root();
            holder.persist_defaults_into(&mut tree)?;
            *holder.tree.write() = tree;
        }
        Ok(holder)
    }
}
