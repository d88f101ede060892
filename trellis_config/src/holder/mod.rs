//! Top-level coordinator binding a schema to a document source.

mod builder;
mod handle;

pub use builder::HolderBuilder;
pub use handle::FieldHandle;

use std::any::type_name;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::debug;

use crate::adapter::AdapterRegistry;
use crate::cached::{CacheEntry, CachedValue};
use crate::comment::CommentStore;
use crate::error::{TrellisError, TrellisResult};
use crate::manifest::ConfigType;
use crate::options::HolderOptions;
use crate::path::KeyPath;
use crate::section::Section;
use crate::source::Source;

/// Owns the section tree, adapter registry, option set, and the map of
/// cached values discovered from the schema.
///
/// Reads may happen from multiple threads; `reload` and `set` are
/// serialized against them by the tree lock, so a reader observes either
/// the fully-old or the fully-new document, never a partial one. The
/// path-to-cache map is populated once at construction and never resized,
/// and each cached value locks its own state, so unrelated fields never
/// contend.
///
/// # Examples
///
/// ```rust
/// use trellis_config::{ConfigHolder, Field, MemorySource, Schema};
///
/// # fn main() -> trellis_config::TrellisResult<()> {
/// let schema = Schema::builder()
///     .group("database", |g| g.field(Field::<u16>::new("port").default(5432)))
///     .build();
/// let holder = ConfigHolder::builder(MemorySource::empty())
///     .schema(schema)
///     .build()?;
/// assert_eq!(holder.get::<u16>("database.port")?, Some(5432));
/// holder.set("database.port", 9000_u16)?;
/// assert_eq!(holder.get::<u16>("database.port")?, Some(9000));
/// # Ok(())
/// # }
/// ```
pub struct ConfigHolder<S: Source> {
    source: S,
    tree: RwLock<Section>,
    registry: RwLock<AdapterRegistry>,
    options: HolderOptions,
    entries: IndexMap<KeyPath, Arc<dyn CacheEntry>>,
    comments: RwLock<CommentStore>,
}

impl<S: Source> ConfigHolder<S> {
    /// Starts building a holder around `source`.
    #[must_use]
    pub fn builder(source: S) -> HolderBuilder<S> {
        HolderBuilder::new(source)
    }

    pub(crate) fn from_parts(
        source: S,
        tree: Section,
        registry: AdapterRegistry,
        options: HolderOptions,
        entries: IndexMap<KeyPath, Arc<dyn CacheEntry>>,
        comments: CommentStore,
    ) -> Self {
        Self {
            source,
            tree: RwLock::new(tree),
            registry: RwLock::new(registry),
            options,
            entries,
            comments: RwLock::new(comments),
        }
    }

    /// Reads the value at a dotted path.
    ///
    /// Declared fields go through their cached value (expiry-aware,
    /// default-supplying). Undeclared paths are fetched from the tree and
    /// deserialized ad hoc, uncached.
    ///
    /// # Errors
    ///
    /// Propagates adapter-resolution, deserialization, and
    /// structural-mismatch failures; malformed data never falls back to a
    /// default.
    pub fn get<T: ConfigType>(&self, path: &str) -> TrellisResult<Option<T>> {
        self.get_at(&KeyPath::parse(path)?)
    }

    /// Like [`get`](Self::get), but absent data with no declared default is
    /// an error instead of `None`.
    ///
    /// # Errors
    ///
    /// Everything [`get`](Self::get) raises, plus a deserialization error
    /// when the field is genuinely absent.
    pub fn get_or_default<T: ConfigType>(&self, path: &str) -> TrellisResult<T> {
        let path = KeyPath::parse(path)?;
        self.get_at(&path)?
            .ok_or_else(|| TrellisError::missing(&path).shared())
    }

    /// Writes a value at a dotted path: serialize, store into the tree,
    /// then update the field's cache in place.
    ///
    /// # Errors
    ///
    /// Propagates adapter-resolution, serialization, and
    /// structural-mismatch failures.
    pub fn set<T: ConfigType>(&self, path: &str, value: T) -> TrellisResult<()> {
        self.set_at(&KeyPath::parse(path)?, value)
    }

    /// Discards the section tree and every cached value, then re-parses
    /// the source.
    ///
    /// # Errors
    ///
    /// Propagates the source's parse failure; the previous tree is kept
    /// when the re-parse fails.
    pub fn reload(&self) -> TrellisResult<()> {
        debug!("reloading document from source");
        let mut fresh = self.source.read_raw()?;
        if self.options.defaults_persisted() {
            self.persist_defaults_into(&mut fresh)?;
        }
        *self.tree.write() = fresh;
        self.invalidate_all();
        Ok(())
    }

    /// Serializes the current section tree back through the source,
    /// reattaching header comments from the holder's metadata store.
    ///
    /// # Errors
    ///
    /// Propagates the source's write failure.
    pub fn save(&self) -> TrellisResult<()> {
        let tree = self.tree.read().clone();
        let comments = self.comments.read().clone();
        debug!(
            entries = tree.len(),
            comments = comments.len(),
            "saving document"
        );
        self.source.write_raw(&tree, &comments)
    }

    /// Clears every cached value without touching the tree.
    pub fn invalidate_all(&self) {
        for entry in self.entries.values() {
            entry.invalidate();
        }
    }

    /// Runs a closure with mutable access to the adapter registry.
    ///
    /// Registering an adapter here makes previously failing fields of that
    /// type readable from the next access on.
    pub fn update_registry(&self, configure: impl FnOnce(&mut AdapterRegistry)) {
        configure(&mut self.registry.write());
    }

    /// Replaces the header comments stored for a path.
    ///
    /// # Errors
    ///
    /// Fails only when the path itself is malformed.
    pub fn set_comments<I, L>(&self, path: &str, lines: I) -> TrellisResult<()>
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        let path = KeyPath::parse(path)?;
        self.comments.write().set(path, lines);
        Ok(())
    }

    /// Header comments registered for a path.
    #[must_use]
    pub fn comments_for(&self, path: &KeyPath) -> Option<Vec<String>> {
        self.comments.read().get(path).map(<[String]>::to_vec)
    }

    /// Snapshot of the current section tree.
    #[must_use]
    pub fn root(&self) -> Section {
        self.tree.read().clone()
    }

    /// True when any raw value exists at the path.
    ///
    /// # Errors
    ///
    /// Propagates structural-mismatch failures from traversal.
    pub fn contains(&self, path: &str) -> TrellisResult<bool> {
        let path = KeyPath::parse(path)?;
        Ok(self.tree.read().get(&path)?.is_some())
    }

    /// Declared field paths, in declaration order.
    pub fn paths(&self) -> impl Iterator<Item = &KeyPath> {
        self.entries.keys()
    }

    /// The holder's option set.
    #[must_use]
    pub fn options(&self) -> &HolderOptions {
        &self.options
    }

    /// The document source this holder owns.
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Typed handle for a declared field, validating path and type once.
    ///
    /// # Errors
    ///
    /// Fails when no field is declared at the path or the declared type is
    /// not `T`.
    pub fn handle<T: ConfigType>(&self, path: &str) -> TrellisResult<FieldHandle<T>> {
        let path = KeyPath::parse(path)?;
        let entry = self.entries.get(&path).ok_or_else(|| {
            TrellisError::schema(format!("no field declared at '{path}'")).shared()
        })?;
        if entry.as_any().downcast_ref::<CachedValue<T>>().is_none() {
            return Err(TrellisError::declared_type_mismatch(&path, type_name::<T>()).shared());
        }
        Ok(FieldHandle::new(path))
    }

    pub(crate) fn get_at<T: ConfigType>(&self, path: &KeyPath) -> TrellisResult<Option<T>> {
        match self.entries.get(path) {
            Some(entry) => {
                let cached = entry
                    .as_any()
                    .downcast_ref::<CachedValue<T>>()
                    .ok_or_else(|| {
                        TrellisError::declared_type_mismatch(path, type_name::<T>()).shared()
                    })?;
                let registry = self.registry.read();
                cached.read(&self.tree, &registry, self.options.expiry())
            }
            None => {
                let raw = {
                    let guard = self.tree.read();
                    guard.get(path)?.cloned()
                };
                match raw {
                    None => Ok(None),
                    Some(raw) => {
                        let registry = self.registry.read();
                        registry
                            .deserialize::<T>(&raw)
                            .map(Some)
                            .map_err(|err| TrellisError::reading(path, err).shared())
                    }
                }
            }
        }
    }

    pub(crate) fn set_at<T: ConfigType>(&self, path: &KeyPath, value: T) -> TrellisResult<()> {
        match self.entries.get(path) {
            Some(entry) => {
                let cached = entry
                    .as_any()
                    .downcast_ref::<CachedValue<T>>()
                    .ok_or_else(|| {
                        TrellisError::declared_type_mismatch(path, type_name::<T>()).shared()
                    })?;
                let registry = self.registry.read();
                cached.write(&self.tree, &registry, value)
            }
            None => {
                let raw = {
                    let registry = self.registry.read();
                    registry
                        .serialize(&value)
                        .map_err(|err| TrellisError::writing(path, err).shared())?
                };
                self.tree.write().set(path, raw)
            }
        }
    }

    pub(crate) fn persist_defaults_into(&self, tree: &mut Section) -> TrellisResult<()> {
        let registry = self.registry.read();
        for entry in self.entries.values() {
            entry.persist_default(tree, &registry)?;
        }
        Ok(())
    }
}

impl<S: Source> std::fmt::Debug for ConfigHolder<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigHolder")
            .field("fields", &self.entries.len())
            .field("options", &self.options)
            .finish()
    }
}

#[cfg(test)]
mod tests;
