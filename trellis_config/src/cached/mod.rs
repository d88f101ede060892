//! The runtime, expiry-aware holder of a field's last-read typed value.
//!
//! A cached value is a derived projection of the section tree, never the
//! source of truth. Its internal state is locked per entry so concurrent
//! access to unrelated fields is never serialized.

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::{Mutex, RwLock};
use tracing::trace;

use crate::adapter::AdapterRegistry;
use crate::error::{TrellisError, TrellisResult};
use crate::manifest::{ConfigType, ValueManifest};
use crate::options::CacheExpiry;
use crate::path::KeyPath;
use crate::section::Section;

/// Why a cached value needs a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Staleness {
    NeverParsed,
    Expired,
}

impl Staleness {
    fn reason(self) -> &'static str {
        match self {
            Self::NeverParsed => "never parsed",
            Self::Expired => "expiry elapsed",
        }
    }
}

struct CacheState<T> {
    value: Option<T>,
    parsed_at: Option<Instant>,
}

impl<T> CacheState<T> {
    fn staleness(&self, expiry: CacheExpiry) -> Option<Staleness> {
        match self.parsed_at {
            None => Some(Staleness::NeverParsed),
            Some(parsed_at) => expiry.is_stale(parsed_at).then_some(Staleness::Expired),
        }
    }
}

/// Runtime cache wrapping one field's [`ValueManifest`].
///
/// Mutated only by read/write operations on that one field; never shared
/// across fields.
pub struct CachedValue<T> {
    manifest: Arc<ValueManifest<T>>,
    state: Mutex<CacheState<T>>,
}

impl<T: ConfigType> CachedValue<T> {
    pub(crate) fn new(manifest: Arc<ValueManifest<T>>) -> Self {
        Self {
            manifest,
            state: Mutex::new(CacheState {
                value: None,
                parsed_at: None,
            }),
        }
    }

    /// The manifest this cache was instantiated from.
    #[must_use]
    pub fn manifest(&self) -> &ValueManifest<T> {
        &self.manifest
    }

    /// Clone of the currently cached value, ignoring expiry.
    #[must_use]
    pub fn cached(&self) -> Option<T> {
        self.state.lock().value.clone()
    }

    /// True when the value has never been parsed or the expiry policy says
    /// it is stale. Advisory: callers trigger the re-parse on access.
    #[must_use]
    pub fn is_expired(&self, expiry: CacheExpiry) -> bool {
        self.state.lock().staleness(expiry).is_some()
    }

    /// Read protocol: cached value when fresh, else re-fetch from the tree,
    /// deserialize, and cache.
    ///
    /// Absent raw data yields the manifest's default (cached) or `None`;
    /// malformed raw data is an error, never a default.
    pub(crate) fn read(
        &self,
        tree: &RwLock<Section>,
        registry: &AdapterRegistry,
        expiry: CacheExpiry,
    ) -> TrellisResult<Option<T>> {
        let mut state = self.state.lock();
        let Some(staleness) = state.staleness(expiry) else {
            return Ok(state.value.clone());
        };
        trace!(
            path = %self.manifest.path(),
            reason = staleness.reason(),
            "refreshing cached value"
        );
        let raw = {
            let guard = tree.read();
            guard.get(self.manifest.path())?.cloned()
        };
        match raw {
            None => {
                let default = self.manifest.default_value();
                state.value = default.clone();
                state.parsed_at = Some(Instant::now());
                Ok(default)
            }
            Some(raw) => {
                let parsed = self
                    .manifest
                    .deserialize(registry, &raw)
                    .map_err(|err| TrellisError::reading(self.manifest.path(), err).shared())?;
                state.value = Some(parsed.clone());
                state.parsed_at = Some(Instant::now());
                Ok(Some(parsed))
            }
        }
    }

    /// Write protocol: serialize, store into the tree, then update the
    /// cache in place so a read before expiry sees the written value.
    pub(crate) fn write(
        &self,
        tree: &RwLock<Section>,
        registry: &AdapterRegistry,
        value: T,
    ) -> TrellisResult<()> {
        let raw = self
            .manifest
            .serialize(registry, &value)
            .map_err(|err| TrellisError::writing(self.manifest.path(), err).shared())?;
        let mut state = self.state.lock();
        tree.write().set(self.manifest.path(), raw)?;
        state.value = Some(value);
        state.parsed_at = Some(Instant::now());
        Ok(())
    }

    fn clear(&self) {
        let mut state = self.state.lock();
        state.value = None;
        state.parsed_at = None;
    }
}

impl<T: ConfigType> fmt::Debug for CachedValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("CachedValue")
            .field("path", self.manifest.path())
            .field("populated", &state.value.is_some())
            .field("parsed_at", &state.parsed_at)
            .finish()
    }
}

/// Object-safe view of a cached value, letting the holder's map store
/// heterogeneous field types.
pub(crate) trait CacheEntry: Send + Sync {
    fn path(&self) -> &KeyPath;
    fn invalidate(&self);
    fn persist_default(
        &self,
        tree: &mut Section,
        registry: &AdapterRegistry,
    ) -> TrellisResult<()>;
    fn as_any(&self) -> &dyn Any;
}

impl<T: ConfigType> CacheEntry for CachedValue<T> {
    fn path(&self) -> &KeyPath {
        self.manifest.path()
    }

    fn invalidate(&self) {
        self.clear();
    }

    fn persist_default(
        &self,
        tree: &mut Section,
        registry: &AdapterRegistry,
    ) -> TrellisResult<()> {
        if tree.get(self.manifest.path())?.is_some() {
            return Ok(());
        }
        let Some(default) = self.manifest.default_value() else {
            return Ok(());
        };
        let raw = self
            .manifest
            .serialize(registry, &default)
            .map_err(|err| TrellisError::writing(self.manifest.path(), err).shared())?;
        tree.set(self.manifest.path(), raw)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests;
