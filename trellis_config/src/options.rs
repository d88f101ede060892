//! Option set carried by a configuration holder.

use std::time::{Duration, Instant};

/// Staleness policy applied to every cached value of a holder.
///
/// Expiry is advisory: a stale cache is only refreshed when the field is
/// next read, never in the background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheExpiry {
    /// The cache is authoritative until an explicit reload.
    #[default]
    Never,
    /// A cached value is stale once this much time has elapsed since it
    /// was parsed.
    After(Duration),
}

impl CacheExpiry {
    pub(crate) fn is_stale(self, parsed_at: Instant) -> bool {
        match self {
            Self::Never => false,
            Self::After(duration) => parsed_at.elapsed() >= duration,
        }
    }
}

/// Settings applied when constructing a [`ConfigHolder`](crate::ConfigHolder).
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use trellis_config::{CacheExpiry, HolderOptions};
///
/// let options = HolderOptions::new()
///     .cache_expiry(CacheExpiry::After(Duration::from_secs(30)))
///     .persist_defaults(true);
/// assert!(options.defaults_persisted());
/// ```
#[derive(Debug, Clone, Default)]
pub struct HolderOptions {
    expiry: CacheExpiry,
    persist_defaults: bool,
}

impl HolderOptions {
    /// Creates the default option set: no expiry, defaults not persisted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the cache-expiry policy.
    #[must_use]
    pub fn cache_expiry(mut self, expiry: CacheExpiry) -> Self {
        self.expiry = expiry;
        self
    }

    /// When enabled, declared defaults are written into the section tree
    /// for paths absent from the loaded document, so a following save emits
    /// a fully-populated template.
    #[must_use]
    pub fn persist_defaults(mut self, enabled: bool) -> Self {
        self.persist_defaults = enabled;
        self
    }

    /// The configured expiry policy.
    #[must_use]
    pub fn expiry(&self) -> CacheExpiry {
        self.expiry
    }

    /// Whether defaults are flushed into the tree at load time.
    #[must_use]
    pub fn defaults_persisted(&self) -> bool {
        self.persist_defaults
    }
}
