//! Shared helpers for the workspace's integration tests.
//!
//! Provides an instrumented in-memory document source, a counting adapter
//! type for observing deserializer invocations, and a sample schema used
//! across suites.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use trellis_config::adapter::AdapterError;
use trellis_config::{
    AdapterRegistry, CommentStore, Field, Schema, Section, Source, TrellisResult, Value,
};

/// In-memory source that counts every read and write.
///
/// `write_raw` replaces the stored document, so a following `read_raw`
/// observes what was saved — enough to exercise save/reload round trips
/// without touching the filesystem.
#[derive(Debug, Default)]
pub struct CountingSource {
    document: Mutex<Section>,
    last_comments: Mutex<CommentStore>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl CountingSource {
    /// Creates a source with an empty document.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a source seeded with `root`.
    #[must_use]
    pub fn new(root: Section) -> Self {
        Self {
            document: Mutex::new(root),
            ..Self::default()
        }
    }

    /// Number of `read_raw` calls so far.
    #[must_use]
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of `write_raw` calls so far.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Snapshot of the currently stored document.
    #[must_use]
    pub fn stored(&self) -> Section {
        self.document.lock().clone()
    }

    /// The comment store passed to the most recent `write_raw`.
    #[must_use]
    pub fn last_comments(&self) -> CommentStore {
        self.last_comments.lock().clone()
    }
}

impl Source for CountingSource {
    fn read_raw(&self) -> TrellisResult<Section> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.document.lock().clone())
    }

    fn write_raw(&self, tree: &Section, comments: &CommentStore) -> TrellisResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        *self.document.lock() = tree.clone();
        *self.last_comments.lock() = comments.clone();
        Ok(())
    }
}

/// Integer newtype whose deserializer counts its invocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counted(pub i64);

/// Registers the [`Counted`] adapter pair; `parses` is bumped on every
/// deserializer call, which makes cache hits and misses observable.
pub fn register_counted(registry: &mut AdapterRegistry, parses: Arc<AtomicUsize>) {
    registry.register::<Counted, _, _>(
        |_, value| Ok(Value::Int(value.0)),
        move |_, raw| {
            parses.fetch_add(1, Ordering::SeqCst);
            raw.as_int()
                .map(Counted)
                .ok_or_else(|| AdapterError::wrong_shape::<Counted>(raw, "expected an integer"))
        },
    );
}

/// The `database` schema shared across integration suites: a `port` with a
/// default of 5432 and a `host` without one.
#[must_use]
pub fn database_schema() -> Schema {
    Schema::builder()
        .group("database", |g| {
            g.field(Field::<u16>::new("port").default(5432))
                .field(Field::<String>::new("host"))
        })
        .build()
}
