//! Binds a statically declared configuration schema to a dynamically-typed,
//! format-agnostic document tree, keeping the two synchronized across load,
//! access, mutation, and save.
//!
//! The pieces, leaves first: a [`Section`] tree holds one parsed document;
//! an [`AdapterRegistry`] converts between declared types and raw
//! [`Value`]s; a [`Schema`] declares fields and groups, which discovery
//! turns into one [`CachedValue`] per field; and a [`ConfigHolder`] owns
//! all of it plus the pluggable [`Source`] that reads and writes the
//! backing document.
//!
//! # Quick start
//!
//! ```rust
//! use trellis_config::{ConfigHolder, Field, MemorySource, Schema};
//!
//! # fn main() -> trellis_config::TrellisResult<()> {
//! let schema = Schema::builder()
//!     .group("database", |g| {
//!         g.field(Field::<u16>::new("port").default(5432))
//!     })
//!     .build();
//!
//! let holder = ConfigHolder::builder(MemorySource::empty())
//!     .schema(schema)
//!     .build()?;
//!
//! // empty document: the declared default is served and cached
//! assert_eq!(holder.get::<u16>("database.port")?, Some(5432));
//!
//! holder.set("database.port", 9000_u16)?;
//! holder.save()?;
//! holder.reload()?;
//! assert_eq!(holder.get::<u16>("database.port")?, Some(9000));
//! # Ok(())
//! # }
//! ```
//!
//! The section tree is the single source of truth for persisted state;
//! cached values are a derived, invalidatable projection with an advisory
//! expiry policy ([`CacheExpiry`]). Defaults are served only for genuinely
//! absent data — a malformed document value is always an error.

pub mod adapter;
pub mod source;

mod cached;
mod comment;
mod error;
mod holder;
mod manifest;
mod options;
mod path;
mod result_ext;
mod schema;
mod section;
mod value;

pub use adapter::{AdapterError, AdapterRegistry, Direction};
pub use cached::CachedValue;
pub use comment::CommentStore;
pub use error::{TrellisError, TrellisResult};
pub use holder::{ConfigHolder, FieldHandle, HolderBuilder};
pub use manifest::{ConfigType, DefaultSupplier, ValueManifest};
pub use options::{CacheExpiry, HolderOptions};
pub use path::{KeyPath, SEPARATOR};
pub use result_ext::TrellisResultExt;
pub use schema::{Field, GroupBuilder, Schema, SchemaBuilder};
pub use section::Section;
pub use source::{MemorySource, Source};
pub use value::Value;

#[cfg(feature = "serde_json")]
pub use source::JsonSource;
#[cfg(feature = "toml")]
pub use source::TomlSource;
