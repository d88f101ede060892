//! Declarative schema description and discovery.
//!
//! The surrounding application constructs a tree of field and group
//! descriptors — name, declared type, default, path override — and the
//! walker turns it into one manifest and one cached value per field. No
//! runtime reflection is involved.

mod builder;
mod walker;

pub use builder::{Field, GroupBuilder, Schema, SchemaBuilder};

pub(crate) use walker::discover;
