//! Primary error enum for binding and document flows.

use thiserror::Error;

use crate::adapter::AdapterError;

/// Errors that can occur while binding a schema to a document tree.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TrellisError {
    /// Duplicate path or malformed field/group declaration.
    ///
    /// Fatal at startup: discovery aborts before any document I/O.
    #[error("invalid schema: {message}")]
    Schema {
        /// Human-readable explanation of the declaration failure.
        message: String,
    },

    /// No serializer or deserializer is resolvable for a declared type.
    ///
    /// Raised on the first access of the affected field, not at startup,
    /// so partially-adapted schemas can still serve other fields.
    #[error("no adapter resolvable for '{path}': {source}")]
    AdapterNotFound {
        /// Path of the field whose adapter lookup failed.
        path: String,
        /// Underlying registry failure naming the type.
        #[source]
        source: AdapterError,
    },

    /// A raw document value did not match the field's declared type.
    ///
    /// Never silently replaced by a default; defaults apply only to
    /// genuinely absent data.
    #[error("cannot read '{path}': {source}")]
    Deserialization {
        /// Path of the field whose raw value was malformed.
        path: String,
        /// Underlying adapter failure describing the shape mismatch.
        #[source]
        source: AdapterError,
    },

    /// A typed value could not be converted to a raw document value.
    #[error("cannot write '{path}': {source}")]
    Serialization {
        /// Path of the field being written.
        path: String,
        /// Underlying adapter failure carrying the offending value.
        #[source]
        source: AdapterError,
    },

    /// Path traversal hit a scalar where a section was expected, or the
    /// reverse.
    #[error("structural mismatch at '{path}': segment '{segment}' is {found}, expected a section")]
    StructuralMismatch {
        /// Full path the operation was addressing.
        path: String,
        /// Segment at which traversal stopped.
        segment: String,
        /// Kind of value actually found at that segment.
        found: &'static str,
    },

    /// The document source failed to produce a parsed tree.
    #[error("failed to parse document: {source}")]
    Parse {
        /// Error reported by the format reader.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The document source failed to persist the section tree.
    #[error("failed to write document: {source}")]
    Write {
        /// Error reported by the format writer.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
