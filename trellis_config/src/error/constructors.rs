//! Convenience constructors keeping call sites terse.

use std::sync::Arc;

use crate::adapter::{AdapterError, Direction};
use crate::path::KeyPath;

use super::TrellisError;

impl TrellisError {
    /// Wraps the error in an [`Arc`] for the crate-wide result alias.
    #[must_use]
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Builds a [`TrellisError::Schema`] from a plain message.
    pub(crate) fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }

    /// Schema error raised when two fields compute the same path.
    pub(crate) fn duplicate_path(path: &KeyPath) -> Self {
        Self::schema(format!("duplicate path '{path}' declared by two fields"))
    }

    /// Classifies an adapter failure raised while reading a field.
    pub(crate) fn reading(path: &KeyPath, source: AdapterError) -> Self {
        match source {
            AdapterError::NotFound { .. } => Self::AdapterNotFound {
                path: path.to_string(),
                source,
            },
            _ => Self::Deserialization {
                path: path.to_string(),
                source,
            },
        }
    }

    /// Classifies an adapter failure raised while writing a field.
    pub(crate) fn writing(path: &KeyPath, source: AdapterError) -> Self {
        match source {
            AdapterError::NotFound { .. } => Self::AdapterNotFound {
                path: path.to_string(),
                source,
            },
            _ => Self::Serialization {
                path: path.to_string(),
                source,
            },
        }
    }

    /// Error for a `get` that found no value and no declared default.
    pub(crate) fn missing(path: &KeyPath) -> Self {
        Self::Deserialization {
            path: path.to_string(),
            source: AdapterError::Deserialize {
                type_name: "value",
                found: "nothing",
                message: String::from("no raw value present and no default declared"),
            },
        }
    }

    /// Error for a typed access that disagrees with the declared field type.
    pub(crate) fn declared_type_mismatch(path: &KeyPath, requested: &'static str) -> Self {
        Self::Deserialization {
            path: path.to_string(),
            source: AdapterError::Deserialize {
                type_name: requested,
                found: "a field declared with a different type",
                message: String::from("requested type does not match the schema declaration"),
            },
        }
    }

    /// Builds a [`TrellisError::Parse`] from any format-reader error.
    pub fn parse(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Parse {
            source: source.into(),
        }
    }

    /// Builds a [`TrellisError::Write`] from any format-writer error.
    pub fn write(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Write {
            source: source.into(),
        }
    }

    /// True when this error is an adapter-resolution failure.
    #[must_use]
    pub fn is_adapter_not_found(&self) -> bool {
        matches!(self, Self::AdapterNotFound { .. })
    }

    /// Direction of the failed adapter lookup, when applicable.
    #[must_use]
    pub fn adapter_direction(&self) -> Option<Direction> {
        match self {
            Self::AdapterNotFound {
                source: AdapterError::NotFound { direction, .. },
                ..
            } => Some(*direction),
            _ => None,
        }
    }
}
