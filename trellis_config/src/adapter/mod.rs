//! Adapters converting between declared types and raw document values.
//!
//! An adapter is a pair of pure functions: a serializer turning a typed
//! value into a [`Value`], and a deserializer doing the reverse. Both
//! receive the [`AdapterRegistry`] they were resolved from so composite
//! adapters (sequence-of-T, map-of-T) can resolve their element adapters
//! recursively.

mod builtin;
mod composite;
mod registry;

pub use composite::{NamedVariants, register_enum_strings, register_map_of, register_sequence_of};
pub use registry::AdapterRegistry;

use std::any::type_name;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::value::Value;

/// Serializer signature stored for a declared type `T`.
pub type SerializeFn<T> =
    Arc<dyn Fn(&AdapterRegistry, &T) -> Result<Value, AdapterError> + Send + Sync>;

/// Deserializer signature stored for a declared type `T`.
pub type DeserializeFn<T> =
    Arc<dyn Fn(&AdapterRegistry, &Value) -> Result<T, AdapterError> + Send + Sync>;

/// Which half of an adapter pair a lookup was after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Typed value to raw document value.
    Serializer,
    /// Raw document value to typed value.
    Deserializer,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Serializer => f.write_str("serializer"),
            Self::Deserializer => f.write_str("deserializer"),
        }
    }
}

/// Failures raised by adapter resolution and invocation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AdapterError {
    /// No adapter of the requested direction is registered for the type.
    #[error("no {direction} registered for type '{type_name}'")]
    NotFound {
        /// Name of the declared type the lookup was for.
        type_name: &'static str,
        /// Which half of the adapter pair was missing.
        direction: Direction,
    },

    /// A typed value could not be converted to a raw value.
    #[error("cannot serialize {type_name} value `{rendered}`: {message}")]
    Serialize {
        /// Name of the declared type being serialized.
        type_name: &'static str,
        /// Debug rendering of the offending value.
        rendered: String,
        /// Cause of the failure.
        message: String,
    },

    /// A raw value's shape did not match the declared type.
    #[error("cannot deserialize {found} as {type_name}: {message}")]
    Deserialize {
        /// Name of the declared type being produced.
        type_name: &'static str,
        /// Kind of raw value actually found.
        found: &'static str,
        /// Cause of the failure.
        message: String,
    },
}

impl AdapterError {
    /// Shape-mismatch error for a deserializer of `T`.
    #[must_use]
    pub fn wrong_shape<T>(found: &Value, message: impl Into<String>) -> Self {
        Self::Deserialize {
            type_name: type_name::<T>(),
            found: found.kind(),
            message: message.into(),
        }
    }

    /// Serialization failure carrying the offending value's rendering.
    #[must_use]
    pub fn cannot_serialize<T: fmt::Debug>(value: &T, message: impl Into<String>) -> Self {
        Self::Serialize {
            type_name: type_name::<T>(),
            rendered: format!("{value:?}"),
            message: message.into(),
        }
    }
}
