//! Per-field metadata fixed at schema discovery.

use std::fmt;
use std::sync::Arc;

use crate::adapter::{AdapterError, AdapterRegistry, DeserializeFn, SerializeFn};
use crate::path::KeyPath;
use crate::value::Value;

/// Bound satisfied by every type a field may declare.
///
/// Blanket-implemented; it only exists to keep signatures readable.
pub trait ConfigType: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> ConfigType for T {}

/// Zero-argument supplier invoked lazily when no raw value is present.
pub type DefaultSupplier<T> = Arc<dyn Fn() -> T + Send + Sync>;

/// Immutable metadata describing one declared field.
///
/// Built by the schema walker; a manifest is shared (not owned) by the
/// field's cached value and never changes after discovery completes.
pub struct ValueManifest<T> {
    path: KeyPath,
    default: Option<DefaultSupplier<T>>,
    serializer: Option<SerializeFn<T>>,
    deserializer: Option<DeserializeFn<T>>,
}

impl<T: ConfigType> ValueManifest<T> {
    pub(crate) fn new(
        path: KeyPath,
        default: Option<DefaultSupplier<T>>,
        serializer: Option<SerializeFn<T>>,
        deserializer: Option<DeserializeFn<T>>,
    ) -> Self {
        Self {
            path,
            default,
            serializer,
            deserializer,
        }
    }

    /// Canonical path of the field within the document.
    #[must_use]
    pub fn path(&self) -> &KeyPath {
        &self.path
    }

    /// True when the field declares a default supplier.
    #[must_use]
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Invokes the default supplier, if any.
    pub(crate) fn default_value(&self) -> Option<T> {
        self.default.as_ref().map(|supplier| supplier())
    }

    /// Serializes through the explicit override when present, else the
    /// registry's type-based resolution.
    pub(crate) fn serialize(
        &self,
        registry: &AdapterRegistry,
        value: &T,
    ) -> Result<Value, AdapterError> {
        match &self.serializer {
            Some(serializer) => serializer(registry, value),
            None => registry.serialize(value),
        }
    }

    /// Deserializes through the explicit override when present, else the
    /// registry's type-based resolution.
    pub(crate) fn deserialize(
        &self,
        registry: &AdapterRegistry,
        raw: &Value,
    ) -> Result<T, AdapterError> {
        match &self.deserializer {
            Some(deserializer) => deserializer(registry, raw),
            None => registry.deserialize(raw),
        }
    }
}

impl<T> fmt::Debug for ValueManifest<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueManifest")
            .field("path", &self.path)
            .field("has_default", &self.default.is_some())
            .field("serializer_override", &self.serializer.is_some())
            .field("deserializer_override", &self.deserializer.is_some())
            .finish()
    }
}
