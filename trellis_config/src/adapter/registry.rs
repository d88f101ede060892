//! Registry of (type, serializer, deserializer) entries.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::value::Value;

use super::{AdapterError, Direction, builtin};

type ErasedSerializer =
    Arc<dyn Fn(&AdapterRegistry, &dyn Any) -> Result<Value, AdapterError> + Send + Sync>;
type ErasedDeserializer =
    Arc<dyn Fn(&AdapterRegistry, &Value) -> Result<Box<dyn Any>, AdapterError> + Send + Sync>;

/// Registry resolving serializers and deserializers by declared type.
///
/// Resolution tries the exact registered type; when absent it fails with
/// [`AdapterError::NotFound`] naming the type. Structural shapes (sequences
/// of `T`, string-keyed maps of `T`) are covered by explicit composition —
/// see [`register_sequence_of`](super::register_sequence_of) and
/// [`register_map_of`](super::register_map_of) — rather than runtime
/// introspection.
///
/// # Examples
///
/// ```rust
/// use trellis_config::{AdapterRegistry, Value};
///
/// let registry = AdapterRegistry::new();
/// let raw = registry.serialize(&5432_u16)?;
/// assert_eq!(raw, Value::Int(5432));
/// assert_eq!(registry.deserialize::<u16>(&raw)?, 5432);
/// # Ok::<_, trellis_config::AdapterError>(())
/// ```
pub struct AdapterRegistry {
    serializers: HashMap<TypeId, ErasedSerializer>,
    deserializers: HashMap<TypeId, ErasedDeserializer>,
}

impl AdapterRegistry {
    /// Creates a registry pre-populated with the built-in scalar adapters
    /// (`bool`, the common integer widths, `f64`, `String`, and the
    /// identity adapter for [`Value`] itself).
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::empty();
        builtin::install(&mut registry);
        registry
    }

    /// Creates a registry with no adapters at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            serializers: HashMap::new(),
            deserializers: HashMap::new(),
        }
    }

    /// Registers a serializer for `T`, replacing any previous one.
    pub fn register_serializer<T, F>(&mut self, serializer: F)
    where
        T: 'static,
        F: Fn(&Self, &T) -> Result<Value, AdapterError> + Send + Sync + 'static,
    {
        let erased: ErasedSerializer = Arc::new(move |registry, any| {
            let value = any.downcast_ref::<T>().ok_or_else(token_mismatch::<T>)?;
            serializer(registry, value)
        });
        self.serializers.insert(TypeId::of::<T>(), erased);
    }

    /// Registers a deserializer for `T`, replacing any previous one.
    pub fn register_deserializer<T, F>(&mut self, deserializer: F)
    where
        T: 'static,
        F: Fn(&Self, &Value) -> Result<T, AdapterError> + Send + Sync + 'static,
    {
        let erased: ErasedDeserializer = Arc::new(move |registry, raw| {
            deserializer(registry, raw).map(|value| Box::new(value) as Box<dyn Any>)
        });
        self.deserializers.insert(TypeId::of::<T>(), erased);
    }

    /// Registers both halves of an adapter pair for `T`.
    pub fn register<T, S, D>(&mut self, serializer: S, deserializer: D)
    where
        T: 'static,
        S: Fn(&Self, &T) -> Result<Value, AdapterError> + Send + Sync + 'static,
        D: Fn(&Self, &Value) -> Result<T, AdapterError> + Send + Sync + 'static,
    {
        self.register_serializer::<T, S>(serializer);
        self.register_deserializer::<T, D>(deserializer);
    }

    /// Serializes a typed value through the resolved adapter.
    ///
    /// # Errors
    ///
    /// [`AdapterError::NotFound`] when no serializer is registered for `T`;
    /// otherwise whatever the adapter itself reports.
    pub fn serialize<T: 'static>(&self, value: &T) -> Result<Value, AdapterError> {
        let adapter = self
            .serializers
            .get(&TypeId::of::<T>())
            .ok_or_else(|| AdapterError::NotFound {
                type_name: type_name::<T>(),
                direction: Direction::Serializer,
            })?;
        adapter(self, value as &dyn Any)
    }

    /// Deserializes a raw value through the resolved adapter.
    ///
    /// # Errors
    ///
    /// [`AdapterError::NotFound`] when no deserializer is registered for
    /// `T`; otherwise whatever the adapter itself reports.
    pub fn deserialize<T: 'static>(&self, raw: &Value) -> Result<T, AdapterError> {
        let adapter = self
            .deserializers
            .get(&TypeId::of::<T>())
            .ok_or_else(|| AdapterError::NotFound {
                type_name: type_name::<T>(),
                direction: Direction::Deserializer,
            })?;
        let boxed = adapter(self, raw)?;
        boxed
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|_| token_mismatch::<T>())
    }

    /// True when a serializer is registered for `T`.
    #[must_use]
    pub fn has_serializer<T: 'static>(&self) -> bool {
        self.serializers.contains_key(&TypeId::of::<T>())
    }

    /// True when a deserializer is registered for `T`.
    #[must_use]
    pub fn has_deserializer<T: 'static>(&self) -> bool {
        self.deserializers.contains_key(&TypeId::of::<T>())
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("serializers", &self.serializers.len())
            .field("deserializers", &self.deserializers.len())
            .finish()
    }
}

fn token_mismatch<T>() -> AdapterError {
    AdapterError::Deserialize {
        type_name: type_name::<T>(),
        found: "a mismatched type token",
        message: String::from("registry dispatched an entry registered for another type"),
    }
}
