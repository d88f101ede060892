//! Built-in adapters for the common scalar types.
//!
//! Numbers deserialize from integer raw values with range checks; floats
//! additionally accept integers. Strings accept any non-null scalar, the
//! usual leniency of hand-edited documents. Malformed shapes always error —
//! coercion never falls back to a default.

use crate::value::Value;

use super::{AdapterError, AdapterRegistry};

pub(super) fn install(registry: &mut AdapterRegistry) {
    registry.register::<bool, _, _>(
        |_, value| Ok(Value::Bool(*value)),
        |_, raw| match raw {
            Value::Bool(value) => Ok(*value),
            other => Err(AdapterError::wrong_shape::<bool>(other, "expected a boolean")),
        },
    );

    registry.register::<i64, _, _>(
        |_, value| Ok(Value::Int(*value)),
        |_, raw| match raw {
            Value::Int(value) => Ok(*value),
            other => Err(AdapterError::wrong_shape::<i64>(other, "expected an integer")),
        },
    );

    register_narrow_int::<i32>(registry);
    register_narrow_int::<u16>(registry);
    register_narrow_int::<u32>(registry);
    register_narrow_int::<u64>(registry);

    registry.register::<f64, _, _>(
        |_, value| Ok(Value::Float(*value)),
        |_, raw| {
            raw.as_float()
                .ok_or_else(|| AdapterError::wrong_shape::<f64>(raw, "expected a number"))
        },
    );

    registry.register::<String, _, _>(
        |_, value| Ok(Value::Str(value.clone())),
        |_, raw| match raw {
            Value::Str(value) => Ok(value.clone()),
            Value::Bool(value) => Ok(value.to_string()),
            Value::Int(value) => Ok(value.to_string()),
            Value::Float(value) => Ok(value.to_string()),
            other => Err(AdapterError::wrong_shape::<String>(other, "expected a scalar")),
        },
    );

    // identity adapter lets a schema declare a field of raw values
    registry.register::<Value, _, _>(|_, value| Ok(value.clone()), |_, raw| Ok(raw.clone()));
}

trait NarrowInt: TryFrom<i64> + TryInto<i64> + Copy + std::fmt::Debug + 'static {}

impl NarrowInt for i32 {}
impl NarrowInt for u16 {}
impl NarrowInt for u32 {}
impl NarrowInt for u64 {}

fn register_narrow_int<T: NarrowInt>(registry: &mut AdapterRegistry) {
    registry.register::<T, _, _>(
        |_, value| {
            (*value)
                .try_into()
                .map(Value::Int)
                .map_err(|_| AdapterError::cannot_serialize(value, "outside the document integer range"))
        },
        |_, raw| match raw {
            Value::Int(value) => T::try_from(*value).map_err(|_| {
                AdapterError::wrong_shape::<T>(raw, format!("{value} is out of range"))
            }),
            other => Err(AdapterError::wrong_shape::<T>(other, "expected an integer")),
        },
    );
}
