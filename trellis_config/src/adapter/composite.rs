//! Structural adapters built by explicit composition.
//!
//! These cover the closed set of generic shapes the registry resolves
//! without runtime introspection: sequences of `T`, string-keyed maps of
//! `T`, and unit enums represented as strings. Each composite adapter
//! resolves its element adapter through the registry it receives, so
//! registering a better `T` adapter later also upgrades `Vec<T>`.

use std::any::type_name;

use indexmap::IndexMap;

use crate::value::Value;

use super::{AdapterError, AdapterRegistry};

/// Registers an adapter pair for `Vec<T>` composed from `T`'s adapters.
///
/// Element adapters are resolved at call time, not registration time, so
/// the order of registration does not matter.
pub fn register_sequence_of<T>(registry: &mut AdapterRegistry)
where
    T: Send + Sync + 'static,
{
    registry.register::<Vec<T>, _, _>(
        |registry, items: &Vec<T>| {
            items
                .iter()
                .map(|item| registry.serialize::<T>(item))
                .collect::<Result<Vec<Value>, AdapterError>>()
                .map(Value::Sequence)
        },
        |registry, raw| match raw {
            Value::Sequence(items) => items
                .iter()
                .map(|item| registry.deserialize::<T>(item))
                .collect(),
            other => Err(AdapterError::wrong_shape::<Vec<T>>(
                other,
                "expected a sequence",
            )),
        },
    );
}

/// Registers an adapter pair for `IndexMap<String, T>` composed from `T`'s
/// adapters. The map round-trips through a nested section, preserving
/// entry order.
pub fn register_map_of<T>(registry: &mut AdapterRegistry)
where
    T: Send + Sync + 'static,
{
    registry.register::<IndexMap<String, T>, _, _>(
        |registry, entries: &IndexMap<String, T>| {
            let mut section = crate::section::Section::new();
            for (key, item) in entries {
                section.insert(key.clone(), registry.serialize::<T>(item)?);
            }
            Ok(Value::Section(section))
        },
        |registry, raw| match raw {
            Value::Section(section) => section
                .iter()
                .map(|(key, item)| {
                    registry
                        .deserialize::<T>(item)
                        .map(|value| (key.to_owned(), value))
                })
                .collect(),
            other => Err(AdapterError::wrong_shape::<IndexMap<String, T>>(
                other,
                "expected a section",
            )),
        },
    );
}

/// Unit enums that name their variants for string representation.
///
/// The same raw string may deserialize into different enums depending on
/// the declared field type; the declared-type dispatch of the registry is
/// what disambiguates.
pub trait NamedVariants: Copy + PartialEq + Send + Sync + 'static {
    /// Table of `(canonical name, variant)` pairs, in declaration order.
    const VARIANTS: &'static [(&'static str, Self)];
}

/// Registers a string-backed adapter pair for a [`NamedVariants`] enum.
///
/// Deserialization matches names case-insensitively; serialization emits
/// the canonical name from the variants table.
pub fn register_enum_strings<T: NamedVariants>(registry: &mut AdapterRegistry) {
    registry.register::<T, _, _>(
        |_, value| {
            T::VARIANTS
                .iter()
                .find(|(_, variant)| variant == value)
                .map(|(name, _)| Value::Str((*name).into()))
                .ok_or_else(|| AdapterError::Serialize {
                    type_name: type_name::<T>(),
                    rendered: String::from("<unnamed variant>"),
                    message: String::from("variant missing from the VARIANTS table"),
                })
        },
        |_, raw| match raw {
            Value::Str(name) => T::VARIANTS
                .iter()
                .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
                .map(|(_, variant)| *variant)
                .ok_or_else(|| AdapterError::Deserialize {
                    type_name: type_name::<T>(),
                    found: "a string",
                    message: format!("unknown variant '{name}'"),
                }),
            other => Err(AdapterError::wrong_shape::<T>(other, "expected a string")),
        },
    );
}
