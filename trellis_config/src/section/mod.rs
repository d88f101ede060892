//! One level of a parsed, format-agnostic document tree.
//!
//! A [`Section`] is an ordered mapping from segment name to either a raw
//! value or a nested section. Insertion order is preserved and determines
//! save-output ordering. The section tree is the single source of truth for
//! persisted state; cached values are a derived projection of it.

use std::fmt;

use indexmap::IndexMap;
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::{TrellisError, TrellisResult};
use crate::path::KeyPath;
use crate::value::Value;

/// Ordered mapping representing one parsed document level.
///
/// Dotted-path operations descend one segment at a time; hitting a scalar
/// where a section is expected fails with
/// [`TrellisError::StructuralMismatch`] rather than silently overwriting.
///
/// # Examples
///
/// ```rust
/// use trellis_config::{KeyPath, Section, Value};
///
/// # fn main() -> trellis_config::TrellisResult<()> {
/// let mut root = Section::new();
/// let path = KeyPath::parse("database.port")?;
/// root.set(&path, 5432)?;
/// assert_eq!(root.get(&path)?, Some(&Value::Int(5432)));
/// assert_eq!(root.keys().collect::<Vec<_>>(), ["database"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section {
    entries: IndexMap<String, Value>,
}

impl Section {
    /// Creates an empty section.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a section from `(key, value)` pairs, preserving their order.
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let entries = pairs
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self { entries }
    }

    /// Fetches the value at a dotted path, descending nested sections.
    ///
    /// A missing key anywhere along the path yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::StructuralMismatch`] when an intermediate
    /// segment names a scalar instead of a section.
    pub fn get(&self, path: &KeyPath) -> TrellisResult<Option<&Value>> {
        let Some((leaf, parents)) = path.segments().split_last() else {
            return Ok(None);
        };
        let mut current = self;
        for segment in parents {
            match current.entries.get(segment) {
                None => return Ok(None),
                Some(Value::Section(next)) => current = next,
                Some(other) => return Err(mismatch(path, segment, other.kind())),
            }
        }
        Ok(current.entries.get(leaf))
    }

    /// Stores a value at a dotted path, creating intermediate sections.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::StructuralMismatch`] when an intermediate
    /// segment already holds a scalar; the scalar is never overwritten
    /// implicitly.
    pub fn set(&mut self, path: &KeyPath, value: impl Into<Value>) -> TrellisResult<()> {
        let Some((leaf, parents)) = path.segments().split_last() else {
            return Ok(());
        };
        let mut current = self;
        for segment in parents {
            let slot = current
                .entries
                .entry(segment.clone())
                .or_insert_with(|| Value::Section(Self::new()));
            match slot {
                Value::Section(next) => current = next,
                other => {
                    let found = other.kind();
                    return Err(mismatch(path, segment, found));
                }
            }
        }
        current.entries.insert(leaf.clone(), value.into());
        Ok(())
    }

    /// Removes and returns the value at a dotted path, if present.
    ///
    /// Removal preserves the order of the remaining keys.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::StructuralMismatch`] when an intermediate
    /// segment names a scalar instead of a section.
    pub fn remove(&mut self, path: &KeyPath) -> TrellisResult<Option<Value>> {
        let Some((leaf, parents)) = path.segments().split_last() else {
            return Ok(None);
        };
        let mut current = self;
        for segment in parents {
            match current.entries.get_mut(segment) {
                None => return Ok(None),
                Some(Value::Section(next)) => current = next,
                Some(other) => {
                    let found = other.kind();
                    return Err(mismatch(path, segment, found));
                }
            }
        }
        Ok(current.entries.shift_remove(leaf))
    }

    /// True when a value (of any kind) exists at the dotted path.
    #[must_use]
    pub fn contains(&self, path: &KeyPath) -> bool {
        matches!(self.get(path), Ok(Some(_)))
    }

    /// Inserts a value under a single key at this level.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Ordered iterator over this level's keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Ordered iterator over this level's entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// The ordered mapping view consumed by format writers.
    #[must_use]
    pub fn as_map(&self) -> &IndexMap<String, Value> {
        &self.entries
    }

    /// Number of entries at this level.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when this level holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn mismatch(path: &KeyPath, segment: &str, found: &'static str) -> std::sync::Arc<TrellisError> {
    TrellisError::StructuralMismatch {
        path: path.to_string(),
        segment: segment.into(),
        found,
    }
    .shared()
}

impl Serialize for Section {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct SectionVisitor;

impl<'de> Visitor<'de> for SectionVisitor {
    type Value = Section;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a configuration section")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Section, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut section = Section::new();
        while let Some((key, value)) = access.next_entry::<String, Value>()? {
            section.insert(key, value);
        }
        Ok(section)
    }
}

impl<'de> Deserialize<'de> for Section {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(SectionVisitor)
    }
}

#[cfg(test)]
mod tests;
