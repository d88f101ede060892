//! Serde serialization for [`Value`] against the serde data model.
//!
//! This is the "section tree to format-native structure" half of the
//! recursive mapping: a format writer serializes the tree by walking these
//! impls with its own `Serializer`.

use serde::ser::{Serialize, SerializeSeq, Serializer};

use super::Value;

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(value) => serializer.serialize_bool(*value),
            Self::Int(value) => serializer.serialize_i64(*value),
            Self::Float(value) => serializer.serialize_f64(*value),
            Self::Str(value) => serializer.serialize_str(value),
            Self::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Section(section) => section.serialize(serializer),
        }
    }
}
