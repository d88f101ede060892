//! The tagged raw-value variant stored in a section tree.
//!
//! Every consumer pattern-matches a [`Value`] exhaustively instead of
//! type-testing at runtime. Scalars are copied, never shared; a nested
//! [`Section`] is owned by its parent value.

mod de;
mod ser;

use crate::section::Section;

/// A raw document value, independent of any concrete file format.
///
/// # Examples
///
/// ```rust
/// use trellis_config::Value;
///
/// let value = Value::from(5432);
/// assert_eq!(value.as_int(), Some(5432));
/// assert_eq!(value.kind(), "an integer");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Explicit absence of a value (formats that distinguish it).
    Null,
    /// A boolean scalar.
    Bool(bool),
    /// An integer scalar.
    Int(i64),
    /// A floating-point scalar.
    Float(f64),
    /// A string scalar.
    Str(String),
    /// An ordered sequence of values.
    Sequence(Vec<Value>),
    /// A nested section.
    Section(Section),
}

impl Value {
    /// Human-readable kind of this value, used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "a boolean",
            Self::Int(_) => "an integer",
            Self::Float(_) => "a float",
            Self::Str(_) => "a string",
            Self::Sequence(_) => "a sequence",
            Self::Section(_) => "a section",
        }
    }

    /// Returns the boolean scalar, if this is one.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the integer scalar, if this is one.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the float scalar, widening an integer if necessary.
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            #[expect(clippy::cast_precision_loss, reason = "widening is intentional")]
            Self::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    /// Returns the string scalar, if this is one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the sequence items, if this is a sequence.
    #[must_use]
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the nested section, if this is one.
    #[must_use]
    pub fn as_section(&self) -> Option<&Section> {
        match self {
            Self::Section(section) => Some(section),
            _ => None,
        }
    }

    /// Mutable access to the nested section, if this is one.
    pub fn as_section_mut(&mut self) -> Option<&mut Section> {
        match self {
            Self::Section(section) => Some(section),
            _ => None,
        }
    }

    /// True when this value is a nested section.
    #[must_use]
    pub fn is_section(&self) -> bool {
        matches!(self, Self::Section(_))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u16> for Value {
    fn from(value: u16) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::Sequence(items)
    }
}

impl From<Section> for Value {
    fn from(section: Section) -> Self {
        Self::Section(section)
    }
}
