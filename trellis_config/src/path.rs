//! Dotted-segment addresses for fields and sections.
//!
//! A [`KeyPath`] is an ordered sequence of non-empty name segments. Its
//! canonical string form joins segments with `.`, and that form is what the
//! holder's lookup map, the comment store, and error messages all use.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{TrellisError, TrellisResult};

/// Separator used by the canonical string form.
pub const SEPARATOR: char = '.';

/// Ordered, non-empty sequence of name segments addressing a document node.
///
/// # Examples
///
/// ```rust
/// use trellis_config::KeyPath;
///
/// # fn main() -> trellis_config::TrellisResult<()> {
/// let path = KeyPath::parse("database.port")?;
/// assert_eq!(path.segments().len(), 2);
/// assert_eq!(path.to_string(), "database.port");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    /// Parses a dotted path, rejecting empty input and empty segments.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::Schema`] when the string is empty or contains
    /// an empty segment (`"a..b"`, leading or trailing dots).
    pub fn parse(raw: &str) -> TrellisResult<Self> {
        Self::from_segments(raw.split(SEPARATOR))
    }

    /// Builds a path from pre-split segments, validating each one.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::Schema`] when no segments are supplied or any
    /// segment is empty.
    pub fn from_segments<I, S>(segments: I) -> TrellisResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(TrellisError::schema("a path requires at least one segment").shared());
        }
        if segments.iter().any(String::is_empty) {
            return Err(TrellisError::schema(format!(
                "path '{}' contains an empty segment",
                segments.join(".")
            ))
            .shared());
        }
        Ok(Self { segments })
    }

    /// Returns the path's segments in order.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the final segment (the field's own name).
    #[must_use]
    pub fn leaf(&self) -> &str {
        self.segments.last().map_or("", String::as_str)
    }

    /// Returns a new path with `segment` appended.
    #[must_use]
    pub fn join(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// Path of the enclosing section, or `None` for a top-level path.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.segments.len() < 2 {
            return None;
        }
        let mut segments = self.segments.clone();
        segments.pop();
        Some(Self { segments })
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.segments {
            if !first {
                f.write_str(".")?;
            }
            f.write_str(segment)?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for KeyPath {
    type Err = Arc<TrellisError>;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw)
    }
}
