//! `From` conversions for format-reader errors.

use super::TrellisError;

#[cfg(feature = "toml")]
impl From<toml::de::Error> for TrellisError {
    fn from(source: toml::de::Error) -> Self {
        Self::parse(source)
    }
}

#[cfg(feature = "toml")]
impl From<toml::ser::Error> for TrellisError {
    fn from(source: toml::ser::Error) -> Self {
        Self::write(source)
    }
}

#[cfg(feature = "serde_json")]
impl From<serde_json::Error> for TrellisError {
    fn from(source: serde_json::Error) -> Self {
        Self::parse(source)
    }
}
