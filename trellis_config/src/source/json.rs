//! JSON document source.
//!
//! JSON carries no comments, so the comment store is ignored at save time,
//! the way the original platform backends without comment support behave.

use std::fs;
use std::io::ErrorKind;

use camino::Utf8PathBuf;
use parking_lot::Mutex;
use tracing::debug;

use crate::comment::CommentStore;
use crate::error::{TrellisError, TrellisResult};
use crate::result_ext::TrellisResultExt;
use crate::section::Section;

use super::Source;

/// File- or string-backed JSON source.
///
/// A file-backed source reads a missing or empty file as an empty
/// document.
#[derive(Debug)]
pub struct JsonSource {
    path: Option<Utf8PathBuf>,
    text: Mutex<String>,
}

impl JsonSource {
    /// Creates a source backed by a file on disk.
    #[must_use]
    pub fn from_file(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            text: Mutex::new(String::new()),
        }
    }

    /// Creates a source backed by an in-memory JSON string.
    #[must_use]
    pub fn from_string(text: impl Into<String>) -> Self {
        Self {
            path: None,
            text: Mutex::new(text.into()),
        }
    }

    /// Backing file path, when file-backed.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8PathBuf> {
        self.path.as_ref()
    }

    /// The current backing text: the last written render for string-backed
    /// sources, or the constructor input before any write.
    #[must_use]
    pub fn rendered(&self) -> String {
        self.text.lock().clone()
    }
}

impl Source for JsonSource {
    fn read_raw(&self) -> TrellisResult<Section> {
        let text = match &self.path {
            Some(path) => match fs::read_to_string(path) {
                Ok(text) => text,
                Err(err) if err.kind() == ErrorKind::NotFound => String::new(),
                Err(err) => return Err(TrellisError::parse(err).shared()),
            },
            None => self.text.lock().clone(),
        };
        if text.trim().is_empty() {
            return Ok(Section::new());
        }
        serde_json::from_str::<Section>(&text).into_trellis()
    }

    fn write_raw(&self, tree: &Section, comments: &CommentStore) -> TrellisResult<()> {
        if !comments.is_empty() {
            debug!(
                count = comments.len(),
                "JSON documents carry no comments; header metadata not written"
            );
        }
        let rendered = serde_json::to_string_pretty(tree)
            .map_err(|err| TrellisError::write(err).shared())?;
        match &self.path {
            Some(path) => fs::write(path, rendered)
                .map_err(|err| TrellisError::write(err).shared()),
            None => {
                *self.text.lock() = rendered;
                Ok(())
            }
        }
    }
}
