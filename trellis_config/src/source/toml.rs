//! TOML document source.
//!
//! Parsing and rendering go through the `toml` crate against the serde
//! impls on [`Section`]; header comments are re-attached per path after
//! rendering, since serde has no notion of them.

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;

use camino::Utf8PathBuf;
use parking_lot::Mutex;
use tracing::warn;

use crate::comment::CommentStore;
use crate::error::{TrellisError, TrellisResult};
use crate::path::KeyPath;
use crate::result_ext::TrellisResultExt;
use crate::section::Section;

use super::Source;

/// File- or string-backed TOML source.
///
/// A file-backed source reads a missing file as an empty document, the
/// usual first-run behaviour for application configuration. TOML has no
/// null: a tree containing [`Value`](crate::Value)`::Null` fails to render
/// with a write error.
#[derive(Debug)]
pub struct TomlSource {
    path: Option<Utf8PathBuf>,
    text: Mutex<String>,
}

impl TomlSource {
    /// Creates a source backed by a file on disk.
    #[must_use]
    pub fn from_file(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            text: Mutex::new(String::new()),
        }
    }

    /// Creates a source backed by an in-memory TOML string.
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

impl Source for TomlSource {
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
        toml::from_str::<Section>(&text).into_trellis()
    }

    fn write_raw(&self, tree: &Section, comments: &CommentStore) -> TrellisResult<()> {
        let rendered = toml::to_string_pretty(tree).into_trellis()?;
        let rendered = attach_header_comments(&rendered, comments);
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

/// Inserts `# ` header lines above the key or table header each commented
/// path renders to.
fn attach_header_comments(rendered: &str, comments: &CommentStore) -> String {
    if comments.is_empty() {
        return rendered.to_owned();
    }
    let mut out = String::with_capacity(rendered.len());
    let mut table_prefix = String::new();
    let mut matched: HashSet<KeyPath> = HashSet::new();

    for line in rendered.lines() {
        let trimmed = line.trim_start();
        let line_path = if trimmed.starts_with('[') {
            let inner = trimmed
                .trim_start_matches('[')
                .trim_end()
                .trim_end_matches(']');
            table_prefix = inner.trim().to_owned();
            Some(table_prefix.clone())
        } else {
            trimmed.split_once('=').and_then(|(key, _)| {
                let key = key.trim();
                if key.is_empty() {
                    None
                } else if table_prefix.is_empty() {
                    Some(key.to_owned())
                } else {
                    Some(format!("{table_prefix}.{key}"))
                }
            })
        };

        if let Some(ref raw_path) = line_path {
            if let Ok(path) = KeyPath::parse(raw_path) {
                if let Some(lines) = comments.get(&path) {
                    let indent: String =
                        line.chars().take_while(|c| c.is_whitespace()).collect();
                    for comment in lines {
                        out.push_str(&indent);
                        out.push_str("# ");
                        out.push_str(comment);
                        out.push('\n');
                    }
                    matched.insert(path);
                }
            }
        }
        out.push_str(line);
        out.push('\n');
    }

    for (path, _) in comments.iter() {
        if !matched.contains(path) {
            warn!(path = %path, "no rendered key for header comment");
        }
    }
    out
}
