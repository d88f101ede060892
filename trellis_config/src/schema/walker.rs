//! Depth-first schema discovery.
//!
//! Walks the declaration tree once at startup, computes every field's
//! canonical path, instantiates its manifest and cached value, and fails
//! fast on duplicate paths — before any document I/O happens.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::cached::CacheEntry;
use crate::error::{TrellisError, TrellisResult};
use crate::path::{KeyPath, SEPARATOR};

use super::builder::{GroupDecl, Node, Schema};

/// Everything discovery produced, in declaration order.
pub(crate) struct Discovery {
    pub(crate) entries: Vec<(KeyPath, Arc<dyn CacheEntry>)>,
    pub(crate) comments: Vec<(KeyPath, Vec<String>)>,
}

/// Discovers every declared field of `schema`.
///
/// Declaration order is preserved: it determines iteration and save order
/// for fields not already present in the source document.
pub(crate) fn discover(schema: &Schema) -> TrellisResult<Discovery> {
    let mut discovery = Discovery {
        entries: Vec::new(),
        comments: Vec::new(),
    };
    let mut seen: HashSet<KeyPath> = HashSet::new();
    walk_group(&schema.root, &[], &mut discovery, &mut seen)?;
    debug!(fields = discovery.entries.len(), "schema discovery complete");
    Ok(discovery)
}

fn walk_group(
    group: &GroupDecl,
    prefix: &[String],
    discovery: &mut Discovery,
    seen: &mut HashSet<KeyPath>,
) -> TrellisResult<()> {
    let mut own: Vec<String> = if group.anchored_to_root {
        Vec::new()
    } else {
        prefix.to_vec()
    };
    own.extend(own_segments(
        group.path_override.as_deref(),
        group.name.as_deref(),
    ));

    if !group.comments.is_empty() {
        if own.is_empty() {
            return Err(
                TrellisError::schema("the implicit root group cannot carry comments").shared(),
            );
        }
        let path = KeyPath::from_segments(own.clone())?;
        discovery.comments.push((path, group.comments.clone()));
    }

    for child in &group.children {
        match child {
            Node::Group(sub) => walk_group(sub, &own, discovery, seen)?,
            Node::Field(field) => {
                let mut segments: Vec<String> = if field.anchored_to_root() {
                    Vec::new()
                } else {
                    own.clone()
                };
                segments.extend(own_segments(field.path_override(), Some(field.name())));
                let path = KeyPath::from_segments(segments)?;
                if !seen.insert(path.clone()) {
                    return Err(TrellisError::duplicate_path(&path).shared());
                }
                if !field.comments().is_empty() {
                    discovery
                        .comments
                        .push((path.clone(), field.comments().to_vec()));
                }
                let entry = field.instantiate(path.clone());
                discovery.entries.push((path, entry));
            }
        }
    }
    Ok(())
}

/// Segments a group or field contributes itself: the override when given
/// (possibly dotted), else its declared name.
fn own_segments(path_override: Option<&str>, name: Option<&str>) -> Vec<String> {
    match (path_override, name) {
        (Some(value), _) => value.split(SEPARATOR).map(str::to_owned).collect(),
        (None, Some(name)) => vec![name.to_owned()],
        (None, None) => Vec::new(),
    }
}
