//! Unit tests for dotted-path traversal over section trees.

use anyhow::Result;
use rstest::rstest;

use crate::error::TrellisError;
use crate::path::KeyPath;
use crate::value::Value;

use super::Section;

fn path(raw: &str) -> KeyPath {
    match KeyPath::parse(raw) {
        Ok(path) => path,
        Err(err) => panic!("'{raw}' should parse: {err}"),
    }
}

#[test]
fn set_creates_intermediate_sections() -> Result<()> {
    let mut root = Section::new();
    root.set(&path("database.pool.size"), 4)?;
    assert_eq!(
        root.get(&path("database.pool.size"))?,
        Some(&Value::Int(4))
    );
    assert!(root.contains(&path("database.pool")));
    assert!(!root.contains(&path("database.missing")));
    Ok(())
}

#[test]
fn get_through_scalar_is_a_structural_mismatch() {
    let mut root = Section::new();
    if let Err(err) = root.set(&path("database"), "not-a-section") {
        panic!("scalar set should succeed: {err}");
    }
    let err = match root.get(&path("database.port")) {
        Err(err) => err,
        Ok(found) => panic!("expected a mismatch, found {found:?}"),
    };
    assert!(
        matches!(&*err, TrellisError::StructuralMismatch { segment, .. } if segment == "database"),
        "unexpected error: {err}"
    );
}

#[test]
fn set_never_silently_overwrites_a_scalar_with_a_section() {
    let mut root = Section::new();
    if let Err(err) = root.set(&path("flag"), true) {
        panic!("scalar set should succeed: {err}");
    }
    assert!(root.set(&path("flag.nested"), 1).is_err());
    // the original scalar survives the failed write
    assert_eq!(
        root.get(&path("flag")).ok().flatten(),
        Some(&Value::Bool(true))
    );
}

#[rstest]
#[case(&["alpha", "beta", "gamma"])]
#[case(&["zeta", "alpha", "beta"])]
fn insertion_order_is_preserved(#[case] keys: &[&str]) {
    let mut root = Section::new();
    for (index, key) in keys.iter().enumerate() {
        let declared = i64::try_from(index).unwrap_or(0);
        root.insert(*key, declared);
    }
    let observed: Vec<&str> = root.keys().collect();
    assert_eq!(observed, keys);
}

#[test]
fn remove_keeps_remaining_order() -> Result<()> {
    let mut root = Section::from_pairs([("a", 1_i64), ("b", 2), ("c", 3)]);
    let removed = root.remove(&path("b"))?;
    assert_eq!(removed, Some(Value::Int(2)));
    assert_eq!(root.keys().collect::<Vec<_>>(), ["a", "c"]);
    Ok(())
}

#[test]
fn missing_intermediate_reads_as_absent() -> Result<()> {
    let root = Section::new();
    assert_eq!(root.get(&path("no.such.key"))?, None);
    Ok(())
}
