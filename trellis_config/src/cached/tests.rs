//! Unit tests for the cached-value read/write protocol.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use parking_lot::RwLock;

use crate::adapter::AdapterRegistry;
use crate::error::TrellisError;
use crate::manifest::ValueManifest;
use crate::options::CacheExpiry;
use crate::path::KeyPath;
use crate::section::Section;
use crate::value::Value;

use super::CachedValue;

fn manifest_with_default(path: &str, default: i64) -> Arc<ValueManifest<i64>> {
    let path = match KeyPath::parse(path) {
        Ok(path) => path,
        Err(err) => panic!("'{path}' should parse: {err}"),
    };
    Arc::new(ValueManifest::new(
        path,
        Some(Arc::new(move || default)),
        None,
        None,
    ))
}

fn manifest_plain(path: &str) -> Arc<ValueManifest<i64>> {
    let path = match KeyPath::parse(path) {
        Ok(path) => path,
        Err(err) => panic!("'{path}' should parse: {err}"),
    };
    Arc::new(ValueManifest::new(path, None, None, None))
}

#[test]
fn absent_raw_value_yields_cached_default() -> Result<()> {
    let tree = RwLock::new(Section::new());
    let registry = AdapterRegistry::new();
    let cached = CachedValue::new(manifest_with_default("database.port", 5432));

    assert!(cached.is_expired(CacheExpiry::Never), "never parsed");
    assert_eq!(cached.read(&tree, &registry, CacheExpiry::Never)?, Some(5432));
    assert!(!cached.is_expired(CacheExpiry::Never));
    assert_eq!(cached.cached(), Some(5432));
    Ok(())
}

#[test]
fn absent_raw_value_without_default_is_empty_not_an_error() -> Result<()> {
    let tree = RwLock::new(Section::new());
    let registry = AdapterRegistry::new();
    let cached = CachedValue::new(manifest_plain("database.port"));
    assert_eq!(cached.read(&tree, &registry, CacheExpiry::Never)?, None);
    Ok(())
}

#[test]
fn malformed_raw_value_errors_instead_of_defaulting() -> Result<()> {
    let mut root = Section::new();
    let path = KeyPath::parse("database.port")?;
    root.set(&path, "not-a-number")?;
    let tree = RwLock::new(root);
    let registry = AdapterRegistry::new();
    let cached = CachedValue::new(manifest_with_default("database.port", 5432));

    let err = match cached.read(&tree, &registry, CacheExpiry::Never) {
        Err(err) => err,
        Ok(value) => panic!("expected a shape error, got {value:?}"),
    };
    assert!(
        matches!(&*err, TrellisError::Deserialization { path, .. } if path == "database.port"),
        "unexpected error: {err}"
    );
    // the failed parse must not populate the cache
    assert_eq!(cached.cached(), None);
    Ok(())
}

#[test]
fn write_updates_tree_and_cache_together() -> Result<()> {
    let tree = RwLock::new(Section::new());
    let registry = AdapterRegistry::new();
    let cached = CachedValue::new(manifest_with_default("database.port", 5432));

    cached.write(&tree, &registry, 9000)?;
    let path = KeyPath::parse("database.port")?;
    assert_eq!(tree.read().get(&path)?, Some(&Value::Int(9000)));
    // a read before expiry is consistent with what was just written
    assert_eq!(cached.read(&tree, &registry, CacheExpiry::Never)?, Some(9000));
    Ok(())
}

#[test]
fn invalidate_forces_the_next_read_to_refetch() -> Result<()> {
    use super::CacheEntry;

    let tree = RwLock::new(Section::new());
    let registry = AdapterRegistry::new();
    let cached = CachedValue::new(manifest_with_default("database.port", 5432));

    assert_eq!(cached.read(&tree, &registry, CacheExpiry::Never)?, Some(5432));
    let path = KeyPath::parse("database.port")?;
    tree.write().set(&path, 7000)?;
    // still fresh, still the old value
    assert_eq!(cached.read(&tree, &registry, CacheExpiry::Never)?, Some(5432));
    cached.invalidate();
    assert_eq!(cached.read(&tree, &registry, CacheExpiry::Never)?, Some(7000));
    Ok(())
}

#[test]
fn zero_duration_expiry_always_refetches() -> Result<()> {
    let tree = RwLock::new(Section::new());
    let registry = AdapterRegistry::new();
    let cached = CachedValue::new(manifest_with_default("database.port", 5432));
    let expiry = CacheExpiry::After(Duration::ZERO);

    assert_eq!(cached.read(&tree, &registry, expiry)?, Some(5432));
    let path = KeyPath::parse("database.port")?;
    tree.write().set(&path, 7000)?;
    assert_eq!(cached.read(&tree, &registry, expiry)?, Some(7000));
    Ok(())
}

#[test]
fn persist_default_fills_only_absent_paths() -> Result<()> {
    use super::CacheEntry;

    let registry = AdapterRegistry::new();
    let mut root = Section::new();
    let occupied = KeyPath::parse("kept")?;
    root.set(&occupied, 1)?;

    let keep = CachedValue::new(manifest_with_default("kept", 99));
    let fill = CachedValue::new(manifest_with_default("filled", 42));
    let skip = CachedValue::new(manifest_plain("skipped"));

    keep.persist_default(&mut root, &registry)?;
    fill.persist_default(&mut root, &registry)?;
    skip.persist_default(&mut root, &registry)?;

    assert_eq!(root.get(&occupied)?, Some(&Value::Int(1)), "existing value kept");
    assert_eq!(root.get(&KeyPath::parse("filled")?)?, Some(&Value::Int(42)));
    assert!(!root.contains(&KeyPath::parse("skipped")?));
    Ok(())
}
