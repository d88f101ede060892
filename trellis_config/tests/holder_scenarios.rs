//! End-to-end read/write/save/reload scenarios against an in-memory source.

use anyhow::Result;
use test_helpers::{CountingSource, database_schema};
use trellis_config::adapter::{NamedVariants, register_enum_strings};
use trellis_config::{ConfigHolder, Field, KeyPath, MemorySource, Schema, Section, Value};

fn seeded(port: i64) -> Result<Section> {
    let mut root = Section::new();
    root.set(&KeyPath::parse("database.port")?, port)?;
    Ok(root)
}

#[test]
fn empty_document_serves_the_declared_default() -> Result<()> {
    let holder = ConfigHolder::builder(MemorySource::empty())
        .schema(database_schema())
        .build()?;
    assert_eq!(holder.get::<u16>("database.port")?, Some(5432));
    assert_eq!(holder.get_or_default::<u16>("database.port")?, 5432);

    // no default declared for host: absent is empty, or an error on demand
    assert_eq!(holder.get::<String>("database.host")?, None);
    assert!(holder.get_or_default::<String>("database.host").is_err());
    Ok(())
}

#[test]
fn document_value_wins_over_the_default() -> Result<()> {
    let holder = ConfigHolder::builder(MemorySource::with_root(seeded(7000)?))
        .schema(database_schema())
        .build()?;
    assert_eq!(holder.get::<u16>("database.port")?, Some(7000));
    Ok(())
}

#[test]
fn set_save_reload_get_round_trip() -> Result<()> {
    let holder = ConfigHolder::builder(CountingSource::new(seeded(7000)?))
        .schema(database_schema())
        .build()?;

    holder.set("database.port", 9000_u16)?;
    holder.save()?;
    holder.reload()?;
    assert_eq!(holder.get::<u16>("database.port")?, Some(9000));

    let source = holder.source();
    assert_eq!(source.writes(), 1);
    assert_eq!(
        source.stored().get(&KeyPath::parse("database.port")?)?,
        Some(&Value::Int(9000))
    );
    Ok(())
}

#[test]
fn set_overrides_a_previously_cached_default() -> Result<()> {
    let holder = ConfigHolder::builder(MemorySource::empty())
        .schema(database_schema())
        .build()?;
    assert_eq!(holder.get::<u16>("database.port")?, Some(5432));
    holder.set("database.port", 9000_u16)?;
    assert_eq!(holder.get::<u16>("database.port")?, Some(9000));
    // the write went through to the tree, not just the cache
    assert_eq!(
        holder.root().get(&KeyPath::parse("database.port")?)?,
        Some(&Value::Int(9000))
    );
    Ok(())
}

#[test]
fn handles_survive_reload() -> Result<()> {
    let holder = ConfigHolder::builder(CountingSource::new(seeded(7000)?))
        .schema(database_schema())
        .build()?;
    let port = holder.handle::<u16>("database.port")?;

    assert_eq!(port.get(&holder)?, Some(7000));
    port.set(&holder, 9000)?;
    holder.save()?;
    holder.reload()?;
    assert_eq!(port.get_or_default(&holder)?, 9000);
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Profile {
    Dev,
    Prod,
}

impl NamedVariants for Profile {
    const VARIANTS: &'static [(&'static str, Self)] = &[("dev", Self::Dev), ("prod", Self::Prod)];
}

#[test]
fn missing_adapter_fails_until_registered() -> Result<()> {
    let mut root = Section::new();
    root.set(&KeyPath::parse("profile")?, "prod")?;
    let schema = Schema::builder()
        .field(Field::<Profile>::new("profile"))
        .build();
    let holder = ConfigHolder::builder(MemorySource::with_root(root))
        .schema(schema)
        .build()?;

    // fatal at first access, not at startup
    let err = match holder.get::<Profile>("profile") {
        Err(err) => err,
        Ok(value) => panic!("expected a missing adapter, got {value:?}"),
    };
    assert!(err.is_adapter_not_found(), "got: {err}");

    holder.update_registry(register_enum_strings::<Profile>);
    assert_eq!(holder.get::<Profile>("profile")?, Some(Profile::Prod));

    // the declared type also drives serialization back to a string
    holder.set("profile", Profile::Dev)?;
    assert_eq!(
        holder.root().get(&KeyPath::parse("profile")?)?,
        Some(&Value::Str(String::from("dev")))
    );
    Ok(())
}
