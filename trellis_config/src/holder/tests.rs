//! Unit tests for holder coordination.

use anyhow::Result;

use crate::adapter::AdapterRegistry;
use crate::comment::CommentStore;
use crate::error::TrellisError;
use crate::options::HolderOptions;
use crate::path::KeyPath;
use crate::schema::{Field, Schema};
use crate::section::Section;
use crate::source::MemorySource;
use crate::value::Value;

use super::ConfigHolder;

fn database_schema() -> Schema {
    Schema::builder()
        .group("database", |g| {
            g.field(Field::<u16>::new("port").default(5432))
                .field(Field::<String>::new("host"))
        })
        .build()
}

#[test]
fn build_fails_fast_on_duplicate_paths_before_io() {
    let schema = Schema::builder()
        .field(Field::<i64>::new("x"))
        .field(Field::<u16>::new("x"))
        .build();
    let result = ConfigHolder::builder(MemorySource::empty())
        .schema(schema)
        .build();
    let err = match result {
        Err(err) => err,
        Ok(_) => panic!("duplicate paths must abort construction"),
    };
    assert!(matches!(&*err, TrellisError::Schema { .. }), "got: {err}");
}

#[test]
fn undeclared_paths_read_and_write_uncached() -> Result<()> {
    let mut root = Section::new();
    root.set(&KeyPath::parse("extra.flag")?, true)?;
    let holder = ConfigHolder::builder(MemorySource::with_root(root)).build()?;

    assert_eq!(holder.get::<bool>("extra.flag")?, Some(true));
    assert_eq!(holder.get::<bool>("extra.other")?, None);
    holder.set("extra.other", 7_i64)?;
    assert_eq!(holder.get::<i64>("extra.other")?, Some(7));
    assert!(holder.contains("extra.other")?);
    Ok(())
}

#[test]
fn typed_access_must_match_the_declared_type() -> Result<()> {
    let holder = ConfigHolder::builder(MemorySource::empty())
        .schema(database_schema())
        .build()?;
    assert!(holder.get::<String>("database.port").is_err());
    assert!(holder.handle::<String>("database.port").is_err());
    assert!(holder.handle::<u16>("database.port").is_ok());
    Ok(())
}

#[test]
fn paths_iterate_in_declaration_order() -> Result<()> {
    let holder = ConfigHolder::builder(MemorySource::empty())
        .schema(database_schema())
        .build()?;
    let paths: Vec<String> = holder.paths().map(ToString::to_string).collect();
    assert_eq!(paths, ["database.port", "database.host"]);
    Ok(())
}

#[test]
fn reload_keeps_the_old_tree_when_parsing_fails() -> Result<()> {
    use crate::source::Source;

    struct FlakySource {
        fail: std::sync::atomic::AtomicBool,
    }

    impl Source for FlakySource {
        fn read_raw(&self) -> crate::TrellisResult<Section> {
            if self.fail.load(std::sync::atomic::Ordering::SeqCst) {
                return Err(TrellisError::parse(std::io::Error::other("boom")).shared());
            }
            let mut root = Section::new();
            root.set(&KeyPath::parse("database.port")?, 7000)?;
            Ok(root)
        }

        fn write_raw(&self, _: &Section, _: &CommentStore) -> crate::TrellisResult<()> {
            Ok(())
        }
    }

    let source = FlakySource {
        fail: std::sync::atomic::AtomicBool::new(false),
    };
    let holder = ConfigHolder::builder(source)
        .schema(database_schema())
        .build()?;
    assert_eq!(holder.get::<u16>("database.port")?, Some(7000));

    holder
        .source()
        .fail
        .store(true, std::sync::atomic::Ordering::SeqCst);
    assert!(holder.reload().is_err());
    // the previous document is still served
    assert_eq!(holder.get::<u16>("database.port")?, Some(7000));
    Ok(())
}

#[test]
fn persist_defaults_fills_the_tree_at_build_time() -> Result<()> {
    let holder = ConfigHolder::builder(MemorySource::empty())
        .schema(database_schema())
        .options(HolderOptions::new().persist_defaults(true))
        .build()?;
    assert_eq!(
        holder.root().get(&KeyPath::parse("database.port")?)?,
        Some(&Value::Int(5432))
    );
    // no default declared for host, so nothing is written
    assert!(!holder.root().contains(&KeyPath::parse("database.host")?));
    Ok(())
}

#[test]
fn comments_merge_schema_and_application_entries() -> Result<()> {
    let schema = Schema::builder()
        .group("database", |g| {
            g.comments(["Connection settings."])
                .field(Field::<u16>::new("port").default(5432))
        })
        .build();
    let holder = ConfigHolder::builder(MemorySource::empty())
        .schema(schema)
        .build()?;
    holder.set_comments("database.port", ["Set by the operator."])?;

    let section = KeyPath::parse("database")?;
    assert_eq!(
        holder.comments_for(&section),
        Some(vec![String::from("Connection settings.")])
    );
    let port = KeyPath::parse("database.port")?;
    assert_eq!(
        holder.comments_for(&port),
        Some(vec![String::from("Set by the operator.")])
    );
    Ok(())
}

#[test]
fn update_registry_makes_new_types_readable() -> Result<()> {
    #[derive(Debug, Clone, PartialEq)]
    struct Threshold(i64);

    let schema = Schema::builder()
        .field(Field::<Threshold>::new("threshold"))
        .build();
    let mut root = Section::new();
    root.set(&KeyPath::parse("threshold")?, 9)?;
    let holder = ConfigHolder::builder(MemorySource::with_root(root))
        .schema(schema)
        .build()?;

    let err = match holder.get::<Threshold>("threshold") {
        Err(err) => err,
        Ok(value) => panic!("expected a missing adapter, got {value:?}"),
    };
    assert!(err.is_adapter_not_found(), "got: {err}");

    holder.update_registry(|registry| {
        registry.register::<Threshold, _, _>(
            |_, value| Ok(Value::Int(value.0)),
            |_, raw| {
                raw.as_int().map(Threshold).ok_or_else(|| {
                    crate::adapter::AdapterError::wrong_shape::<Threshold>(
                        raw,
                        "expected an integer",
                    )
                })
            },
        );
    });
    assert_eq!(
        holder.get::<Threshold>("threshold")?,
        Some(Threshold(9))
    );
    Ok(())
}

#[test]
fn registry_starts_empty_when_replaced() -> Result<()> {
    let mut root = Section::new();
    root.set(&KeyPath::parse("database.port")?, 7000)?;
    let holder = ConfigHolder::builder(MemorySource::with_root(root))
        .schema(database_schema())
        .registry(AdapterRegistry::empty())
        .build()?;
    // a raw value is present, so the (empty) registry must be consulted
    assert!(holder.get::<u16>("database.port").is_err());
    Ok(())
}
