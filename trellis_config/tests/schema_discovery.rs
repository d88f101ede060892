//! Discovery-time guarantees observed from the outside.

use std::sync::Arc;

use anyhow::Result;
use test_helpers::CountingSource;
use trellis_config::{ConfigHolder, Field, Schema, TrellisError};

#[test]
fn an_invalid_schema_aborts_before_any_io() {
    let source = Arc::new(CountingSource::empty());
    let schema = Schema::builder()
        .group("database", |g| g.field(Field::<u16>::new("port")))
        .field(Field::<i64>::new("port").at_path("database.port"))
        .build();

    let result = ConfigHolder::builder(Arc::clone(&source))
        .schema(schema)
        .build();
    let err = match result {
        Err(err) => err,
        Ok(_) => panic!("duplicate paths must abort construction"),
    };
    assert!(matches!(&*err, TrellisError::Schema { .. }), "got: {err}");
    assert_eq!(source.reads(), 0, "discovery failure must precede I/O");
}

#[test]
fn every_declared_field_gets_a_unique_path_in_declaration_order() -> Result<()> {
    let schema = Schema::builder()
        .field(Field::<String>::new("motd"))
        .group("database", |g| {
            g.field(Field::<u16>::new("port"))
                .group("pool", |g| g.field(Field::<i64>::new("size")))
        })
        .group("metrics", |g| g.at_root().field(Field::<bool>::new("enabled")))
        .build();
    let holder = ConfigHolder::builder(CountingSource::empty())
        .schema(schema)
        .build()?;

    let paths: Vec<String> = holder.paths().map(ToString::to_string).collect();
    assert_eq!(
        paths,
        ["motd", "database.port", "database.pool.size", "metrics.enabled"]
    );
    Ok(())
}
