//! Format-source round trips driven through a holder.

use anyhow::Result;
use test_helpers::database_schema;
use trellis_config::{ConfigHolder, KeyPath, Value};

#[cfg(feature = "toml")]
mod toml_backed {
    use super::*;
    use trellis_config::TomlSource;

    #[test]
    fn parse_set_save_reload() -> Result<()> {
        let source = TomlSource::from_string("[database]\nport = 7000\nhost = \"db1\"\n");
        let holder = ConfigHolder::builder(source)
            .schema(database_schema())
            .build()?;
        assert_eq!(holder.get::<u16>("database.port")?, Some(7000));
        assert_eq!(
            holder.get::<String>("database.host")?,
            Some(String::from("db1"))
        );

        holder.set("database.port", 9000_u16)?;
        holder.save()?;
        holder.reload()?;
        assert_eq!(holder.get::<u16>("database.port")?, Some(9000));
        assert!(holder.source().rendered().contains("port = 9000"));
        Ok(())
    }

    #[test]
    fn saved_render_carries_schema_comments() -> Result<()> {
        let source = TomlSource::from_string("[database]\nport = 7000\n");
        let schema = trellis_config::Schema::builder()
            .group("database", |g| {
                g.comments(["Connection settings."])
                    .field(
                        trellis_config::Field::<u16>::new("port")
                            .default(5432)
                            .comments(["Listen port."]),
                    )
            })
            .build();
        let holder = ConfigHolder::builder(source).schema(schema).build()?;
        holder.save()?;

        let rendered = holder.source().rendered();
        assert!(
            rendered.contains("# Connection settings.\n[database]"),
            "missing section comment:\n{rendered}"
        );
        assert!(
            rendered.contains("# Listen port.\nport = 7000"),
            "missing field comment:\n{rendered}"
        );

        // comments live in holder metadata, not in the tree
        assert_eq!(
            holder.root().get(&KeyPath::parse("database.port")?)?,
            Some(&Value::Int(7000))
        );
        Ok(())
    }

    #[test]
    fn file_backed_holder_persists_across_instances() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("app.toml");
        let Some(path) = path.to_str() else {
            anyhow::bail!("temp path should be valid UTF-8");
        };

        let holder = ConfigHolder::builder(TomlSource::from_file(path))
            .schema(database_schema())
            .build()?;
        assert_eq!(holder.get::<u16>("database.port")?, Some(5432), "default");
        holder.set("database.port", 9000_u16)?;
        holder.save()?;
        drop(holder);

        let reopened = ConfigHolder::builder(TomlSource::from_file(path))
            .schema(database_schema())
            .build()?;
        assert_eq!(reopened.get::<u16>("database.port")?, Some(9000));
        Ok(())
    }
}

#[cfg(feature = "serde_json")]
mod json_backed {
    use super::*;
    use trellis_config::JsonSource;

    #[test]
    fn parse_set_save_reload() -> Result<()> {
        let source = JsonSource::from_string(r#"{"database": {"port": 7000}}"#);
        let holder = ConfigHolder::builder(source)
            .schema(database_schema())
            .build()?;
        assert_eq!(holder.get::<u16>("database.port")?, Some(7000));

        holder.set("database.port", 9000_u16)?;
        holder.save()?;
        holder.reload()?;
        assert_eq!(holder.get::<u16>("database.port")?, Some(9000));
        Ok(())
    }

    #[test]
    fn undeclared_keys_survive_the_round_trip() -> Result<()> {
        let source = JsonSource::from_string(
            r#"{"kept": {"by": "operator"}, "database": {"port": 7000}}"#,
        );
        let holder = ConfigHolder::builder(source)
            .schema(database_schema())
            .build()?;
        holder.set("database.port", 9000_u16)?;
        holder.save()?;
        holder.reload()?;

        // keys outside the schema are content, not schema, and are kept
        assert_eq!(
            holder.get::<String>("kept.by")?,
            Some(String::from("operator"))
        );
        let order: Vec<String> = holder.root().keys().map(str::to_owned).collect();
        assert_eq!(order, ["kept", "database"], "top-level order preserved");
        Ok(())
    }
}
