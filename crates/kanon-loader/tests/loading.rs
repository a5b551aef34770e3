//! Integration tests for ordered source loading.
//!
//! Every test writes its sources into a temporary directory and loads them
//! through the default factory registry.

use std::fs;
use std::path::{Path, PathBuf};

use kanon_core::{merge, Config, ConfigError, Value};
use kanon_loader::{FactoryRegistry, Loader};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn loader() -> Loader {
    Loader::new(FactoryRegistry::with_defaults())
}

/// Later sources override earlier ones key by key.
#[test]
fn test_merge_order_across_formats() {
    let dir = TempDir::new().unwrap();
    let defaults = write(
        dir.path(),
        "defaults.toml",
        "[server]\nhost = \"0.0.0.0\"\nport = 8080\n",
    );
    let overrides = write(dir.path(), "overrides.json", r#"{ "server": { "port": 9090 } }"#);
    let local = write(dir.path(), "local.properties", "server.name = edge-1\n");

    let outcome = loader()
        .source(&defaults)
        .source(&overrides)
        .source(&local)
        .load();

    assert!(outcome.is_clean(), "{:?}", outcome.errors);
    assert_eq!(outcome.config.resolve("server.host"), &Value::from("0.0.0.0"));
    assert_eq!(outcome.config.resolve("server.port"), &Value::Integer(9090));
    assert_eq!(outcome.config.resolve("server.name"), &Value::from("edge-1"));
}

/// Swapping two sources changes which value wins.
#[test]
fn test_merge_is_order_dependent() {
    let dir = TempDir::new().unwrap();
    let a = write(dir.path(), "a.properties", "x=1\n");
    let b = write(dir.path(), "b.properties", "x=2\n");

    let ab = loader().source(&a).source(&b).load().config;
    let ba = loader().source(&b).source(&a).load().config;

    assert_eq!(ab.resolve("x"), &Value::from("2"));
    assert_eq!(ba.resolve("x"), &Value::from("1"));
}

/// Loading equals the left fold of merge over the individual fragments.
#[test]
fn test_load_equals_merge_fold() {
    let dir = TempDir::new().unwrap();
    let s1 = write(dir.path(), "s1.toml", "a = 1\nb = 2\n");
    let s2 = write(dir.path(), "s2.toml", "b = 3\nc = 4\n");

    let loaded = loader().source(&s1).source(&s2).load().config;
    let one = loader().source(&s1).load().config;
    let two = loader().source(&s2).load().config;

    assert_eq!(loaded, merge(merge(Config::new(), one), two));
}

/// A failing source is reported and the others still apply.
#[test]
fn test_failed_source_does_not_abort() {
    let dir = TempDir::new().unwrap();
    let good = write(dir.path(), "good.toml", "a = 1\n");
    let broken = write(dir.path(), "broken.json", "{ not json");
    let unknown = write(dir.path(), "unknown.yaml", "a: 2\n");
    let later = write(dir.path(), "later.properties", "b = 2\n");

    let outcome = loader()
        .source(&good)
        .source(&broken)
        .source(&unknown)
        .source(&later)
        .load();

    assert_eq!(outcome.config.resolve("a"), &Value::Integer(1));
    assert_eq!(outcome.config.resolve("b"), &Value::from("2"));
    assert_eq!(outcome.errors.len(), 2);
    assert!(matches!(
        &outcome.errors[0],
        ConfigError::FailedToLoad { file, factory, .. } if file == &broken && factory == "json"
    ));
    assert!(matches!(
        &outcome.errors[1],
        ConfigError::NoSuitableFactory { file } if file == &unknown
    ));
}

/// A JSON document whose root is not an object is a load failure.
#[test]
fn test_json_root_must_be_object() {
    let dir = TempDir::new().unwrap();
    let list = write(dir.path(), "list.json", "[1, 2]");

    let outcome = loader().source(&list).load();
    assert!(outcome.config.is_empty());
    assert!(matches!(
        outcome.errors.as_slice(),
        [ConfigError::FailedToLoad { .. }]
    ));
}

/// Placeholders resolve against keys loaded by earlier sources.
#[test]
fn test_interpolation_against_earlier_sources() {
    let dir = TempDir::new().unwrap();
    let base = write(dir.path(), "base.toml", "[db]\nhost = \"db.internal\"\nport = 5432\n");
    let derived = write(
        dir.path(),
        "derived.properties",
        "db.url = postgres://${db.host}:${db.port}/app\nlog.threshold = ${log.level:info}\n",
    );

    let outcome = loader().source(&base).source(&derived).load();

    assert!(outcome.is_clean(), "{:?}", outcome.errors);
    assert_eq!(
        outcome.config.resolve("db.url"),
        &Value::from("postgres://db.internal:5432/app")
    );
    assert_eq!(outcome.config.resolve("log.threshold"), &Value::from("info"));
}

/// An unresolvable placeholder fails only its own source.
#[test]
fn test_unresolved_placeholder_fails_source() {
    let dir = TempDir::new().unwrap();
    let broken = write(dir.path(), "broken.properties", "url = ${nowhere}\n");
    let fine = write(dir.path(), "fine.properties", "ok = yes\n");

    let outcome = loader().source(&broken).source(&fine).load();

    assert_eq!(outcome.errors.len(), 1);
    assert!(!outcome.config.contains_key("url"));
    assert_eq!(outcome.config.resolve("ok"), &Value::from("yes"));
}

/// Profile overlays apply per source.
#[test]
fn test_profiles() {
    let dir = TempDir::new().unwrap();
    let toml = write(
        dir.path(),
        "app.toml",
        "[db]\nhost = \"localhost\"\n\n[profiles.prod.db]\nhost = \"db.prod\"\n",
    );
    let props = write(dir.path(), "app.properties", "pool=5\n%prod.pool=50\n");

    let dev = loader().source(&toml).source(&props).load().config;
    assert_eq!(dev.resolve("db.host"), &Value::from("localhost"));
    assert_eq!(dev.resolve("pool"), &Value::from("5"));
    assert!(dev.keys().all(|k| !k.starts_with("profiles")));

    let prod = loader()
        .source_with_profile(&toml, "prod")
        .source_with_profile(&props, "prod")
        .load()
        .config;
    assert_eq!(prod.resolve("db.host"), &Value::from("db.prod"));
    assert_eq!(prod.resolve("pool"), &Value::from("50"));
}

/// Concurrent loading matches sequential loading for independent sources.
#[tokio::test]
async fn test_concurrent_matches_sequential() {
    let dir = TempDir::new().unwrap();
    let mut loader = loader().with_base([("app.name", "kanon")].into_iter().collect());
    for i in 0..8 {
        let path = write(
            dir.path(),
            &format!("part{i}.toml"),
            &format!("shared = {i}\nkey{i} = \"${{app.name}}-{i}\"\n"),
        );
        loader = loader.source(path);
    }
    loader = loader.source(dir.path().join("missing.toml"));
    loader = loader.source(dir.path().join("unsupported.ini"));

    let sequential = loader.load();
    let concurrent = loader.load_concurrent().await;

    assert_eq!(concurrent.config, sequential.config);
    assert_eq!(concurrent.config.resolve("shared"), &Value::Integer(7));
    assert_eq!(concurrent.config.resolve("key3"), &Value::from("kanon-3"));
    assert_eq!(
        concurrent.errors.iter().map(ConfigError::code).collect::<Vec<_>>(),
        sequential.errors.iter().map(ConfigError::code).collect::<Vec<_>>()
    );
    assert_eq!(concurrent.errors.len(), 2);
}
