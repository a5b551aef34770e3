//! End-to-end runs: settings, on-disk sources, specification and report.

use std::fs;
use std::path::{Path, PathBuf};

use kanon::prelude::*;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn app_spec() -> SpecificationPartial {
    SpecificationBuilder::new("app.spec")
        .constraint("server.port", "range", vec![1, 65535], 1)
        .constraint("server.host", "blank", false, 2)
        .constraint("db.url", "url", true, 3)
        .validator(
            "pool.max",
            Predicate::from_bool(|config, _, value| {
                value
                    .compare(config.resolve("pool.min"))
                    .is_some_and(|o| o.is_ge())
            }),
            4,
        )
        .build()
}

fn render(errors: &[ConfigError]) -> Vec<String> {
    errors.iter().map(ToString::to_string).collect()
}

struct Fixture {
    _dir: TempDir,
    defaults: PathBuf,
    local: PathBuf,
}

fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let defaults = write(
        dir.path(),
        "defaults.toml",
        r#"
[server]
host = "0.0.0.0"
port = 8080
debug = true

[db]
url = "postgres://db.internal/app"

[pool]
min = 4
max = 16

[profiles.prod.server]
port = 70000

[profiles.prod.pool]
max = 2
"#,
    );
    let local = write(dir.path(), "local.properties", "db.url = not-a-url\n");
    Fixture {
        _dir: dir,
        defaults,
        local,
    }
}

/// Profile overlays, later sources and strict coverage all reach the report.
#[test]
fn test_full_run_with_settings() {
    let fx = fixture();
    let settings = SettingsLoader::new()
        .with_string("[validation]\nstrict = true\nprofile = \"prod\"\n", "toml")
        .unwrap()
        .load()
        .unwrap();

    let report = ValidationRun::from_settings(&settings, FactoryRegistry::with_defaults())
        .source(&fx.defaults)
        .source(&fx.local)
        .specification(app_spec())
        .execute();

    assert_eq!(report.config.resolve("server.port"), &Value::Integer(70000));
    assert_eq!(report.config.resolve("db.url"), &Value::from("not-a-url"));
    assert!(!report.is_valid());

    let violated: Vec<_> = report
        .errors_of(ErrorKind::Violation)
        .filter_map(ConfigError::key)
        .collect();
    assert_eq!(violated, ["server.port", "db.url", "pool.max"]);

    let coverage: Vec<_> = report.errors_of(ErrorKind::Coverage).collect();
    assert_eq!(coverage.len(), 1);
    assert_eq!(
        coverage[0].arguments(),
        [Value::List(vec![
            Value::from("pool.min"),
            Value::from("server.debug")
        ])]
    );
    assert_eq!(report.errors.len(), 4);
}

/// Without a profile the base values stand and only the local override fails.
#[test]
fn test_run_without_profile() {
    let fx = fixture();
    let report = ValidationRun::new(FactoryRegistry::with_defaults())
        .source(&fx.defaults)
        .source(&fx.local)
        .specification(app_spec())
        .execute();

    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].key(), Some("db.url"));
    assert_eq!(report.errors[0].code(), "kanon.constraint.url.violated");
}

/// A missing source is reported and validation still runs on the rest.
#[test]
fn test_missing_source_is_reported() {
    let fx = fixture();
    let missing = fx.defaults.with_file_name("missing.toml");

    let report = ValidationRun::new(FactoryRegistry::with_defaults())
        .source(&fx.defaults)
        .source(&missing)
        .specification(app_spec())
        .execute();

    let kinds: Vec<_> = report.errors.iter().map(ConfigError::kind).collect();
    assert_eq!(kinds, [ErrorKind::Load]);
    assert!(matches!(
        &report.errors[0],
        ConfigError::FailedToLoad { factory, .. } if factory == "toml"
    ));
    assert_eq!(report.config.resolve("server.port"), &Value::Integer(8080));
}

/// Settings read from a file drive a parallel engine with identical output.
#[test]
fn test_settings_file_parallel_run() {
    let fx = fixture();
    let dir = TempDir::new().unwrap();
    let settings_path = write(
        dir.path(),
        "kanon.toml",
        "[validation]\nstrict = true\nparallelism = 4\n\n[logging]\nenabled = false\n",
    );
    let settings = SettingsLoader::new()
        .with_file(&settings_path)
        .unwrap()
        .load()
        .unwrap();
    assert_eq!(settings.validation.parallelism, 4);

    let build = |settings: &KanonSettings| {
        ValidationRun::from_settings(settings, FactoryRegistry::with_defaults())
            .source_with_profile(&fx.defaults, "prod")
            .source(&fx.local)
            .specification(app_spec())
    };

    let parallel = build(&settings).execute();
    let sequential = build(&settings).parallelism(1).execute();

    assert_eq!(parallel.config, sequential.config);
    assert_eq!(render(&parallel.errors), render(&sequential.errors));
    assert_eq!(parallel.errors.len(), 4);
}

/// Concurrent conversion produces the same report as sequential loading.
#[tokio::test]
async fn test_execute_concurrent_matches_execute() {
    let fx = fixture();
    let run = ValidationRun::new(FactoryRegistry::with_defaults())
        .source_with_profile(&fx.defaults, "prod")
        .source(&fx.local)
        .specification(app_spec())
        .strict(true)
        .parallelism(2);

    let sequential = run.execute();
    let concurrent = run.execute_concurrent().await;

    assert_eq!(concurrent.config, sequential.config);
    assert_eq!(render(&concurrent.errors), render(&sequential.errors));
}

/// Authoring errors lead the validation output, after load errors.
#[test]
fn test_authoring_errors_reported() {
    let fx = fixture();
    let report = ValidationRun::new(FactoryRegistry::with_defaults())
        .source(&fx.defaults)
        .specification(
            SpecificationBuilder::new("broken.spec")
                .constraint("server.port", "between", vec![1, 2], 1)
                .constraint("server..host", "blank", false, 2)
                .constraint("server.port", "max", 1024, 3)
                .build(),
        )
        .execute();

    let kinds: Vec<_> = report.errors.iter().map(ConfigError::kind).collect();
    assert_eq!(
        kinds,
        [ErrorKind::Authoring, ErrorKind::Authoring, ErrorKind::Violation]
    );
    assert_eq!(
        report.errors[0].source_line().map(|l| (l.file(), l.line())),
        Some(("broken.spec", 1))
    );
}
