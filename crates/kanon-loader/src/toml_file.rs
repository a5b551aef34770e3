//! TOML sources.

use std::path::Path;

use kanon_core::{Config, Value};

use crate::convert::{join_key, overlay_profile, Converter};
use crate::factory::{has_extension, read_source, ConfigFactory};
use crate::interpolate::resolve_placeholders;
use crate::LoadError;

/// Converter between TOML tables and [`Config`].
///
/// Nested tables flatten into dotted keys, arrays become lists and tables
/// inside arrays become nested maps. Datetimes are read as text.
///
/// `to_native` is lossy where TOML cannot express a value: `Null` becomes
/// the empty string and decimals become floats. When a key is also the
/// prefix of a deeper key, the table is kept and the scalar dropped, in
/// either order.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlConverter;

impl Converter for TomlConverter {
    type Native = toml::Table;

    fn from_native(&self, native: toml::Table) -> Config {
        let mut config = Config::new();
        flatten("", native, &mut config);
        config
    }

    fn to_native(&self, config: &Config) -> toml::Table {
        let mut root = toml::Table::new();
        for (key, value) in config.iter() {
            let mut segments: Vec<&str> = key.split('.').collect();
            let leaf = segments.pop().unwrap_or_default();
            let table = segments
                .into_iter()
                .fold(&mut root, |table, segment| descend(table, segment));
            if !table.get(leaf).is_some_and(toml::Value::is_table) {
                table.insert(leaf.to_string(), to_toml(value));
            }
        }
        root
    }
}

/// Factory for files with a `.toml` extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlFactory;

impl ConfigFactory for TomlFactory {
    fn name(&self) -> &str {
        "toml"
    }

    fn supports(&self, path: &Path) -> bool {
        has_extension(path, "toml")
    }

    fn create(
        &self,
        path: &Path,
        profile: Option<&str>,
        context: &Config,
    ) -> Result<Config, LoadError> {
        let content = read_source(path)?;
        let table: toml::Table = toml::from_str(&content)?;
        let fragment = overlay_profile(TomlConverter.from_native(table), profile);
        resolve_placeholders(fragment, context)
    }
}

fn flatten(prefix: &str, table: toml::Table, config: &mut Config) {
    for (key, value) in table {
        let path = join_key(prefix, &key);
        match value {
            toml::Value::Table(inner) => flatten(&path, inner, config),
            other => {
                config.insert(path, from_toml(other));
            }
        }
    }
}

fn from_toml(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Integer(i),
        toml::Value::Float(f) => Value::Float(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(d) => Value::String(d.to_string()),
        toml::Value::Array(items) => Value::List(items.into_iter().map(from_toml).collect()),
        toml::Value::Table(table) => Value::Map(
            table
                .into_iter()
                .map(|(key, value)| (key, from_toml(value)))
                .collect(),
        ),
    }
}

fn to_toml(value: &Value) -> toml::Value {
    match value {
        Value::Null => toml::Value::String(String::new()),
        Value::String(s) => toml::Value::String(s.clone()),
        Value::Integer(i) => toml::Value::Integer(*i),
        Value::Float(f) => toml::Value::Float(*f),
        Value::Decimal(d) => d
            .to_string()
            .parse::<f64>()
            .map_or_else(|_| toml::Value::String(d.to_string()), toml::Value::Float),
        Value::Bool(b) => toml::Value::Boolean(*b),
        Value::List(items) => toml::Value::Array(items.iter().map(to_toml).collect()),
        Value::Map(entries) => toml::Value::Table(
            entries
                .iter()
                .map(|(key, value)| (key.clone(), to_toml(value)))
                .collect(),
        ),
    }
}

fn descend<'a>(table: &'a mut toml::Table, segment: &str) -> &'a mut toml::Table {
    let slot = table
        .entry(segment.to_string())
        .or_insert_with(|| toml::Value::Table(toml::Table::new()));
    as_table(slot)
}

/// The table in `slot`, replacing a scalar with an empty table first.
fn as_table(slot: &mut toml::Value) -> &mut toml::Table {
    match slot {
        toml::Value::Table(inner) => inner,
        other => {
            *other = toml::Value::Table(toml::Table::new());
            as_table(other)
        }
    }
}
