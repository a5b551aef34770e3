//! JSON sources.

use std::path::Path;
use std::str::FromStr;

use kanon_core::{BigDecimal, Config, Value};

use crate::convert::{join_key, overlay_profile, Converter};
use crate::factory::{has_extension, read_source, ConfigFactory};
use crate::interpolate::resolve_placeholders;
use crate::LoadError;

/// Converter between JSON documents and [`Config`].
///
/// Objects flatten into dotted keys, arrays become lists and objects inside
/// arrays become nested maps. Integers beyond the `i64` range are read as
/// exact decimals. A non-object root converts to an empty config.
///
/// `Null` and decimals round-trip. When a key is also the prefix of a deeper
/// key, `to_native` keeps the object and drops the scalar, in either order.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonConverter;

impl Converter for JsonConverter {
    type Native = serde_json::Value;

    fn from_native(&self, native: serde_json::Value) -> Config {
        let mut config = Config::new();
        if let serde_json::Value::Object(object) = native {
            flatten("", object, &mut config);
        }
        config
    }

    fn to_native(&self, config: &Config) -> serde_json::Value {
        let mut root = serde_json::Map::new();
        for (key, value) in config.iter() {
            let mut segments: Vec<&str> = key.split('.').collect();
            let leaf = segments.pop().unwrap_or_default();
            let object = segments
                .into_iter()
                .fold(&mut root, |object, segment| descend(object, segment));
            if !object.get(leaf).is_some_and(serde_json::Value::is_object) {
                object.insert(leaf.to_string(), to_json(value));
            }
        }
        serde_json::Value::Object(root)
    }
}

/// Factory for files with a `.json` extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFactory;

impl ConfigFactory for JsonFactory {
    fn name(&self) -> &str {
        "json"
    }

    fn supports(&self, path: &Path) -> bool {
        has_extension(path, "json")
    }

    fn create(
        &self,
        path: &Path,
        profile: Option<&str>,
        context: &Config,
    ) -> Result<Config, LoadError> {
        let content = read_source(path)?;
        let document: serde_json::Value = serde_json::from_str(&content)?;
        if !document.is_object() {
            return Err(LoadError::RootNotObject { format: "JSON" });
        }
        let fragment = overlay_profile(JsonConverter.from_native(document), profile);
        resolve_placeholders(fragment, context)
    }
}

fn flatten(prefix: &str, object: serde_json::Map<String, serde_json::Value>, config: &mut Config) {
    for (key, value) in object {
        let path = join_key(prefix, &key);
        match value {
            serde_json::Value::Object(inner) => flatten(&path, inner, config),
            other => {
                config.insert(path, from_json(other));
            }
        }
    }
}

fn from_json(value: serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if n.is_f64() {
                n.as_f64().map_or(Value::Null, Value::Float)
            } else {
                BigDecimal::from_str(&n.to_string()).map_or_else(
                    |_| n.as_f64().map_or(Value::Null, Value::Float),
                    Value::Decimal,
                )
            }
        }
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => Value::List(items.into_iter().map(from_json).collect()),
        serde_json::Value::Object(object) => Value::Map(
            object
                .into_iter()
                .map(|(key, value)| (key, from_json(value)))
                .collect(),
        ),
    }
}

fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Integer(i) => serde_json::Value::from(*i),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map_or(serde_json::Value::Null, serde_json::Value::Number),
        Value::Decimal(d) => serde_json::Number::from_str(&d.to_string())
            .map_or_else(|_| serde_json::Value::String(d.to_string()), serde_json::Value::Number),
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::List(items) => serde_json::Value::Array(items.iter().map(to_json).collect()),
        Value::Map(entries) => serde_json::Value::Object(
            entries
                .iter()
                .map(|(key, value)| (key.clone(), to_json(value)))
                .collect(),
        ),
    }
}

fn descend<'a>(
    object: &'a mut serde_json::Map<String, serde_json::Value>,
    segment: &str,
) -> &'a mut serde_json::Map<String, serde_json::Value> {
    let slot = object
        .entry(segment.to_string())
        .or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()));
    as_object(slot)
}

/// The object in `slot`, replacing a scalar with an empty object first.
fn as_object(slot: &mut serde_json::Value) -> &mut serde_json::Map<String, serde_json::Value> {
    match slot {
        serde_json::Value::Object(inner) => inner,
        other => {
            *other = serde_json::Value::Object(serde_json::Map::new());
            as_object(other)
        }
    }
}
