//! Java-style `.properties` sources.
//!
//! ```text
//! # comment
//! server.host = 0.0.0.0
//! server.port: 8080
//! greeting Hello \
//!          world
//! %prod.server.host = 10.0.0.1
//! ```
//!
//! Every value is text. Entries prefixed with `%<profile>.` only apply when
//! that profile is selected and then override the base entry.

use std::path::Path;

use indexmap::IndexMap;
use kanon_core::Config;

use crate::convert::Converter;
use crate::factory::{has_extension, read_source, ConfigFactory};
use crate::interpolate::resolve_placeholders;
use crate::LoadError;

/// Native representation of a properties document.
pub type Properties = IndexMap<String, String>;

/// Converter between [`Properties`] and [`Config`].
///
/// `to_native` is lossy: every scalar becomes its text, lists become
/// comma-separated text and `Null` becomes the empty string, which reads back
/// as `""` and not as `Null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertiesConverter;

impl Converter for PropertiesConverter {
    type Native = Properties;

    fn from_native(&self, native: Properties) -> Config {
        native.into_iter().collect()
    }

    fn to_native(&self, config: &Config) -> Properties {
        config
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_text()))
            .collect()
    }
}

/// Factory for files with a `.properties` extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertiesFactory;

impl ConfigFactory for PropertiesFactory {
    fn name(&self) -> &str {
        "properties"
    }

    fn supports(&self, path: &Path) -> bool {
        has_extension(path, "properties")
    }

    fn create(
        &self,
        path: &Path,
        profile: Option<&str>,
        context: &Config,
    ) -> Result<Config, LoadError> {
        let content = read_source(path)?;
        let entries = select_profile(parse_properties(&content)?, profile);
        resolve_placeholders(PropertiesConverter.from_native(entries), context)
    }
}

/// Parse properties text into ordered entries.
///
/// Supports `#`/`!` comments, `=`, `:` or whitespace separators, backslash
/// line continuations and the escapes `\t \n \r \f \\ \uXXXX`.
///
/// # Errors
///
/// Returns [`LoadError::Properties`] for malformed unicode escapes.
pub fn parse_properties(content: &str) -> Result<Properties, LoadError> {
    let mut entries = Properties::new();
    let mut lines = content.lines().enumerate();

    while let Some((index, raw)) = lines.next() {
        let trimmed = raw.trim_start_matches(is_blank);
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }

        let mut logical = trimmed.to_string();
        while continues(&logical) {
            logical.pop();
            match lines.next() {
                Some((_, next)) => logical.push_str(next.trim_start_matches(is_blank)),
                None => break,
            }
        }

        let line = index + 1;
        let (key, value) = split_entry(&logical);
        entries.insert(unescape(key, line)?, unescape(value, line)?);
    }

    Ok(entries)
}

/// Render entries as properties text, escaping what the parser unescapes.
#[must_use]
pub fn render_properties(entries: &Properties) -> String {
    let mut out = String::new();
    for (key, value) in entries {
        out.push_str(&escape(key, true));
        out.push('=');
        out.push_str(&escape(value, false));
        out.push('\n');
    }
    out
}

fn select_profile(entries: Properties, profile: Option<&str>) -> Properties {
    let mut base = Properties::new();
    let mut overrides = Vec::new();

    for (key, value) in entries {
        let Some(scoped) = key.strip_prefix('%') else {
            base.insert(key, value);
            continue;
        };
        if let Some((name, own)) = scoped.split_once('.') {
            if Some(name) == profile {
                overrides.push((own.to_string(), value));
            }
        }
    }

    base.extend(overrides);
    base
}

const fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

fn continues(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();

    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = i;
                break;
            }
            c if is_blank(c) => {
                key_end = i;
                break;
            }
            _ => {}
        }
    }

    let rest = line[key_end..].trim_start_matches(is_blank);
    let rest = rest
        .strip_prefix(|c: char| c == '=' || c == ':')
        .unwrap_or(rest);
    (&line[..key_end], rest.trim_start_matches(is_blank))
}

fn unescape(text: &str, line: usize) -> Result<String, LoadError> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let decoded = u32::from_str_radix(&hex, 16)
                    .ok()
                    .filter(|_| hex.len() == 4)
                    .and_then(char::from_u32)
                    .ok_or_else(|| {
                        LoadError::properties(line, format!("invalid unicode escape \\u{hex}"))
                    })?;
                out.push(decoded);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }

    Ok(out)
}

fn escape(text: &str, is_key: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, c) in text.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x0c' => out.push_str("\\f"),
            '=' | ':' if is_key => {
                out.push('\\');
                out.push(c);
            }
            ' ' if is_key || i == 0 => out.push_str("\\ "),
            '#' | '!' if is_key && i == 0 => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}
