//! `${key}` placeholder resolution.
//!
//! Text values may reference other keys with `${other.key}` or
//! `${other.key:fallback}`. References resolve against the fragment being
//! built first and then against the context accumulated from earlier sources.

use kanon_core::{Config, Value};

use crate::LoadError;

/// Resolve every placeholder in the text values of `fragment`.
///
/// Text inside lists is resolved too. Non-text referenced values are
/// substituted by their textual form.
///
/// # Errors
///
/// Returns [`LoadError::UnresolvedPlaceholder`] for a reference that exists
/// neither in the fragment nor in the context and has no fallback, and
/// [`LoadError::PlaceholderCycle`] for self-referencing chains.
pub fn resolve_placeholders(fragment: Config, context: &Config) -> Result<Config, LoadError> {
    if !fragment.iter().any(|(_, value)| has_placeholder(value)) {
        return Ok(fragment);
    }

    let resolver = Resolver {
        fragment: &fragment,
        context,
    };
    let mut resolved = Config::new();
    for (key, value) in fragment.iter() {
        let value = resolver.resolve_value(key, value)?;
        resolved.insert(key, value);
    }
    Ok(resolved)
}

fn has_placeholder(value: &Value) -> bool {
    match value {
        Value::String(text) => text.contains("${"),
        Value::List(items) => items.iter().any(has_placeholder),
        _ => false,
    }
}

struct Resolver<'a> {
    fragment: &'a Config,
    context: &'a Config,
}

impl Resolver<'_> {
    fn resolve_value(&self, key: &str, value: &Value) -> Result<Value, LoadError> {
        match value {
            Value::String(text) => {
                let mut stack = vec![key.to_string()];
                self.resolve_text(text, &mut stack).map(Value::String)
            }
            Value::List(items) => items
                .iter()
                .map(|item| self.resolve_value(key, item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            other => Ok(other.clone()),
        }
    }

    fn resolve_text(&self, text: &str, stack: &mut Vec<String>) -> Result<String, LoadError> {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find('}') else {
                // Unterminated placeholder, keep it verbatim.
                out.push_str(&rest[start..]);
                return Ok(out);
            };

            let expr = &after[..end];
            let (name, fallback) = match expr.split_once(':') {
                Some((name, fallback)) => (name.trim(), Some(fallback)),
                None => (expr.trim(), None),
            };
            out.push_str(&self.lookup(name, fallback, stack)?);
            rest = &after[end + 1..];
        }

        out.push_str(rest);
        Ok(out)
    }

    fn lookup(
        &self,
        name: &str,
        fallback: Option<&str>,
        stack: &mut Vec<String>,
    ) -> Result<String, LoadError> {
        let origin = stack.first().cloned().unwrap_or_default();
        if stack.iter().any(|seen| seen == name) {
            return Err(LoadError::PlaceholderCycle { key: origin });
        }

        if let Some(value) = self.fragment.get(name) {
            return match value {
                Value::String(text) => {
                    stack.push(name.to_string());
                    let resolved = self.resolve_text(text, stack);
                    stack.pop();
                    resolved
                }
                other => Ok(other.to_text()),
            };
        }

        if let Some(value) = self.context.get(name) {
            return Ok(value.to_text());
        }

        fallback
            .map(str::to_string)
            .ok_or_else(|| LoadError::unresolved(origin, name))
    }
}
