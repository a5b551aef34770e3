//! Runtime configuration values.
//!
//! Every entry of a [`Config`](crate::Config) holds one [`Value`]. Sources
//! produce heterogeneous values (text from properties files, typed scalars from
//! TOML and JSON), so constraints inspect values through the helpers defined
//! here instead of matching on representations directly.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use indexmap::IndexMap;

/// A configuration value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent or explicitly null value.
    #[default]
    Null,
    /// Text.
    String(String),
    /// Signed integer.
    Integer(i64),
    /// Floating-point number.
    Float(f64),
    /// Arbitrary-precision decimal.
    Decimal(BigDecimal),
    /// Boolean.
    Bool(bool),
    /// Ordered list of values.
    List(Vec<Value>),
    /// Nested map (only found inside lists; top-level nesting is flattened
    /// into dotted keys).
    Map(IndexMap<String, Value>),
}

/// The runtime type of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// [`Value::Null`].
    Null,
    /// [`Value::String`].
    String,
    /// [`Value::Integer`].
    Integer,
    /// [`Value::Float`].
    Float,
    /// [`Value::Decimal`].
    Decimal,
    /// [`Value::Bool`].
    Bool,
    /// [`Value::List`].
    List,
    /// [`Value::Map`].
    Map,
}

impl ValueKind {
    /// Lowercase name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Decimal => "decimal",
            Self::Bool => "bool",
            Self::List => "list",
            Self::Map => "map",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Value {
    /// The runtime kind of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::String(_) => ValueKind::String,
            Self::Integer(_) => ValueKind::Integer,
            Self::Float(_) => ValueKind::Float,
            Self::Decimal(_) => ValueKind::Decimal,
            Self::Bool(_) => ValueKind::Bool,
            Self::List(_) => ValueKind::List,
            Self::Map(_) => ValueKind::Map,
        }
    }

    /// Returns `true` for [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` for integer, float and decimal values.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer(_) | Self::Float(_) | Self::Decimal(_))
    }

    /// Returns `true` if this is text that is empty after trimming whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::String(s) if s.trim().is_empty())
    }

    /// Borrow the text of a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The integer held by this value, if it is one.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// The boolean held by this value, if it is one.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Borrow the elements of a list value.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Exact decimal view of a numeric value.
    ///
    /// Floats convert through their shortest round-tripping text, so `0.1`
    /// becomes the decimal `0.1` rather than its binary expansion. Non-finite
    /// floats and non-numeric values yield `None`.
    #[must_use]
    pub fn to_decimal(&self) -> Option<BigDecimal> {
        match self {
            Self::Integer(i) => Some(BigDecimal::from(*i)),
            Self::Float(f) if f.is_finite() => BigDecimal::from_str(&f.to_string()).ok(),
            Self::Decimal(d) => Some(d.clone()),
            _ => None,
        }
    }

    /// Size of a sized value: characters of text, elements of a list or map.
    #[must_use]
    pub fn size(&self) -> Option<usize> {
        match self {
            Self::String(s) => Some(s.chars().count()),
            Self::List(items) => Some(items.len()),
            Self::Map(entries) => Some(entries.len()),
            _ => None,
        }
    }

    /// Compare two values by meaning.
    ///
    /// Numbers compare by mathematical value whatever their representation,
    /// text compares lexicographically. Infinite floats order beyond every
    /// finite number. `NaN` and other combinations are incomparable.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            (a, b) if a.is_numeric() && b.is_numeric() => match (a.infinity(), b.infinity()) {
                (Some(x), Some(y)) => Some(x.cmp(&y)),
                (Some(x), None) => b.to_decimal().map(|_| x),
                (None, Some(y)) => a.to_decimal().map(|_| y.reverse()),
                (None, None) => Some(a.to_decimal()?.cmp(&b.to_decimal()?)),
            },
            _ => None,
        }
    }

    /// Where an infinite float sits relative to all finite numbers.
    fn infinity(&self) -> Option<Ordering> {
        match self {
            Self::Float(f) if f.is_infinite() => Some(if f.is_sign_positive() {
                Ordering::Greater
            } else {
                Ordering::Less
            }),
            _ => None,
        }
    }

    /// Equality with numeric values compared by mathematical value.
    ///
    /// `Integer(1)`, `Float(1.0)` and `Decimal(1.00)` are all the same value.
    #[must_use]
    pub fn same_value(&self, other: &Self) -> bool {
        if self.is_numeric() && other.is_numeric() {
            return self.compare(other) == Some(Ordering::Equal);
        }
        match (self, other) {
            (Self::List(a), Self::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_value(y))
            }
            _ => self == other,
        }
    }

    /// Textual form of the value, as written by text-based formats.
    ///
    /// `Null` renders as the empty string and lists as comma-separated
    /// elements, so this conversion is lossy.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::String(s) => s.clone(),
            Self::List(items) => items
                .iter()
                .map(Self::to_text)
                .collect::<Vec<_>>()
                .join(","),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::String(s) => f.write_str(s),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Map(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}={value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<BigDecimal> for Value {
    fn from(value: BigDecimal) -> Self {
        Self::Decimal(value)
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decimal(text: &str) -> Value {
        Value::Decimal(BigDecimal::from_str(text).unwrap())
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Value::Null.kind(), ValueKind::Null);
        assert_eq!(Value::from("x").kind().to_string(), "string");
        assert_eq!(decimal("1.5").kind().as_str(), "decimal");
    }

    #[test]
    fn test_blank_only_applies_to_text() {
        assert!(Value::from("   ").is_blank());
        assert!(Value::from("").is_blank());
        assert!(!Value::from(" a ").is_blank());
        assert!(!Value::Null.is_blank());
        assert!(!Value::List(Vec::new()).is_blank());
    }

    #[test]
    fn test_numeric_compare_across_representations() {
        assert_eq!(Value::from(2).compare(&Value::from(1.5)), Some(Ordering::Greater));
        assert_eq!(decimal("2.50").compare(&Value::from(2.5)), Some(Ordering::Equal));
        assert_eq!(Value::from(3).compare(&decimal("3.000")), Some(Ordering::Equal));
        assert_eq!(Value::from("a").compare(&Value::from(1)), None);
        assert_eq!(Value::from("a").compare(&Value::from("b")), Some(Ordering::Less));
    }

    #[test]
    fn test_infinite_floats_compare_beyond_finite_numbers() {
        let inf = Value::Float(f64::INFINITY);
        let neg = Value::Float(f64::NEG_INFINITY);
        assert_eq!(inf.compare(&Value::from(10)), Some(Ordering::Greater));
        assert_eq!(Value::from(10).compare(&inf), Some(Ordering::Less));
        assert_eq!(neg.compare(&decimal("-1e40")), Some(Ordering::Less));
        assert_eq!(decimal("-1e40").compare(&neg), Some(Ordering::Greater));
        assert_eq!(neg.compare(&inf), Some(Ordering::Less));
        assert_eq!(inf.compare(&inf), Some(Ordering::Equal));
        assert!(inf.same_value(&Value::Float(f64::INFINITY)));
    }

    #[test]
    fn test_nan_is_incomparable() {
        let nan = Value::Float(f64::NAN);
        assert_eq!(nan.compare(&Value::from(1)), None);
        assert_eq!(Value::Float(f64::INFINITY).compare(&nan), None);
        assert_eq!(nan.compare(&Value::Float(f64::NEG_INFINITY)), None);
    }

    #[test]
    fn test_float_decimal_view_uses_shortest_text() {
        assert_eq!(Value::from(0.1).to_decimal(), BigDecimal::from_str("0.1").ok());
        assert_eq!(Value::Float(f64::NAN).to_decimal(), None);
    }

    #[test]
    fn test_same_value() {
        assert!(Value::from(1).same_value(&Value::from(1.0)));
        assert!(Value::from(vec![1, 2]).same_value(&Value::from(vec![1.0, 2.0])));
        assert!(!Value::from("1").same_value(&Value::from(1)));
        assert!(Value::Null.same_value(&Value::Null));
    }

    #[test]
    fn test_size() {
        assert_eq!(Value::from("héllo").size(), Some(5));
        assert_eq!(Value::from(vec!["a", "b"]).size(), Some(2));
        assert_eq!(Value::from(5).size(), None);
    }

    #[test]
    fn test_text_and_display() {
        assert_eq!(Value::Null.to_text(), "");
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::from(vec!["a", "b"]).to_text(), "a,b");
        assert_eq!(Value::from(vec!["a", "b"]).to_string(), "[a, b]");
        assert_eq!(Value::from(true).to_text(), "true");

        let mut map = IndexMap::new();
        map.insert("host".to_string(), Value::from("db"));
        map.insert("port".to_string(), Value::from(5432));
        assert_eq!(Value::Map(map).to_string(), "{host=db, port=5432}");
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::from("x"));
    }
}
