//! Text rules.

use std::sync::{Mutex, OnceLock};

use kanon_core::Value;
use regex::Regex;

use crate::{Check, Rule};

fn is_text(value: &Value) -> bool {
    matches!(value, Value::String(_))
}

fn is_flag(expectation: &Value) -> bool {
    expectation.as_bool().is_some()
}

/// `blank: false` rejects text that is empty after trimming.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blank;

impl Rule for Blank {
    fn name(&self) -> &str {
        "blank"
    }

    fn accepts_expectation(&self, expectation: &Value) -> bool {
        is_flag(expectation)
    }

    fn supports(&self, _: &Value, value: &Value) -> bool {
        is_text(value)
    }

    fn skips_blank(&self) -> bool {
        false
    }

    fn check(&self, check: &Check<'_>) -> bool {
        check.expectation.as_bool() == Some(true) || !check.value.is_blank()
    }
}

/// `email: true` requires an e-mail address.
#[derive(Debug, Clone, Copy, Default)]
pub struct Email;

impl Rule for Email {
    fn name(&self) -> &str {
        "email"
    }

    fn accepts_expectation(&self, expectation: &Value) -> bool {
        is_flag(expectation)
    }

    fn supports(&self, _: &Value, value: &Value) -> bool {
        is_text(value)
    }

    fn check(&self, check: &Check<'_>) -> bool {
        static EMAIL: OnceLock<Regex> = OnceLock::new();
        let email = EMAIL.get_or_init(|| {
            Regex::new(
                r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
            )
            .expect("valid email regex")
        });
        check.expectation.as_bool() == Some(false)
            || check.value.as_str().is_some_and(|text| email.is_match(text))
    }
}

/// `url: true` requires an absolute URL with a host.
#[derive(Debug, Clone, Copy, Default)]
pub struct Url;

impl Rule for Url {
    fn name(&self) -> &str {
        "url"
    }

    fn accepts_expectation(&self, expectation: &Value) -> bool {
        is_flag(expectation)
    }

    fn supports(&self, _: &Value, value: &Value) -> bool {
        is_text(value)
    }

    fn check(&self, check: &Check<'_>) -> bool {
        check.expectation.as_bool() == Some(false)
            || check
                .value
                .as_str()
                .and_then(|text| url::Url::parse(text).ok())
                .is_some_and(|url| url.has_host())
    }
}

/// `credit_card: true` requires 13 to 19 digits passing the Luhn check.
///
/// Spaces and dashes between digit groups are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreditCard;

impl Rule for CreditCard {
    fn name(&self) -> &str {
        "credit_card"
    }

    fn accepts_expectation(&self, expectation: &Value) -> bool {
        is_flag(expectation)
    }

    fn supports(&self, _: &Value, value: &Value) -> bool {
        is_text(value)
    }

    fn check(&self, check: &Check<'_>) -> bool {
        check.expectation.as_bool() == Some(false)
            || check.value.as_str().is_some_and(luhn_valid)
    }
}

fn luhn_valid(text: &str) -> bool {
    let mut digits = Vec::with_capacity(text.len());
    for c in text.chars().filter(|c| !matches!(c, ' ' | '-')) {
        match c.to_digit(10) {
            Some(d) => digits.push(d),
            None => return false,
        }
    }
    if !(13..=19).contains(&digits.len()) {
        return false;
    }

    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}

/// `matches: "<regex>"` requires the whole text to match.
///
/// The compiled expression is cached per rule instance.
#[derive(Debug, Default)]
pub struct Matches {
    compiled: Mutex<Option<(String, Regex)>>,
}

impl Matches {
    // The pattern must parse on its own: `a)|(b` only parses once wrapped.
    fn compile(pattern: &str) -> Option<Regex> {
        Regex::new(pattern).ok()?;
        Regex::new(&format!("^(?:{pattern})$")).ok()
    }

    fn is_match(&self, pattern: &str, text: &str) -> bool {
        let Ok(mut cached) = self.compiled.lock() else {
            return Self::compile(pattern).is_some_and(|regex| regex.is_match(text));
        };
        match cached.as_ref() {
            Some((source, regex)) if source == pattern => regex.is_match(text),
            _ => match Self::compile(pattern) {
                Some(regex) => {
                    let matched = regex.is_match(text);
                    *cached = Some((pattern.to_string(), regex));
                    matched
                }
                None => false,
            },
        }
    }
}

impl Rule for Matches {
    fn name(&self) -> &str {
        "matches"
    }

    fn accepts_expectation(&self, expectation: &Value) -> bool {
        expectation.as_str().and_then(Self::compile).is_some()
    }

    fn supports(&self, _: &Value, value: &Value) -> bool {
        is_text(value)
    }

    fn check(&self, check: &Check<'_>) -> bool {
        match (check.expectation.as_str(), check.value.as_str()) {
            (Some(pattern), Some(text)) => self.is_match(pattern, text),
            _ => false,
        }
    }
}
