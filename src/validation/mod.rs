// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Declarative validation of form values.
//!
//! Each tab has a list of [`Rule`]s (see `schema.rs`). A rule names a field by
//! its dotted path (`*` matches every row of a list), whether the field is
//! required (possibly only when another field has some value), and what a
//! provided value must look like. Validation produces one message per failing
//! field; a form with no messages may be saved.
//!
//! Empty strings count as "not provided", so an optional field left blank is
//! always valid.

mod schema;
#[cfg(test)]
mod tests;

pub use schema::rules;

use indexmap::IndexMap;
use itertools::Itertools;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::{
    tab::Tab,
    values::{is_absent, FormValues},
};

/// Validation messages keyed by the dotted path of the failing field, in
/// schema order.
pub type FieldErrors = IndexMap<String, String>;

/// Validate `values` against `tab`'s schema.
pub fn validate(tab: Tab, values: &FormValues) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for rule in rules(tab) {
        for path in expand_path(rule.path, values) {
            if let Some(message) = rule.check(values, &path) {
                errors.entry(path).or_insert(message);
            }
        }
    }
    errors
}

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("The {} parameters are invalid:\n{}", .tab.title(), format_field_errors(.errors))]
    Invalid { tab: Tab, errors: FieldErrors },
}

/// One line per failing field.
pub fn format_field_errors(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(path, message)| format!("  {path}: {message}"))
        .join("\n")
}

/// When is a field required?
#[derive(Debug, Clone, Copy)]
pub enum Requirement {
    Always,
    Never,
    When(Condition),
}

/// A condition on another field of the same form. Paths are absolute.
#[derive(Debug, Clone, Copy)]
pub enum Condition {
    /// The field's value, rendered as text, equals this (case-insensitively).
    Equals(&'static str, &'static str),
    /// The field is not provided.
    Absent(&'static str),
}

impl Condition {
    fn holds(&self, values: &FormValues) -> bool {
        match self {
            Condition::Equals(path, expected) => values
                .get(path)
                .map(|v| match v {
                    Value::String(s) => s.eq_ignore_ascii_case(expected),
                    other => other.to_string().eq_ignore_ascii_case(expected),
                })
                .unwrap_or(false),
            Condition::Absent(path) => is_absent(values.get(path)),
        }
    }
}

/// What a provided value must look like.
#[derive(Debug, Clone)]
pub enum Kind {
    /// A number within bounds.
    Number {
        /// Inclusive if the flag is true.
        min: Option<(f64, bool)>,
        max: Option<f64>,
        integer: bool,
    },
    /// Any text.
    Text,
    /// One of a fixed set of strings.
    OneOf(&'static [&'static str]),
    /// `true` or `false` (as a JSON boolean or text).
    Boolean,
    /// Text matching a (case-insensitive) pattern.
    Matches(&'static Regex),
}

#[derive(Debug, Clone)]
pub struct Rule {
    pub path: &'static str,
    pub requirement: Requirement,
    pub kind: Kind,
    pub required_message: String,
    pub invalid_message: String,
}

impl Rule {
    fn new(path: &'static str, kind: Kind, label: &str, invalid_message: String) -> Rule {
        Rule {
            path,
            requirement: Requirement::Never,
            kind,
            required_message: format!("{label} is a required field"),
            invalid_message,
        }
    }

    /// A number > 0.
    pub fn positive(path: &'static str, label: &str) -> Rule {
        let kind = Kind::Number {
            min: Some((0.0, false)),
            max: None,
            integer: false,
        };
        Rule::new(path, kind, label, format!("{label} must be a number > 0"))
    }

    /// A number >= 0.
    pub fn non_negative(path: &'static str, label: &str) -> Rule {
        let kind = Kind::Number {
            min: Some((0.0, true)),
            max: None,
            integer: false,
        };
        Rule::new(path, kind, label, format!("{label} must be a number >= 0"))
    }

    /// Any number.
    pub fn number(path: &'static str, label: &str) -> Rule {
        let kind = Kind::Number {
            min: None,
            max: None,
            integer: false,
        };
        Rule::new(path, kind, label, format!("{label} must be a number"))
    }

    /// One of `options`.
    pub fn one_of(path: &'static str, label: &str, options: &'static [&'static str]) -> Rule {
        let message = format!("{label} must be one of: {}", options.iter().join(", "));
        Rule::new(path, Kind::OneOf(options), label, message)
    }

    pub fn boolean(path: &'static str, label: &str) -> Rule {
        Rule::new(
            path,
            Kind::Boolean,
            label,
            format!("{label} must be true or false"),
        )
    }

    pub fn text(path: &'static str, label: &str) -> Rule {
        Rule::new(path, Kind::Text, label, format!("{label} must be text"))
    }

    pub fn matches(path: &'static str, label: &str, pattern: &'static Regex) -> Rule {
        Rule::new(
            path,
            Kind::Matches(pattern),
            label,
            format!("{label} is not valid"),
        )
    }

    pub fn required(mut self) -> Rule {
        self.requirement = Requirement::Always;
        self
    }

    pub fn required_when(mut self, condition: Condition) -> Rule {
        self.requirement = Requirement::When(condition);
        self
    }

    /// Additionally require the number to be at most `max`.
    pub fn at_most(mut self, max_value: f64) -> Rule {
        if let Kind::Number { max, .. } = &mut self.kind {
            *max = Some(max_value);
        }
        self
    }

    /// Additionally require the number to be a whole number.
    pub fn integer(mut self) -> Rule {
        if let Kind::Number { integer, .. } = &mut self.kind {
            *integer = true;
        }
        self
    }

    /// Replace the message used when a provided value is invalid.
    pub fn message(mut self, message: &str) -> Rule {
        self.invalid_message = message.to_string();
        self
    }

    /// Replace the message used when a required value is missing.
    pub fn missing_message(mut self, message: &str) -> Rule {
        self.required_message = message.to_string();
        self
    }

    fn is_required(&self, values: &FormValues) -> bool {
        match self.requirement {
            Requirement::Always => true,
            Requirement::Never => false,
            Requirement::When(c) => c.holds(values),
        }
    }

    /// The message for the field at `path`, if it fails this rule.
    fn check(&self, values: &FormValues, path: &str) -> Option<String> {
        let value = values.get(path);
        if is_absent(value) {
            return if self.is_required(values) {
                Some(self.required_message.clone())
            } else {
                None
            };
        }
        // Not absent, so there is a value.
        let value = value?;

        let ok = match &self.kind {
            Kind::Number { min, max, integer } => match parse_number(value) {
                None => false,
                Some(n) => {
                    let above_min = match min {
                        Some((m, true)) => n >= *m,
                        Some((m, false)) => n > *m,
                        None => true,
                    };
                    let below_max = max.map(|m| n <= m).unwrap_or(true);
                    let whole = !integer || n.fract() == 0.0;
                    above_min && below_max && whole
                }
            },
            Kind::Text => value.is_string(),
            Kind::OneOf(options) => value.as_str().map(|s| options.contains(&s)).unwrap_or(false),
            Kind::Boolean => parse_bool(value).is_some(),
            Kind::Matches(re) => value.as_str().map(|s| re.is_match(s)).unwrap_or(false),
        };
        if ok {
            None
        } else {
            Some(self.invalid_message.clone())
        }
    }
}

/// Interpret a form value as a number. Text is trimmed first; exponent
/// notation is allowed. NaN, infinities and values that overflow to infinity
/// are not numbers.
pub fn parse_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if n.is_finite() {
        Some(n)
    } else {
        None
    }
}

/// Interpret a form value as a boolean.
pub fn parse_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) if s.trim().eq_ignore_ascii_case("true") => Some(true),
        Value::String(s) if s.trim().eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

/// Expand `*` segments of `pattern` into the indices of the lists present in
/// `values`.
fn expand_path(pattern: &str, values: &FormValues) -> Vec<String> {
    if !pattern.contains('*') {
        return vec![pattern.to_string()];
    }

    let mut prefixes: Vec<String> = vec![String::new()];
    for segment in pattern.split('.') {
        prefixes = prefixes
            .into_iter()
            .flat_map(|prefix| {
                if segment == "*" {
                    let len = values
                        .get(&prefix)
                        .and_then(Value::as_array)
                        .map(Vec::len)
                        .unwrap_or(0);
                    (0..len).map(|i| format!("{prefix}.{i}")).collect::<Vec<_>>()
                } else if prefix.is_empty() {
                    vec![segment.to_string()]
                } else {
                    vec![format!("{prefix}.{segment}")]
                }
            })
            .collect();
    }
    prefixes
}
