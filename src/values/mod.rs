// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Form values.
//!
//! A tab's values are a JSON object whose leaves are mostly strings (exactly
//! what a user typed). Nested fields are addressed with dotted paths; array
//! elements are addressed by index, e.g. `geocoronalEmission.0.flux`.

#[cfg(test)]
mod tests;

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// The current (or last-saved) values of a tab's form. Equality is deep
/// equality; key order doesn't matter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct FormValues(Map<String, Value>);

impl FormValues {
    pub fn new(map: Map<String, Value>) -> FormValues {
        FormValues(map)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// Get the value at a dotted path, if it exists.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.0.get(first)?;
        for segment in segments {
            current = match current {
                Value::Object(m) => m.get(segment)?,
                Value::Array(a) => a.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Get the value at a dotted path if it is a string.
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    /// Set the value at a dotted path. The field must already exist; forms
    /// have a fixed shape.
    pub fn set(&mut self, path: &str, value: Value) -> Result<(), ValuesError> {
        let slot = self.slot_mut(path)?;
        *slot = value;
        Ok(())
    }

    /// Append a row to the array at `path`.
    pub fn push(&mut self, path: &str, row: Value) -> Result<usize, ValuesError> {
        match self.slot_mut(path)? {
            Value::Array(a) => {
                a.push(row);
                Ok(a.len() - 1)
            }
            _ => Err(ValuesError::NotAnArray(path.to_string())),
        }
    }

    /// Remove row `index` from the array at `path`.
    pub fn remove(&mut self, path: &str, index: usize) -> Result<Value, ValuesError> {
        match self.slot_mut(path)? {
            Value::Array(a) if index < a.len() => Ok(a.remove(index)),
            Value::Array(a) => Err(ValuesError::IndexOutOfRange {
                path: path.to_string(),
                index,
                len: a.len(),
            }),
            _ => Err(ValuesError::NotAnArray(path.to_string())),
        }
    }

    /// Recursively overlay `other` onto these values. Objects are merged key
    /// by key; anything else in `other` replaces what is here.
    pub fn merge(&mut self, other: &FormValues) {
        fn merge_into(dst: &mut Map<String, Value>, src: &Map<String, Value>) {
            for (k, v) in src {
                match (dst.get_mut(k), v) {
                    (Some(Value::Object(d)), Value::Object(s)) => merge_into(d, s),
                    _ => {
                        dst.insert(k.clone(), v.clone());
                    }
                }
            }
        }
        merge_into(&mut self.0, &other.0);
    }

    fn slot_mut(&mut self, path: &str) -> Result<&mut Value, ValuesError> {
        let invalid = || ValuesError::InvalidPath(path.to_string());
        let mut segments = path.split('.');
        let first = segments.next().ok_or_else(invalid)?;
        let mut current = self.0.get_mut(first).ok_or_else(invalid)?;
        for segment in segments {
            current = match current {
                Value::Object(m) => m.get_mut(segment).ok_or_else(invalid)?,
                Value::Array(a) => {
                    let index: usize = segment.parse().map_err(|_| invalid())?;
                    let len = a.len();
                    a.get_mut(index).ok_or_else(|| ValuesError::IndexOutOfRange {
                        path: path.to_string(),
                        index,
                        len,
                    })?
                }
                _ => return Err(invalid()),
            };
        }
        Ok(current)
    }
}

impl TryFrom<Value> for FormValues {
    type Error = ValuesError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(m) => Ok(FormValues(m)),
            _ => Err(ValuesError::NotAnObject),
        }
    }
}

impl From<FormValues> for Value {
    fn from(values: FormValues) -> Self {
        Value::Object(values.0)
    }
}

/// Is this value "not provided"? Empty strings count as not provided, like an
/// untouched text field.
pub fn is_absent(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

/// Turn text typed by a user into a value for a field whose current value is
/// `existing`. Text fields stay text; numeric, boolean and structured fields
/// are parsed as JSON, falling back to text when the input isn't valid JSON.
pub fn coerce_input(existing: Option<&Value>, raw: &str) -> Value {
    match existing {
        None | Some(Value::Null) | Some(Value::String(_)) => Value::String(raw.to_string()),
        Some(_) => serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string())),
    }
}

/// A fresh identifier for a list row. Rows only need ids distinct from their
/// siblings.
pub fn new_row_id() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default()
        .to_string()
}

#[derive(Error, Debug)]
pub enum ValuesError {
    #[error("Form values must be a JSON object")]
    NotAnObject,

    #[error("'{0}' is not a valid field path")]
    InvalidPath(String),

    #[error("'{0}' is not a list")]
    NotAnArray(String),

    #[error("Row {index} of '{path}' doesn't exist; there are {len} rows")]
    IndexOutOfRange {
        path: String,
        index: usize,
        len: usize,
    },
}
