// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The generic message object: an insertion-ordered key-value container
//! with typed access.

use crate::wire::value::WireValue;
use std::fmt;

/// Error outcome of a typed get-by-key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// The key is not present
    NotFound(String),
    /// The key is present with a different shape
    WrongKind {
        key: String,
        expected: &'static str,
        got: &'static str,
    },
}

impl fmt::Display for KeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(key) => write!(f, "Key not found: {}", key),
            Self::WrongKind { key, expected, got } => {
                write!(f, "Key {} has kind {}, expected {}", key, got, expected)
            }
        }
    }
}

impl std::error::Error for KeyError {}

/// An insertion-ordered key-value message object.
///
/// Keys keep their first-insertion position; setting an existing key
/// replaces the value in place. Response emission relies on this to
/// write result keys in parameter declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WireObject {
    entries: Vec<(String, WireValue)>,
}

impl WireObject {
    /// Create an empty object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the object has no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &WireValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Whether the key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Untyped get-by-key.
    pub fn get(&self, key: &str) -> Option<&WireValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Typed set-by-key. Replaces in place if the key exists.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<WireValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Typed get of a boolean.
    pub fn get_bool(&self, key: &str) -> Result<bool, KeyError> {
        self.typed(key, "boolean", WireValue::as_bool)
    }

    /// Typed get of an integer.
    pub fn get_i64(&self, key: &str) -> Result<i64, KeyError> {
        self.typed(key, "integer", WireValue::as_i64)
    }

    /// Typed get of a number. Integers widen.
    pub fn get_f64(&self, key: &str) -> Result<f64, KeyError> {
        self.typed(key, "number", WireValue::as_f64)
    }

    /// Typed get of a string.
    pub fn get_str(&self, key: &str) -> Result<&str, KeyError> {
        self.typed(key, "string", WireValue::as_str)
    }

    /// Typed get of an array.
    pub fn get_array(&self, key: &str) -> Result<&[WireValue], KeyError> {
        self.typed(key, "array", WireValue::as_array)
    }

    /// Typed get of a nested object.
    pub fn get_object(&self, key: &str) -> Result<&WireObject, KeyError> {
        self.typed(key, "object", WireValue::as_object)
    }

    fn typed<'a, T>(
        &'a self,
        key: &str,
        expected: &'static str,
        accessor: impl FnOnce(&'a WireValue) -> Option<T>,
    ) -> Result<T, KeyError> {
        let value = self
            .get(key)
            .ok_or_else(|| KeyError::NotFound(key.to_string()))?;
        let got = value.kind_name();
        accessor(value).ok_or(KeyError::WrongKind {
            key: key.to_string(),
            expected,
            got,
        })
    }
}

impl FromIterator<(String, WireValue)> for WireObject {
    fn from_iter<I: IntoIterator<Item = (String, WireValue)>>(iter: I) -> Self {
        let mut object = Self::new();
        for (key, value) in iter {
            object.set(key, value);
        }
        object
    }
}
