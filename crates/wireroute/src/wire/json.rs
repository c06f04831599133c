// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! JSON text at the channel boundary.
//!
//! Serialization is a manual `serde` impl so that object keys keep
//! their insertion order; deserialization goes through
//! `serde_json::Value` since key order of incoming messages carries no
//! meaning.

use crate::wire::object::WireObject;
use crate::wire::value::WireValue;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

impl Serialize for WireValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Bool(v) => serializer.serialize_bool(*v),
            Self::Int(v) => serializer.serialize_i64(*v),
            Self::Number(v) => serializer.serialize_f64(*v),
            Self::String(v) => serializer.serialize_str(v),
            Self::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Object(obj) => obj.serialize(serializer),
            Self::Null => serializer.serialize_unit(),
        }
    }
}

impl Serialize for WireObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Serialize a message object to channel text.
pub fn to_text(object: &WireObject) -> String {
    // A WireObject has string keys and finite nesting; serialization
    // cannot fail.
    serde_json::to_string(object).unwrap_or_default()
}

/// Parse channel text into a wire value.
pub fn from_text(text: &str) -> Result<WireValue, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    Ok(convert(value))
}

fn convert(value: serde_json::Value) -> WireValue {
    match value {
        serde_json::Value::Null => WireValue::Null,
        serde_json::Value::Bool(v) => WireValue::Bool(v),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                WireValue::Int(i)
            } else {
                WireValue::Number(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        serde_json::Value::String(v) => WireValue::String(v),
        serde_json::Value::Array(items) => {
            WireValue::Array(items.into_iter().map(convert).collect())
        }
        serde_json::Value::Object(map) => {
            let mut object = WireObject::new();
            for (key, item) in map {
                object.set(key, convert(item));
            }
            WireValue::Object(object)
        }
    }
}
