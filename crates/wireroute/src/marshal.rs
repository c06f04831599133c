// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Parameter marshalling rules.
//!
//! A pure mapping from (type kind, optionality, direction) to the
//! extraction rule used when reading a parameter out of an incoming
//! message and the emission rule used when writing one into an
//! outgoing message. The table has no overrides:
//!
//! - required parameters extract directly; a missing key or wrong
//!   shape is a decode failure,
//! - optional parameters degrade to absent on any decode failure,
//! - emission skips absent optionals entirely (no key written),
//! - enum values cross the wire only as declared constant strings,
//!   never as ordinals, in both directions.

use crate::schema::{Parameter, ScalarKind, TypeKind};
use crate::wire::{WireObject, WireValue};

/// Per-call accumulation of decode failures.
///
/// Failures are recorded without aborting extraction of sibling
/// parameters and surface only if the handler itself reports failure.
#[derive(Debug, Default)]
pub struct DecodeErrors {
    errors: Vec<String>,
}

impl DecodeErrors {
    /// Start an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one failure description.
    pub fn push(&mut self, message: String) {
        self.errors.push(message);
    }

    /// Whether any failure was recorded.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Recorded descriptions, oldest first.
    pub fn as_slice(&self) -> &[String] {
        &self.errors
    }
}

/// Extraction rule: read one parameter out of the incoming parameter
/// container.
///
/// Presence is the `Some`/`None` of the returned value. Required
/// parameters that are missing or wrong-shaped record a failure in
/// `errors` and come back absent; optional ones degrade to absent
/// silently (debug-logged).
pub fn extract(
    container: Option<&WireObject>,
    param: &Parameter,
    errors: &mut DecodeErrors,
) -> Option<WireValue> {
    let found = container.and_then(|c| c.get(&param.name));

    let value = match found {
        None | Some(WireValue::Null) => {
            if !param.optional {
                errors.push(format!(
                    "Parameter '{}' with type '{}' was not found",
                    param.name,
                    param.kind.name()
                ));
            }
            return None;
        }
        Some(value) => value,
    };

    match check_shape(value, &param.kind) {
        Ok(()) => Some(value.clone()),
        Err(reason) => {
            if param.optional {
                log::debug!(
                    "Optional parameter '{}' failed to decode, treating as absent: {}",
                    param.name,
                    reason
                );
            } else {
                errors.push(format!(
                    "Parameter '{}' with type '{}' has the wrong shape: {}",
                    param.name,
                    param.kind.name(),
                    reason
                ));
            }
            None
        }
    }
}

/// Emission rule: write one parameter into the outgoing result
/// container.
///
/// Absent optionals are skipped entirely. Enum values are mapped to
/// their declared wire constant (an integer ordinal supplied by a
/// handler is translated; an undeclared constant is refused). A
/// missing or malformed value for a required parameter is skipped with
/// a warning rather than failing the call.
pub fn emit(result: &mut WireObject, param: &Parameter, value: Option<&WireValue>) {
    let value = match value {
        None | Some(WireValue::Null) => {
            if !param.optional {
                log::warn!(
                    "Required parameter '{}' has no value to emit; key skipped",
                    param.name
                );
            }
            return;
        }
        Some(value) => value,
    };

    if let Some(desc) = param.kind.as_enum() {
        // Ordinals never cross the wire.
        let constant = match value {
            WireValue::String(s) if desc.constant_index(s).is_some() => Some(s.clone()),
            WireValue::String(s) => {
                log::warn!(
                    "'{}' is not a declared constant of enum {}; key '{}' skipped",
                    s,
                    desc.name,
                    param.name
                );
                None
            }
            WireValue::Int(i) => {
                let mapped = usize::try_from(*i).ok().and_then(|i| desc.constant(i));
                if mapped.is_none() {
                    log::warn!(
                        "Ordinal {} is out of range for enum {}; key '{}' skipped",
                        i,
                        desc.name,
                        param.name
                    );
                }
                mapped.map(str::to_string)
            }
            other => {
                log::warn!(
                    "Enum parameter '{}' cannot be emitted from a {} value; key skipped",
                    param.name,
                    other.kind_name()
                );
                None
            }
        };
        if let Some(constant) = constant {
            result.set(param.name.clone(), constant);
        }
        return;
    }

    match check_shape(value, &param.kind) {
        Ok(()) => result.set(param.name.clone(), value.clone()),
        Err(reason) => {
            log::warn!(
                "Parameter '{}' with type '{}' cannot be emitted: {}; key skipped",
                param.name,
                param.kind.name(),
                reason
            );
        }
    }
}

/// Validate a value against a type kind.
fn check_shape(value: &WireValue, kind: &TypeKind) -> Result<(), String> {
    match kind {
        TypeKind::Scalar(ScalarKind::Boolean) => {
            value.as_bool().map(|_| ()).ok_or_else(|| mismatch(value, "boolean"))
        }
        TypeKind::Scalar(ScalarKind::Integer) => {
            value.as_i64().map(|_| ()).ok_or_else(|| mismatch(value, "integer"))
        }
        TypeKind::Scalar(ScalarKind::Number) => {
            value.as_f64().map(|_| ()).ok_or_else(|| mismatch(value, "number"))
        }
        TypeKind::Scalar(ScalarKind::String) => {
            value.as_str().map(|_| ()).ok_or_else(|| mismatch(value, "string"))
        }
        TypeKind::Enum(desc) => {
            let s = value
                .as_str()
                .ok_or_else(|| mismatch(value, "enum constant string"))?;
            if desc.constant_index(s).is_some() {
                Ok(())
            } else {
                Err(format!(
                    "'{}' is not a declared constant of enum {}",
                    s, desc.name
                ))
            }
        }
        TypeKind::Array(element) => {
            let items = value.as_array().ok_or_else(|| mismatch(value, "array"))?;
            for (index, item) in items.iter().enumerate() {
                check_shape(item, element).map_err(|reason| format!("element {}: {}", index, reason))?;
            }
            Ok(())
        }
        TypeKind::ObjectRef(_) => {
            value.as_object().map(|_| ()).ok_or_else(|| mismatch(value, "object"))
        }
    }
}

fn mismatch(value: &WireValue, expected: &str) -> String {
    format!("got {}, expected {}", value.kind_name(), expected)
}
