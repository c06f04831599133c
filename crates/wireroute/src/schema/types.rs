// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Parameter type descriptors.
//!
//! A [`TypeKind`] classifies a parameter's wire shape and answers the
//! three questions marshalling and signature emission need:
//! which accessor extracts it, whether an optional value of this kind
//! needs a presence flag in a generated signature, and whether values
//! of this kind pass by reference.

use crate::error::SchemaError;
use std::fmt;
use std::sync::Arc;

/// Scalar primitive kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Boolean,
    Integer,
    Number,
    String,
}

impl ScalarKind {
    /// Name used in decode error messages and generated signatures.
    pub fn name(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::String => "string",
        }
    }
}

/// Type kind of a parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    /// Scalar primitive.
    Scalar(ScalarKind),
    /// Enumeration over declared wire constant strings.
    Enum(Arc<EnumDescriptor>),
    /// Array of a uniform element kind.
    Array(Box<TypeKind>),
    /// Reference to a named protocol object, opaque to dispatch.
    ObjectRef(String),
}

impl TypeKind {
    /// Shorthand for an array of `element`.
    pub fn array_of(element: TypeKind) -> Self {
        Self::Array(Box::new(element))
    }

    /// Whether an optional value of this kind needs an explicit presence
    /// flag in a generated signature.
    ///
    /// Value scalars (bool/int/number) have no natural absent sentinel.
    /// Strings, arrays, and object references are null-checkable, and
    /// enums are checked by value.
    pub fn needs_presence_wrapper(&self) -> bool {
        matches!(
            self,
            Self::Scalar(ScalarKind::Boolean | ScalarKind::Integer | ScalarKind::Number)
        )
    }

    /// Whether values of this kind pass by reference in generated
    /// signatures (strings, arrays, and object references do; value
    /// scalars and enum constants are copied).
    pub fn passes_by_reference(&self) -> bool {
        matches!(
            self,
            Self::Scalar(ScalarKind::String) | Self::Array(_) | Self::ObjectRef(_)
        )
    }

    /// The enum descriptor, if this is an enum kind.
    pub fn as_enum(&self) -> Option<&Arc<EnumDescriptor>> {
        match self {
            Self::Enum(desc) => Some(desc),
            _ => None,
        }
    }

    /// Name used in decode error messages.
    pub fn name(&self) -> String {
        match self {
            Self::Scalar(kind) => kind.name().to_string(),
            Self::Enum(desc) => format!("enum {}", desc.name),
            Self::Array(element) => format!("array of {}", element.name()),
            Self::ObjectRef(name) => format!("object {}", name),
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Enumeration descriptor: the declared wire constant strings.
///
/// Enum values cross the wire exclusively as one of these constants;
/// ordinals never appear in messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDescriptor {
    /// Type name (for diagnostics and generated signatures)
    pub name: String,
    /// Declared constants, in declaration order
    pub constants: Vec<String>,
}

impl EnumDescriptor {
    /// Create a descriptor; fails on an empty constant set.
    pub fn new(
        name: impl Into<String>,
        constants: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Arc<Self>, SchemaError> {
        let name = name.into();
        let constants: Vec<String> = constants.into_iter().map(Into::into).collect();
        if constants.is_empty() {
            return Err(SchemaError::EmptyEnum(name));
        }
        Ok(Arc::new(Self { name, constants }))
    }

    /// Ordinal of a declared constant, if present.
    pub fn constant_index(&self, value: &str) -> Option<usize> {
        self.constants.iter().position(|c| c == value)
    }

    /// Declared constant at an ordinal, if in range.
    pub fn constant(&self, index: usize) -> Option<&str> {
        self.constants.get(index).map(String::as_str)
    }
}
