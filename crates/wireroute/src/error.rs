// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for schema construction, dispatcher assembly, and dispatch.

use std::fmt;

/// Protocol-level error codes carried in error responses.
///
/// Wire values follow the JSON-RPC convention used by inspector-style
/// protocols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ErrorCode {
    /// Message text could not be decoded at all
    ParseError = -32700,
    /// Envelope was decoded but is not a valid call
    InvalidRequest = -32600,
    /// Method names no known domain or command
    MethodNotFound = -32601,
    /// Call parameters failed validation
    InvalidParams = -32602,
    /// Dispatcher-internal failure
    InternalError = -32603,
    /// Handler-reported failure
    ServerError = -32000,
}

impl ErrorCode {
    /// Wire representation (safe: `#[repr(i32)]` guarantees exact values).
    pub fn wire_code(self) -> i32 {
        self as i32
    }

    /// Convert from a wire code, if it names a known error.
    pub fn from_wire_code(value: i32) -> Option<Self> {
        match value {
            -32700 => Some(Self::ParseError),
            -32600 => Some(Self::InvalidRequest),
            -32601 => Some(Self::MethodNotFound),
            -32602 => Some(Self::InvalidParams),
            -32603 => Some(Self::InternalError),
            -32000 => Some(Self::ServerError),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ParseError => "parse error",
            Self::InvalidRequest => "invalid request",
            Self::MethodNotFound => "method not found",
            Self::InvalidParams => "invalid params",
            Self::InternalError => "internal error",
            Self::ServerError => "server error",
        };
        write!(f, "{}", name)
    }
}

/// Errors raised while building a protocol graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A domain name was declared twice
    DuplicateDomain(String),
    /// A command name was declared twice within a domain
    DuplicateCommand { domain: String, command: String },
    /// An event name was declared twice within a domain
    DuplicateEvent { domain: String, event: String },
    /// A parameter name was declared twice within a parameter list
    DuplicateParameter { owner: String, parameter: String },
    /// An enum type was declared with no constants
    EmptyEnum(String),
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateDomain(name) => write!(f, "Duplicate domain: {}", name),
            Self::DuplicateCommand { domain, command } => {
                write!(f, "Duplicate command in domain {}: {}", domain, command)
            }
            Self::DuplicateEvent { domain, event } => {
                write!(f, "Duplicate event in domain {}: {}", domain, event)
            }
            Self::DuplicateParameter { owner, parameter } => {
                write!(f, "Duplicate parameter in {}: {}", owner, parameter)
            }
            Self::EmptyEnum(name) => write!(f, "Enum type {} has no constants", name),
        }
    }
}

impl std::error::Error for SchemaError {}

/// Errors raised while assembling a domain dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    /// Domain name not present in the protocol
    UnknownDomain(String),
    /// The domain declares no commands, so no dispatcher body exists
    EmptyDomain(String),
    /// A handler was bound to a command the domain does not declare
    UnknownCommand { domain: String, command: String },
    /// A command was left without a handler
    UnboundCommand { domain: String, command: String },
    /// A synchronous handler was bound to an asynchronous command, or
    /// the other way around
    HandlerKindMismatch {
        domain: String,
        command: String,
        command_is_async: bool,
    },
    /// A dispatcher for the same domain was registered twice
    DuplicateDispatcher(String),
    /// An emitter was asked for an event the domain does not declare
    UnknownEvent { domain: String, event: String },
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownDomain(name) => write!(f, "Unknown domain: {}", name),
            Self::EmptyDomain(name) => {
                write!(f, "Domain {} declares no commands; nothing to dispatch", name)
            }
            Self::UnknownCommand { domain, command } => {
                write!(f, "Domain {} declares no command named {}", domain, command)
            }
            Self::UnboundCommand { domain, command } => {
                write!(f, "Command {}.{} has no bound handler", domain, command)
            }
            Self::HandlerKindMismatch {
                domain,
                command,
                command_is_async,
            } => {
                let (bound, declared) = if *command_is_async {
                    ("synchronous", "asynchronous")
                } else {
                    ("asynchronous", "synchronous")
                };
                write!(
                    f,
                    "A {} handler was bound to {} command {}.{}",
                    bound, declared, domain, command
                )
            }
            Self::DuplicateDispatcher(name) => {
                write!(f, "A dispatcher for domain {} is already registered", name)
            }
            Self::UnknownEvent { domain, event } => {
                write!(f, "Domain {} declares no event named {}", domain, event)
            }
        }
    }
}

impl std::error::Error for BindError {}

/// A handler-reported failure, terminal for the call that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandError {
    /// Protocol error code for the response (defaults to `ServerError`)
    pub code: ErrorCode,
    /// Non-empty error description
    pub message: String,
}

impl CommandError {
    /// Server-side failure with the default code.
    pub fn server(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::ServerError,
            message: message.into(),
        }
    }

    /// Failure with an explicit code.
    pub fn with_code(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for CommandError {}

impl From<String> for CommandError {
    fn from(message: String) -> Self {
        Self::server(message)
    }
}

impl From<&str> for CommandError {
    fn from(message: &str) -> Self {
        Self::server(message)
    }
}
