// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # wireroute - Schema-driven backend dispatch for wire protocols
//!
//! A pure Rust routing core for inspector-style RPC protocols: load a
//! declarative schema of domains (commands and events with typed
//! parameters) once, bind a handler to every command, and let the
//! router take decoded wire messages to the right handler and carry
//! typed results back, including at-most-once deferred responses for
//! asynchronous commands.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use wireroute::{
//!     BufferChannel, DomainDispatcher, ProtocolBuilder, Responder, Router, ScalarKind, TypeKind,
//! };
//!
//! let protocol = ProtocolBuilder::new()
//!     .domain("Page", |d| {
//!         d.command("getTitle", |c| {
//!             c.returns("title", TypeKind::Scalar(ScalarKind::String))
//!         })
//!     })
//!     .build()
//!     .unwrap();
//!
//! let channel = Arc::new(BufferChannel::new());
//! let responder = Responder::new(channel.clone());
//!
//! let dispatcher = DomainDispatcher::builder(protocol.clone(), "Page", responder.clone())
//!     .unwrap()
//!     .handle("getTitle", |_args, outs| {
//!         outs.set("title", "hello");
//!         Ok(())
//!     })
//!     .unwrap()
//!     .build()
//!     .unwrap();
//!
//! let mut router = Router::new(protocol, responder);
//! router.register(dispatcher).unwrap();
//!
//! router.dispatch_text(r#"{"id":1,"method":"Page.getTitle"}"#);
//! assert_eq!(channel.take(), [r#"{"id":1,"result":{"title":"hello"}}"#]);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +--------------------------------------------------------------+
//! |                        Router shell                          |
//! |   envelope decode | Domain.command split | protocol errors   |
//! +--------------------------------------------------------------+
//! |                     Domain dispatchers                       |
//! |   routing shape (chain/table) | handler binding | alternate  |
//! +--------------------------------------------------------------+
//! |                      Command routes                          |
//! |   extraction | invocation | response emission | completions  |
//! +--------------------------------------------------------------+
//! |                  Wire / channel boundary                     |
//! |   WireObject get/set by key | JSON text | WireChannel.send   |
//! +--------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Protocol`] | Immutable schema graph, built once and shared |
//! | [`Router`] | Entry point: decodes envelopes, routes to domains |
//! | [`DomainDispatcher`] | Routes one domain's commands to handlers |
//! | [`Completion`] | Single-fire handle for asynchronous responses |
//! | [`WireObject`] | Generic key-value message object |
//! | [`WireChannel`] | "Send serialized message to peer" boundary |

/// The peer channel abstraction and an in-memory implementation.
pub mod channel;
/// Single-fire completion objects for asynchronous commands.
pub mod completion;
/// Per-domain dispatcher assembly and the alternate-dispatcher capability.
pub mod dispatcher;
/// Handler-trait skeleton emission (schema to Rust source text).
pub mod emit;
/// Error codes and error types.
pub mod error;
/// Event notification emission.
pub mod events;
/// Parameter marshalling rules (extraction and emission).
pub mod marshal;
/// Response and notification envelopes.
pub mod response;
/// Per-command routes and handler invocation.
pub mod route;
/// The router shell: envelope validation and domain registry.
pub mod router;
/// The immutable protocol schema and its builder.
pub mod schema;
/// Dispatch strategy selection (comparison chain vs. lookup table).
pub mod strategy;
/// Generic wire values and message objects.
pub mod wire;

pub use channel::{BufferChannel, WireChannel};
pub use completion::Completion;
pub use dispatcher::{AlternateDispatcher, DispatcherBuilder, DomainDispatcher};
pub use error::{BindError, CommandError, ErrorCode, SchemaError};
pub use events::EventEmitter;
pub use response::{CallId, Responder};
pub use route::{CallArgs, OutSlots};
pub use router::Router;
pub use schema::{
    Command, CommandId, Direction, Domain, DomainId, EnumDescriptor, Event, EventId, Parameter,
    Protocol, ProtocolBuilder, ScalarKind, TypeKind,
};
pub use wire::{KeyError, WireObject, WireValue};

#[cfg(test)]
mod tests;
