// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Protocol schema: the immutable domain/command/event graph.
//!
//! The schema is the declarative input everything else is synthesized
//! from. It is built once through [`ProtocolBuilder`], validated, and
//! then shared behind an `Arc`; nothing mutates it afterwards.

mod builder;
mod model;
mod types;

pub use builder::{CommandBuilder, DomainBuilder, EventBuilder, ProtocolBuilder};
pub use model::{
    Command, CommandId, Direction, Domain, DomainId, Event, EventId, Parameter, Protocol,
};
pub use types::{EnumDescriptor, ScalarKind, TypeKind};
