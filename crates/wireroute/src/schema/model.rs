// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The protocol graph: domains, commands, events, and parameters.
//!
//! The graph is immutable once built and index-addressable: every
//! domain, command, and event is reachable through a stable id handed
//! out at build time. Dispatchers bind handlers to those ids, so call
//! routing never performs free-form name lookup beyond the initial
//! method resolution.

use crate::schema::types::TypeKind;

/// Stable handle to a domain within its protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DomainId(pub(crate) u16);

/// Stable handle to a command within its protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandId {
    pub(crate) domain: u16,
    pub(crate) index: u16,
}

impl CommandId {
    /// The owning domain.
    pub fn domain(self) -> DomainId {
        DomainId(self.domain)
    }
}

/// Stable handle to an event within its protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventId {
    pub(crate) domain: u16,
    pub(crate) index: u16,
}

impl EventId {
    /// The owning domain.
    pub fn domain(self) -> DomainId {
        DomainId(self.domain)
    }
}

/// Direction a parameter travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Supplied by the caller with the command
    Call,
    /// Produced by the handler for the response
    Return,
    /// Carried on a server-to-peer notification
    Event,
}

/// A typed, named parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Wire key
    pub name: String,
    /// Travel direction; fixed at load
    pub direction: Direction,
    /// Whether the parameter may be absent
    pub optional: bool,
    /// Wire shape
    pub kind: TypeKind,
}

impl Parameter {
    pub(crate) fn new(
        name: impl Into<String>,
        direction: Direction,
        optional: bool,
        kind: TypeKind,
    ) -> Self {
        Self {
            name: name.into(),
            direction,
            optional,
            kind,
        }
    }
}

/// A caller-invokable operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Command name, unique within its domain
    pub name: String,
    /// Asynchronous commands respond through a completion object
    pub is_async: bool,
    /// Caller-supplied parameters, in declaration order
    pub call_params: Vec<Parameter>,
    /// Response parameters, in declaration order. For asynchronous
    /// commands these are delivered exclusively by the completion
    /// object, never by the synchronous response path.
    pub return_params: Vec<Parameter>,
}

impl Command {
    /// Position of a return parameter by wire key.
    pub fn return_index(&self, name: &str) -> Option<usize> {
        self.return_params.iter().position(|p| p.name == name)
    }
}

/// A server-to-peer notification with no corresponding request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Event name, unique within its domain
    pub name: String,
    /// Output parameters, in declaration order
    pub params: Vec<Parameter>,
}

/// A named grouping of related commands and events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    /// Domain name, unique within the protocol
    pub name: String,
    /// Commands, in declaration order
    pub commands: Vec<Command>,
    /// Events, in declaration order
    pub events: Vec<Event>,
}

impl Domain {
    /// Position of a command by name.
    pub fn command_index(&self, name: &str) -> Option<usize> {
        self.commands.iter().position(|c| c.name == name)
    }

    /// Position of an event by name.
    pub fn event_index(&self, name: &str) -> Option<usize> {
        self.events.iter().position(|e| e.name == name)
    }
}

/// A fully loaded, typechecked protocol graph.
///
/// Built once through [`ProtocolBuilder`](crate::schema::ProtocolBuilder)
/// and shared immutably behind an `Arc` by routers, dispatchers, and
/// completion objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Protocol {
    pub(crate) domains: Vec<Domain>,
}

impl Protocol {
    /// Domains, in declaration order.
    pub fn domains(&self) -> impl Iterator<Item = (DomainId, &Domain)> {
        self.domains
            .iter()
            .enumerate()
            .map(|(i, d)| (DomainId(i as u16), d))
    }

    /// Look up a domain by name.
    pub fn domain_id(&self, name: &str) -> Option<DomainId> {
        self.domains
            .iter()
            .position(|d| d.name == name)
            .map(|i| DomainId(i as u16))
    }

    /// The domain behind an id.
    ///
    /// Ids are only minted by the builder for this protocol, so the
    /// lookup is infallible for well-typed callers; a stale id from a
    /// different protocol yields `None`.
    pub fn domain(&self, id: DomainId) -> Option<&Domain> {
        self.domains.get(id.0 as usize)
    }

    /// The command behind an id.
    pub fn command(&self, id: CommandId) -> Option<&Command> {
        self.domains
            .get(id.domain as usize)?
            .commands
            .get(id.index as usize)
    }

    /// The event behind an id.
    pub fn event(&self, id: EventId) -> Option<&Event> {
        self.domains
            .get(id.domain as usize)?
            .events
            .get(id.index as usize)
    }

    /// Resolve `domain.command` names into a command id.
    pub fn command_id(&self, domain: &str, command: &str) -> Option<CommandId> {
        let domain_index = self.domains.iter().position(|d| d.name == domain)?;
        let index = self.domains[domain_index].command_index(command)?;
        Some(CommandId {
            domain: domain_index as u16,
            index: index as u16,
        })
    }

    /// Resolve `domain.event` names into an event id.
    pub fn event_id(&self, domain: &str, event: &str) -> Option<EventId> {
        let domain_index = self.domains.iter().position(|d| d.name == domain)?;
        let index = self.domains[domain_index].event_index(event)?;
        Some(EventId {
            domain: domain_index as u16,
            index: index as u16,
        })
    }
}
