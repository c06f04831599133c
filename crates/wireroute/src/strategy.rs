// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dispatch strategy selection.
//!
//! Small domains route through an ordered comparison chain (first
//! match wins, schema declaration order); large domains route through
//! a sorted lookup table resolved once per message. The two shapes are
//! semantically equivalent: exactly one command name resolves to
//! exactly one command id, and an unrecognized name resolves to
//! nothing; it never falls through to an arbitrary handler.

use crate::schema::{CommandId, Domain, DomainId};

/// Largest command count still routed through a comparison chain.
pub const CHAIN_THRESHOLD: usize = 5;

/// The routing shape chosen for a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStrategy {
    /// Ordered if/else-if comparisons; wins on locality for few commands
    Chained,
    /// Sorted name table, near-constant lookup cost
    LookupTable,
}

impl DispatchStrategy {
    /// Choose a strategy for a domain with `command_count` commands.
    pub fn select(command_count: usize) -> Self {
        if command_count <= CHAIN_THRESHOLD {
            Self::Chained
        } else {
            Self::LookupTable
        }
    }
}

/// A synthesized method-name router for one domain.
#[derive(Debug, Clone)]
pub enum RouteShape {
    /// Entries in schema declaration order, scanned until first match
    Chained(Vec<(String, CommandId)>),
    /// Entries sorted by name, binary-searched
    Table(Vec<(String, CommandId)>),
}

impl RouteShape {
    /// Synthesize the routing shape for a domain.
    pub fn synthesize(domain_id: DomainId, domain: &Domain) -> Self {
        let entries: Vec<(String, CommandId)> = domain
            .commands
            .iter()
            .enumerate()
            .map(|(index, command)| {
                (
                    command.name.clone(),
                    CommandId {
                        domain: domain_id.0,
                        index: index as u16,
                    },
                )
            })
            .collect();

        match DispatchStrategy::select(entries.len()) {
            DispatchStrategy::Chained => Self::Chained(entries),
            DispatchStrategy::LookupTable => {
                let mut sorted = entries;
                sorted.sort_by(|a, b| a.0.cmp(&b.0));
                Self::Table(sorted)
            }
        }
    }

    /// The strategy behind this shape.
    pub fn strategy(&self) -> DispatchStrategy {
        match self {
            Self::Chained(_) => DispatchStrategy::Chained,
            Self::Table(_) => DispatchStrategy::LookupTable,
        }
    }

    /// Resolve a method name to its command id.
    pub fn resolve(&self, method: &str) -> Option<CommandId> {
        match self {
            Self::Chained(entries) => entries
                .iter()
                .find(|(name, _)| name == method)
                .map(|(_, id)| *id),
            Self::Table(entries) => entries
                .binary_search_by(|(name, _)| name.as_str().cmp(method))
                .ok()
                .map(|index| entries[index].1),
        }
    }
}
