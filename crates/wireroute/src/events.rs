// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Event emission.
//!
//! Events are server-to-peer notifications with no corresponding
//! request. An emitter is bound to one domain and builds each
//! notification payload with the same emission rules responses use,
//! so optional event parameters and enum constants behave identically
//! in both directions.

use crate::error::BindError;
use crate::marshal;
use crate::response::Responder;
use crate::schema::{DomainId, EventId, Protocol};
use crate::wire::{WireObject, WireValue};
use std::sync::Arc;

/// Emits a domain's events through the peer channel.
pub struct EventEmitter {
    protocol: Arc<Protocol>,
    domain: DomainId,
    name: String,
    responder: Responder,
}

impl EventEmitter {
    /// Create an emitter for `domain`.
    pub fn new(
        protocol: Arc<Protocol>,
        domain: &str,
        responder: Responder,
    ) -> Result<Self, BindError> {
        let domain_id = protocol
            .domain_id(domain)
            .ok_or_else(|| BindError::UnknownDomain(domain.to_string()))?;
        Ok(Self {
            protocol,
            domain: domain_id,
            name: domain.to_string(),
            responder,
        })
    }

    /// Stable id of a declared event, for repeated emission without
    /// name lookup.
    pub fn event_id(&self, event: &str) -> Result<EventId, BindError> {
        self.protocol
            .event_id(&self.name, event)
            .ok_or_else(|| BindError::UnknownEvent {
                domain: self.name.clone(),
                event: event.to_string(),
            })
    }

    /// Emit an event by name.
    ///
    /// `values` are matched positionally against the event's declared
    /// parameters.
    pub fn emit(&self, event: &str, values: &[Option<WireValue>]) -> Result<(), BindError> {
        let id = self.event_id(event)?;
        self.emit_by_id(id, values)
    }

    /// Emit an event by stable id.
    pub fn emit_by_id(&self, id: EventId, values: &[Option<WireValue>]) -> Result<(), BindError> {
        let event = self
            .protocol
            .event(id)
            .filter(|_| id.domain() == self.domain)
            .ok_or_else(|| BindError::UnknownEvent {
                domain: self.name.clone(),
                event: String::new(),
            })?;

        if values.len() > event.params.len() {
            log::warn!(
                "Event {}.{} received {} values for {} parameters; extras ignored",
                self.name,
                event.name,
                values.len(),
                event.params.len()
            );
        }

        let method = format!("{}.{}", self.name, event.name);
        if event.params.is_empty() {
            self.responder.send_event(&method, None);
            return Ok(());
        }

        let mut params = WireObject::new();
        for (index, param) in event.params.iter().enumerate() {
            let value = values.get(index).and_then(Option::as_ref);
            marshal::emit(&mut params, param, value);
        }
        self.responder.send_event(&method, Some(params));
        Ok(())
    }
}
