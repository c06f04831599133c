// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The router shell.
//!
//! Owns the registry of domain dispatchers and the message envelope:
//! it decodes incoming text, validates the `id`/`method`/`params`
//! shape, splits `Domain.command` names, and reports protocol errors
//! for everything that never reaches a dispatcher. An unknown domain
//! or command is always answered with a method-not-found error, never
//! silently dropped.

use crate::dispatcher::{AlternateDispatcher, DomainDispatcher};
use crate::error::{BindError, ErrorCode};
use crate::response::{CallId, Responder};
use crate::schema::Protocol;
use crate::wire::{json, WireObject, WireValue};
use std::collections::HashMap;
use std::sync::Arc;

/// Routes decoded messages to registered domain dispatchers.
pub struct Router {
    protocol: Arc<Protocol>,
    responder: Responder,
    dispatchers: HashMap<String, DomainDispatcher>,
}

impl Router {
    /// Create a router for a protocol.
    pub fn new(protocol: Arc<Protocol>, responder: Responder) -> Self {
        Self {
            protocol,
            responder,
            dispatchers: HashMap::new(),
        }
    }

    /// The responder this router answers through.
    pub fn responder(&self) -> &Responder {
        &self.responder
    }

    /// Register a domain dispatcher.
    ///
    /// The dispatcher's domain must exist in this router's protocol
    /// and must not already be registered.
    pub fn register(&mut self, dispatcher: DomainDispatcher) -> Result<(), BindError> {
        let name = dispatcher.domain_name().to_string();
        if self.protocol.domain_id(&name).is_none() {
            return Err(BindError::UnknownDomain(name));
        }
        if self.dispatchers.contains_key(&name) {
            return Err(BindError::DuplicateDispatcher(name));
        }
        log::info!("Registered dispatcher for domain '{}'", name);
        self.dispatchers.insert(name, dispatcher);
        Ok(())
    }

    /// A registered dispatcher, by domain name.
    pub fn dispatcher(&self, domain: &str) -> Option<&DomainDispatcher> {
        self.dispatchers.get(domain)
    }

    /// Install an alternate dispatcher on a registered domain.
    /// Returns `false` if no dispatcher is registered for it.
    pub fn set_alternate(&self, domain: &str, alternate: Box<dyn AlternateDispatcher>) -> bool {
        match self.dispatchers.get(domain) {
            Some(dispatcher) => {
                dispatcher.set_alternate(alternate);
                true
            }
            None => false,
        }
    }

    /// Decode one message from channel text and route it.
    pub fn dispatch_text(&self, text: &str) {
        let value = match json::from_text(text) {
            Ok(value) => value,
            Err(error) => {
                log::warn!("Dropping undecodable message: {}", error);
                self.responder.report_error(
                    None,
                    ErrorCode::ParseError,
                    "Message must be valid JSON",
                );
                return;
            }
        };
        match value {
            WireValue::Object(message) => self.dispatch(&message),
            _ => {
                self.responder.report_error(
                    None,
                    ErrorCode::InvalidRequest,
                    "Message must be an object",
                );
            }
        }
    }

    /// Route one decoded message.
    pub fn dispatch(&self, message: &WireObject) {
        let Some(call_id) = message.get("id").and_then(WireValue::as_i64) else {
            self.responder.report_error(
                None,
                ErrorCode::InvalidRequest,
                "The 'id' property is missing or not an integer",
            );
            return;
        };
        let call_id = CallId(call_id);

        let Some(method) = message.get("method").and_then(WireValue::as_str) else {
            self.responder.report_error(
                Some(call_id),
                ErrorCode::InvalidRequest,
                "The 'method' property is missing or not a string",
            );
            return;
        };

        let params = match message.get("params") {
            None | Some(WireValue::Null) => None,
            Some(WireValue::Object(params)) => Some(params),
            Some(_) => {
                self.responder.report_error(
                    Some(call_id),
                    ErrorCode::InvalidRequest,
                    "The 'params' property must be an object",
                );
                return;
            }
        };

        // Method names are 'Domain.command'; anything else can name no
        // registered command.
        let Some((domain, command)) = method.split_once('.') else {
            self.method_not_found(call_id, method);
            return;
        };

        let Some(dispatcher) = self.dispatchers.get(domain) else {
            self.method_not_found(call_id, method);
            return;
        };

        if !dispatcher.dispatch(call_id, command, params) {
            self.method_not_found(call_id, method);
        }
    }

    fn method_not_found(&self, call_id: CallId, method: &str) {
        log::debug!("No route for method '{}'", method);
        self.responder.send_failure(
            call_id,
            ErrorCode::MethodNotFound,
            &format!("'{}' was not found", method),
            &[],
        );
    }
}
