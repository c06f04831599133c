// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-command routes: extraction, invocation, and response emission.
//!
//! One [`CommandRoute`] is synthesized per command at dispatcher
//! assembly. A dispatched call runs through it in order: extract every
//! call parameter (best effort), hand off to the alternate dispatcher
//! if one is installed, otherwise invoke the bound handler and emit
//! the response. Nothing of a call outlives its dispatch except an
//! asynchronous command's completion object.

use crate::completion::Completion;
use crate::dispatcher::AlternateDispatcher;
use crate::error::CommandError;
use crate::marshal::{self, DecodeErrors};
use crate::response::{CallId, Responder};
use crate::schema::{Command, CommandId, Protocol};
use crate::wire::{WireObject, WireValue};
use std::sync::Arc;

/// Extracted call arguments, positionally aligned with the command's
/// call parameters. Absent optionals (and required parameters that
/// failed to decode) are `None`.
#[derive(Debug)]
pub struct CallArgs {
    values: Vec<(String, Option<WireValue>)>,
}

impl CallArgs {
    /// Run the extraction rules for every call parameter of `command`
    /// against the incoming parameter container.
    ///
    /// Extraction is best effort: a failed required parameter records
    /// a decode error and extraction of the remaining parameters
    /// continues. The handler can therefore observe an absent required
    /// argument; rejecting the call on decode failure alone is
    /// deliberately not done here.
    pub(crate) fn extract(
        command: &Command,
        params: Option<&WireObject>,
        errors: &mut DecodeErrors,
    ) -> Self {
        let values = command
            .call_params
            .iter()
            .map(|param| (param.name.clone(), marshal::extract(params, param, errors)))
            .collect();
        Self { values }
    }

    /// Number of call parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the command declares no call parameters.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The extracted value of a parameter, absent ones as `None`.
    pub fn get(&self, name: &str) -> Option<&WireValue> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| v.as_ref())
    }

    /// Presence flag for a parameter.
    pub fn is_present(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Typed convenience accessors.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(WireValue::as_bool)
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(WireValue::as_i64)
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(WireValue::as_f64)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(WireValue::as_str)
    }

    pub fn get_array(&self, name: &str) -> Option<&[WireValue]> {
        self.get(name).and_then(WireValue::as_array)
    }

    pub fn get_object(&self, name: &str) -> Option<&WireObject> {
        self.get(name).and_then(WireValue::as_object)
    }
}

/// Fresh output slots for a synchronous command, positionally aligned
/// with its return parameters. Handlers fill them by name; unset slots
/// are treated as absent at emission.
#[derive(Debug)]
pub struct OutSlots {
    slots: Vec<(String, Option<WireValue>)>,
}

impl OutSlots {
    fn for_command(command: &Command) -> Self {
        Self {
            slots: command
                .return_params
                .iter()
                .map(|param| (param.name.clone(), None))
                .collect(),
        }
    }

    /// Assign a return value by parameter name. Returns `false` (and
    /// assigns nothing) if the command declares no such return
    /// parameter.
    pub fn set(&mut self, name: &str, value: impl Into<WireValue>) -> bool {
        match self.slots.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => {
                slot.1 = Some(value.into());
                true
            }
            None => {
                log::warn!("No return parameter named '{}'; value dropped", name);
                false
            }
        }
    }

    fn take(self) -> Vec<Option<WireValue>> {
        self.slots.into_iter().map(|(_, v)| v).collect()
    }
}

/// Handler for a synchronous command.
pub type SyncHandler = Box<dyn Fn(&CallArgs, &mut OutSlots) -> Result<(), CommandError> + Send + Sync>;

/// Handler for an asynchronous command. An `Err` return reports an
/// immediate failure (a precondition check before deferred work
/// starts); on `Ok` the eventual response is the completion object's
/// responsibility.
pub type AsyncHandler = Box<dyn Fn(&CallArgs, Completion) -> Result<(), CommandError> + Send + Sync>;

pub(crate) enum CommandHandler {
    Sync(SyncHandler),
    Async(AsyncHandler),
}

impl CommandHandler {
    pub(crate) fn is_async(&self) -> bool {
        matches!(self, Self::Async(_))
    }
}

/// One command's routing entry: the bound handler plus everything the
/// per-call run needs from the schema.
pub(crate) struct CommandRoute {
    pub(crate) id: CommandId,
    pub(crate) handler: CommandHandler,
}

impl CommandRoute {
    /// Run one call through the route.
    pub(crate) fn dispatch(
        &self,
        protocol: &Arc<Protocol>,
        responder: &Responder,
        alternate: Option<&dyn AlternateDispatcher>,
        call_id: CallId,
        params: Option<&WireObject>,
    ) {
        let Some(command) = protocol.command(self.id) else {
            log::error!("Route bound to a command missing from the protocol");
            responder.send_failure(
                call_id,
                crate::error::ErrorCode::InternalError,
                "Internal error",
                &[],
            );
            return;
        };

        let mut errors = DecodeErrors::new();
        let args = CallArgs::extract(command, params, &mut errors);

        // An installed alternate takes the call whole; the default
        // handler is never consulted.
        if let Some(alternate) = alternate {
            log::debug!("Delegating '{}' to the alternate dispatcher", command.name);
            alternate.dispatch(call_id, &command.name, &args);
            return;
        }

        match &self.handler {
            CommandHandler::Sync(handler) => {
                let mut outs = OutSlots::for_command(command);
                match handler(&args, &mut outs) {
                    Ok(()) => {
                        let mut result = WireObject::new();
                        for (param, value) in command.return_params.iter().zip(outs.take()) {
                            marshal::emit(&mut result, param, value.as_ref());
                        }
                        responder.send_success(call_id, result);
                    }
                    Err(error) => {
                        // Result keys are only populated on success.
                        responder.send_failure(
                            call_id,
                            error.code,
                            &error.message,
                            errors.as_slice(),
                        );
                    }
                }
            }
            CommandHandler::Async(handler) => {
                let completion = Completion::new(
                    responder.clone(),
                    protocol.clone(),
                    self.id,
                    call_id,
                );
                if let Err(error) = handler(&args, completion.clone()) {
                    // An immediate failure forecloses the deferred
                    // response; going through the completion's gate
                    // keeps the one-response guarantee even if the
                    // handler already raced a worker completion.
                    completion.abort(error.code, &error.message, errors.as_slice());
                }
            }
        }
    }
}
