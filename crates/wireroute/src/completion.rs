// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Single-fire completion objects for asynchronous commands.
//!
//! An asynchronous handler receives a [`Completion`] instead of output
//! slots and delivers its response through it whenever the deferred
//! work finishes, possibly on another thread or never. The
//! object guarantees at most one response per call identity: the
//! Active→Disabled transition is an atomic test-and-set, so a double
//! completion (or a completion racing an error-path disable) results
//! in exactly one message on the channel.

use crate::error::ErrorCode;
use crate::marshal;
use crate::response::{CallId, Responder};
use crate::schema::{CommandId, Protocol};
use crate::wire::{WireObject, WireValue};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Single-fire handle for delivering an asynchronous command response.
///
/// Bound at creation to one responder, one call identity, and one
/// command's return-parameter list; never reused across calls. Cheap
/// to clone and safe to move into worker threads.
#[derive(Clone)]
pub struct Completion {
    inner: Arc<Inner>,
}

struct Inner {
    responder: Responder,
    protocol: Arc<Protocol>,
    command: CommandId,
    call_id: CallId,
    disabled: AtomicBool,
}

impl Completion {
    pub(crate) fn new(
        responder: Responder,
        protocol: Arc<Protocol>,
        command: CommandId,
        call_id: CallId,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                responder,
                protocol,
                command,
                call_id,
                disabled: AtomicBool::new(false),
            }),
        }
    }

    /// The bound call identity.
    pub fn call_id(&self) -> CallId {
        self.inner.call_id
    }

    /// Whether this completion can still fire.
    pub fn is_active(&self) -> bool {
        !self.inner.disabled.load(Ordering::SeqCst)
    }

    /// Transition Active→Disabled. Idempotent; once disabled, any
    /// `complete` attempt is swallowed.
    pub fn disable(&self) {
        self.inner.disabled.store(true, Ordering::SeqCst);
    }

    /// Disable and send an error response through the single-fire
    /// gate. Used by the dispatch error path so that a handler which
    /// reported an immediate failure after racing a worker completion
    /// still yields exactly one response.
    pub(crate) fn abort(&self, code: ErrorCode, message: &str, details: &[String]) -> bool {
        if self.inner.disabled.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.inner
            .responder
            .send_failure(self.inner.call_id, code, message, details);
        true
    }

    /// Deliver the response for the bound call.
    ///
    /// `values` are matched positionally against the command's return
    /// parameters and emitted under the same marshalling rules as
    /// synchronous results. A non-empty `error` sends an error
    /// response instead and the values are ignored.
    ///
    /// Returns `true` if this call fired the response, `false` if the
    /// completion had already fired or been disabled (the attempt is
    /// dropped, never surfaced to the peer).
    pub fn complete(&self, error: &str, values: &[Option<WireValue>]) -> bool {
        if self.inner.disabled.swap(true, Ordering::SeqCst) {
            log::debug!(
                "Dropping completion for already-answered call id {}",
                self.inner.call_id.0
            );
            return false;
        }

        if !error.is_empty() {
            self.inner
                .responder
                .send_failure(self.inner.call_id, ErrorCode::ServerError, error, &[]);
            return true;
        }

        let Some(command) = self.inner.protocol.command(self.inner.command) else {
            // Unreachable with ids minted by this protocol's routes.
            log::error!("Completion bound to a command missing from the protocol");
            self.inner.responder.send_failure(
                self.inner.call_id,
                ErrorCode::InternalError,
                "Internal error",
                &[],
            );
            return true;
        };

        if values.len() > command.return_params.len() {
            log::warn!(
                "Completion for {} received {} values for {} return parameters; extras ignored",
                command.name,
                values.len(),
                command.return_params.len()
            );
        }

        let mut result = WireObject::new();
        for (index, param) in command.return_params.iter().enumerate() {
            let value = values.get(index).and_then(Option::as_ref);
            marshal::emit(&mut result, param, value);
        }

        self.inner.responder.send_success(self.inner.call_id, result);
        true
    }

    /// Deliver a success response.
    pub fn succeed(&self, values: &[Option<WireValue>]) -> bool {
        self.complete("", values)
    }

    /// Deliver an error response. An empty message is replaced so the
    /// peer always sees a description.
    pub fn fail(&self, message: &str) -> bool {
        let message = if message.is_empty() {
            "Internal error"
        } else {
            message
        };
        self.complete(message, &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::BufferChannel;
    use crate::schema::{ProtocolBuilder, ScalarKind, TypeKind};

    fn fixture() -> (Arc<BufferChannel>, Completion) {
        let protocol = ProtocolBuilder::new()
            .domain("Page", |d| {
                d.async_command("navigate", |c| {
                    c.param("url", TypeKind::Scalar(ScalarKind::String))
                        .returns("frameId", TypeKind::Scalar(ScalarKind::String))
                        .optional_returns("loaderId", TypeKind::Scalar(ScalarKind::String))
                })
            })
            .build()
            .unwrap();
        let command = protocol.command_id("Page", "navigate").unwrap();
        let channel = Arc::new(BufferChannel::new());
        let responder = Responder::new(channel.clone());
        let completion = Completion::new(responder, protocol, command, CallId(11));
        (channel, completion)
    }

    #[test]
    fn fires_exactly_once() {
        let (channel, completion) = fixture();

        assert!(completion.succeed(&[Some(WireValue::from("frame-1")), None]));
        assert!(!completion.succeed(&[Some(WireValue::from("frame-2")), None]));
        assert!(!completion.fail("late error"));

        assert_eq!(
            channel.messages(),
            [r#"{"id":11,"result":{"frameId":"frame-1"}}"#]
        );
    }

    #[test]
    fn disable_is_idempotent_and_final() {
        let (channel, completion) = fixture();

        assert!(completion.is_active());
        completion.disable();
        completion.disable();
        assert!(!completion.is_active());
        assert!(!completion.succeed(&[Some(WireValue::from("frame-1"))]));
        assert!(channel.is_empty());
    }

    #[test]
    fn error_completion_sends_error_response() {
        let (channel, completion) = fixture();
        assert!(completion.fail("navigation aborted"));
        assert_eq!(
            channel.messages(),
            [r#"{"id":11,"error":{"code":-32000,"message":"navigation aborted"}}"#]
        );
    }

    #[test]
    fn racing_clones_produce_one_response() {
        let (channel, completion) = fixture();
        let mut handles = Vec::new();
        for worker in 0..8 {
            let completion = completion.clone();
            handles.push(std::thread::spawn(move || {
                completion.succeed(&[Some(WireValue::from(format!("frame-{}", worker)))])
            }));
        }
        let fired: usize = handles
            .into_iter()
            .map(|h| usize::from(h.join().unwrap()))
            .sum();
        assert_eq!(fired, 1);
        assert_eq!(channel.len(), 1);
    }
}
