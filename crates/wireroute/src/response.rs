// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Response and notification envelopes.
//!
//! Every message leaving the router goes through one [`Responder`],
//! shared by the router shell, every domain dispatcher, and every
//! async completion object. Responses correlate to a call through the
//! opaque [`CallId`].

use crate::channel::WireChannel;
use crate::error::ErrorCode;
use crate::wire::{json, WireObject, WireValue};
use std::sync::Arc;

/// Opaque correlation token binding a request to its response.
///
/// Router-scoped and unique per pending call; the dispatcher core
/// never interprets it beyond copying it into the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallId(pub i64);

/// Serializes envelopes and hands them to the channel.
#[derive(Clone)]
pub struct Responder {
    channel: Arc<dyn WireChannel>,
}

impl Responder {
    /// Wrap a channel.
    pub fn new(channel: Arc<dyn WireChannel>) -> Self {
        Self { channel }
    }

    /// Send a success response carrying a result object.
    pub fn send_success(&self, call_id: CallId, result: WireObject) {
        let mut envelope = WireObject::new();
        envelope.set("id", call_id.0);
        envelope.set("result", result);
        self.channel.send(&json::to_text(&envelope));
    }

    /// Send an error response. `details` carries accumulated decode
    /// failure descriptions and is omitted when empty.
    pub fn send_failure(&self, call_id: CallId, code: ErrorCode, message: &str, details: &[String]) {
        let envelope = self.error_envelope(Some(call_id), code, message, details);
        self.channel.send(&json::to_text(&envelope));
    }

    /// Report a protocol error, optionally before any call id could be
    /// established (the id is then omitted from the envelope).
    pub fn report_error(&self, call_id: Option<CallId>, code: ErrorCode, message: &str) {
        let envelope = self.error_envelope(call_id, code, message, &[]);
        self.channel.send(&json::to_text(&envelope));
    }

    /// Send an event notification.
    pub fn send_event(&self, method: &str, params: Option<WireObject>) {
        let mut envelope = WireObject::new();
        envelope.set("method", method);
        if let Some(params) = params {
            envelope.set("params", params);
        }
        self.channel.send(&json::to_text(&envelope));
    }

    fn error_envelope(
        &self,
        call_id: Option<CallId>,
        code: ErrorCode,
        message: &str,
        details: &[String],
    ) -> WireObject {
        let mut error = WireObject::new();
        error.set("code", i64::from(code.wire_code()));
        error.set("message", message);
        if !details.is_empty() {
            let data: Vec<WireValue> = details.iter().map(|d| WireValue::from(d.as_str())).collect();
            error.set("data", WireValue::Array(data));
        }

        let mut envelope = WireObject::new();
        if let Some(id) = call_id {
            envelope.set("id", id.0);
        }
        envelope.set("error", error);
        envelope
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::BufferChannel;

    fn responder() -> (Arc<BufferChannel>, Responder) {
        let channel = Arc::new(BufferChannel::new());
        let responder = Responder::new(channel.clone());
        (channel, responder)
    }

    #[test]
    fn success_envelope_shape() {
        let (channel, responder) = responder();
        let mut result = WireObject::new();
        result.set("value", 3i64);
        responder.send_success(CallId(9), result);

        assert_eq!(channel.messages(), [r#"{"id":9,"result":{"value":3}}"#]);
    }

    #[test]
    fn failure_envelope_carries_code_and_details() {
        let (channel, responder) = responder();
        responder.send_failure(
            CallId(4),
            ErrorCode::ServerError,
            "boom",
            &["Parameter 'url' was not found".to_string()],
        );

        assert_eq!(
            channel.messages(),
            [r#"{"id":4,"error":{"code":-32000,"message":"boom","data":["Parameter 'url' was not found"]}}"#]
        );
    }

    #[test]
    fn idless_protocol_error_omits_id() {
        let (channel, responder) = responder();
        responder.report_error(None, ErrorCode::ParseError, "bad text");
        assert_eq!(
            channel.messages(),
            [r#"{"error":{"code":-32700,"message":"bad text"}}"#]
        );
    }

    #[test]
    fn event_envelope_shape() {
        let (channel, responder) = responder();
        let mut params = WireObject::new();
        params.set("requestId", "r-1");
        responder.send_event("Net.requestWillBeSent", Some(params));
        responder.send_event("Net.loadingFinished", None);

        assert_eq!(
            channel.messages(),
            [
                r#"{"method":"Net.requestWillBeSent","params":{"requestId":"r-1"}}"#,
                r#"{"method":"Net.loadingFinished"}"#,
            ]
        );
    }
}
