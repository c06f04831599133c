// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Cross-module dispatch scenarios.

use crate::channel::BufferChannel;
use crate::completion::Completion;
use crate::dispatcher::{AlternateDispatcher, DomainDispatcher};
use crate::response::{CallId, Responder};
use crate::route::CallArgs;
use crate::schema::{EnumDescriptor, Protocol, ProtocolBuilder, ScalarKind, TypeKind};
use crate::strategy::DispatchStrategy;
use crate::wire::WireValue;
use crate::Router;
use parking_lot::Mutex;
use std::sync::Arc;

type CallLog = Arc<Mutex<Vec<String>>>;

/// Assemble a dispatcher whose handlers only record which command ran.
fn recording_dispatcher(
    protocol: &Arc<Protocol>,
    domain: &str,
    responder: Responder,
) -> (CallLog, DomainDispatcher) {
    let log: CallLog = Arc::new(Mutex::new(Vec::new()));
    let id = protocol.domain_id(domain).unwrap();
    let commands: Vec<String> = protocol
        .domain(id)
        .unwrap()
        .commands
        .iter()
        .map(|c| c.name.clone())
        .collect();

    let mut builder = DomainDispatcher::builder(protocol.clone(), domain, responder).unwrap();
    for name in commands {
        let log = log.clone();
        let recorded = name.clone();
        builder = builder
            .handle(&name, move |_args, _outs| {
                log.lock().push(recorded.clone());
                Ok(())
            })
            .unwrap();
    }
    (log, builder.build().unwrap())
}

fn channel_and_responder() -> (Arc<BufferChannel>, Responder) {
    let channel = Arc::new(BufferChannel::new());
    let responder = Responder::new(channel.clone());
    (channel, responder)
}

#[test]
fn both_routing_shapes_resolve_the_same_handler() {
    // The same three commands, first in a chain-routed domain, then
    // embedded in a table-routed one. Either shape must hand the call
    // to the identically named handler.
    let small = ProtocolBuilder::new()
        .domain("D", |d| {
            d.command("alpha", |c| c)
                .command("beta", |c| c)
                .command("gamma", |c| c)
        })
        .build()
        .unwrap();
    let big = ProtocolBuilder::new()
        .domain("D", |d| {
            d.command("alpha", |c| c)
                .command("beta", |c| c)
                .command("gamma", |c| c)
                .command("delta", |c| c)
                .command("epsilon", |c| c)
                .command("zeta", |c| c)
                .command("eta", |c| c)
        })
        .build()
        .unwrap();

    for protocol in [small, big] {
        let (_channel, responder) = channel_and_responder();
        let (log, dispatcher) = recording_dispatcher(&protocol, "D", responder);
        assert!(dispatcher.dispatch(CallId(1), "beta", None));
        assert!(!dispatcher.dispatch(CallId(2), "unknown", None));
        assert_eq!(log.lock().as_slice(), ["beta"]);
    }
}

#[test]
fn absent_optional_is_not_found_and_not_emitted() {
    let protocol = ProtocolBuilder::new()
        .domain("Page", |d| {
            d.command("reload", |c| {
                c.optional_param("ignoreCache", TypeKind::Scalar(ScalarKind::Boolean))
                    .optional_returns("status", TypeKind::Scalar(ScalarKind::String))
            })
        })
        .build()
        .unwrap();

    let (channel, responder) = channel_and_responder();
    let seen_present: Arc<Mutex<Option<bool>>> = Arc::new(Mutex::new(None));
    let seen = seen_present.clone();
    let dispatcher = DomainDispatcher::builder(protocol.clone(), "Page", responder.clone())
        .unwrap()
        .handle("reload", move |args, _outs| {
            *seen.lock() = Some(args.is_present("ignoreCache"));
            Ok(())
        })
        .unwrap()
        .build()
        .unwrap();

    let mut router = Router::new(protocol, responder);
    router.register(dispatcher).unwrap();
    router.dispatch_text(r#"{"id":1,"method":"Page.reload","params":{}}"#);

    assert_eq!(*seen_present.lock(), Some(false));
    // The untouched optional return writes no key at all.
    assert_eq!(channel.take(), [r#"{"id":1,"result":{}}"#]);
}

#[test]
fn handler_error_response_has_no_result_keys() {
    let protocol = ProtocolBuilder::new()
        .domain("Net", |d| {
            d.command("getCookies", |c| {
                c.returns("cookies", TypeKind::array_of(TypeKind::ObjectRef("Cookie".into())))
            })
        })
        .build()
        .unwrap();

    let (channel, responder) = channel_and_responder();
    let dispatcher = DomainDispatcher::builder(protocol, "Net", responder)
        .unwrap()
        .handle("getCookies", |_args, outs| {
            // Even an assigned slot must not leak into an error response.
            outs.set("cookies", Vec::<WireValue>::new());
            Err("cookie jar is sealed".into())
        })
        .unwrap()
        .build()
        .unwrap();

    assert!(dispatcher.dispatch(CallId(7), "getCookies", None));
    let messages = channel.take();
    assert_eq!(
        messages,
        [r#"{"id":7,"error":{"code":-32000,"message":"cookie jar is sealed"}}"#]
    );
}

#[test]
fn decode_failures_surface_only_with_a_handler_failure() {
    let protocol = ProtocolBuilder::new()
        .domain("Net", |d| {
            d.command("setCookie", |c| {
                c.param("name", TypeKind::Scalar(ScalarKind::String))
                    .param("value", TypeKind::Scalar(ScalarKind::String))
            })
        })
        .build()
        .unwrap();

    let (channel, responder) = channel_and_responder();
    let dispatcher = DomainDispatcher::builder(protocol, "Net", responder)
        .unwrap()
        .handle("setCookie", |args, _outs| {
            // Best-effort decode: the handler still runs and sees the
            // missing required argument as absent.
            match args.get_str("name") {
                Some(_) => Ok(()),
                None => Err("name is required".into()),
            }
        })
        .unwrap()
        .build()
        .unwrap();

    // Missing required parameter, handler accepts anyway: success, no
    // decode noise in the response.
    let mut params = crate::WireObject::new();
    params.set("name", "session");
    params.set("value", "abc");
    assert!(dispatcher.dispatch(CallId(1), "setCookie", Some(&params)));
    assert_eq!(channel.take(), [r#"{"id":1,"result":{}}"#]);

    // Same call without "name": the handler fails, and the recorded
    // decode failure rides along as error data.
    let mut params = crate::WireObject::new();
    params.set("value", "abc");
    assert!(dispatcher.dispatch(CallId(2), "setCookie", Some(&params)));
    let messages = channel.take();
    assert!(messages[0].contains(r#""message":"name is required""#));
    assert!(messages[0].contains(r#""data":["Parameter 'name' with type 'string' was not found"]"#));
}

#[test]
fn double_completion_reaches_the_channel_once() {
    let protocol = ProtocolBuilder::new()
        .domain("Page", |d| {
            d.async_command("navigate", |c| {
                c.param("url", TypeKind::Scalar(ScalarKind::String))
                    .returns("frameId", TypeKind::Scalar(ScalarKind::String))
            })
        })
        .build()
        .unwrap();

    let (channel, responder) = channel_and_responder();
    let stashed: Arc<Mutex<Option<Completion>>> = Arc::new(Mutex::new(None));
    let stash = stashed.clone();
    let dispatcher = DomainDispatcher::builder(protocol, "Page", responder)
        .unwrap()
        .handle_async("navigate", move |_args, completion| {
            *stash.lock() = Some(completion);
            Ok(())
        })
        .unwrap()
        .build()
        .unwrap();

    assert!(dispatcher.dispatch(CallId(3), "navigate", None));
    // Deferred: nothing sent at dispatch time.
    assert!(channel.is_empty());

    let completion = stashed.lock().take().unwrap();
    assert!(completion.succeed(&[Some(WireValue::from("frame-7"))]));
    assert!(!completion.succeed(&[Some(WireValue::from("frame-8"))]));

    assert_eq!(
        channel.take(),
        [r#"{"id":3,"result":{"frameId":"frame-7"}}"#]
    );
}

#[test]
fn async_immediate_error_disables_the_completion() {
    let protocol = ProtocolBuilder::new()
        .domain("Page", |d| {
            d.async_command("navigate", |c| {
                c.param("url", TypeKind::Scalar(ScalarKind::String))
                    .returns("frameId", TypeKind::Scalar(ScalarKind::String))
            })
        })
        .build()
        .unwrap();

    let (channel, responder) = channel_and_responder();
    let stashed: Arc<Mutex<Option<Completion>>> = Arc::new(Mutex::new(None));
    let stash = stashed.clone();
    let dispatcher = DomainDispatcher::builder(protocol, "Page", responder)
        .unwrap()
        .handle_async("navigate", move |args, completion| {
            *stash.lock() = Some(completion);
            match args.get_str("url") {
                Some(_) => Ok(()),
                None => Err("url is required".into()),
            }
        })
        .unwrap()
        .build()
        .unwrap();

    assert!(dispatcher.dispatch(CallId(4), "navigate", None));
    assert_eq!(channel.len(), 1);
    assert!(channel.messages()[0].contains(r#""message":"url is required""#));

    // The error path answered already; the stashed completion may
    // never produce a second response.
    let completion = stashed.lock().take().unwrap();
    assert!(!completion.is_active());
    assert!(!completion.succeed(&[Some(WireValue::from("frame-9"))]));
    assert_eq!(channel.len(), 1);
}

#[test]
fn scalar_returns_round_trip_in_declared_order() {
    let protocol = ProtocolBuilder::new()
        .domain("Stats", |d| {
            d.command("sample", |c| {
                c.returns("count", TypeKind::Scalar(ScalarKind::Integer))
                    .returns("label", TypeKind::Scalar(ScalarKind::String))
                    .returns("healthy", TypeKind::Scalar(ScalarKind::Boolean))
            })
        })
        .build()
        .unwrap();

    let (channel, responder) = channel_and_responder();
    let dispatcher = DomainDispatcher::builder(protocol, "Stats", responder)
        .unwrap()
        .handle("sample", |_args, outs| {
            // Assigned out of declaration order on purpose.
            outs.set("healthy", true);
            outs.set("count", 12i64);
            outs.set("label", "ok");
            Ok(())
        })
        .unwrap()
        .build()
        .unwrap();

    assert!(dispatcher.dispatch(CallId(5), "sample", None));
    assert_eq!(
        channel.take(),
        [r#"{"id":5,"result":{"count":12,"label":"ok","healthy":true}}"#]
    );
}

#[test]
fn enum_returns_emit_declared_constants_for_every_value() {
    let state = EnumDescriptor::new("LoadState", ["pending", "loading", "done"]).unwrap();
    let protocol = ProtocolBuilder::new()
        .domain("Page", |d| {
            d.command("getLoadState", |c| {
                c.param("ordinal", TypeKind::Scalar(ScalarKind::Integer))
                    .returns("state", TypeKind::Enum(state.clone()))
            })
        })
        .build()
        .unwrap();

    let (channel, responder) = channel_and_responder();
    let dispatcher = DomainDispatcher::builder(protocol, "Page", responder)
        .unwrap()
        .handle("getLoadState", |args, outs| {
            // Handlers may hold the internal ordinal; the wire must
            // still see the declared constant.
            let ordinal = args.get_i64("ordinal").unwrap_or(0);
            outs.set("state", WireValue::Int(ordinal));
            Ok(())
        })
        .unwrap()
        .build()
        .unwrap();

    for (ordinal, constant) in state.constants.iter().enumerate() {
        let mut params = crate::WireObject::new();
        params.set("ordinal", ordinal as i64);
        assert!(dispatcher.dispatch(CallId(ordinal as i64), "getLoadState", Some(&params)));
        let message = channel.take().pop().unwrap();
        assert!(
            message.contains(&format!(r#""state":"{}""#, constant)),
            "{}",
            message
        );
    }
}

#[test]
fn net_domain_with_six_commands_uses_the_lookup_table() {
    let protocol = ProtocolBuilder::new()
        .domain("Net", |d| {
            d.command("enable", |c| c)
                .command("disable", |c| c)
                .command("getCookies", |c| c)
                .command("setCookie", |c| c)
                .command("deleteCookie", |c| c)
                .command("setUserAgent", |c| c)
        })
        .build()
        .unwrap();
    assert_eq!(
        DispatchStrategy::select(protocol.domain(protocol.domain_id("Net").unwrap()).unwrap().commands.len()),
        DispatchStrategy::LookupTable
    );

    let (channel, responder) = channel_and_responder();
    let (log, dispatcher) = recording_dispatcher(&protocol, "Net", responder.clone());
    let mut router = Router::new(protocol, responder);
    router.register(dispatcher).unwrap();

    router.dispatch_text(r#"{"id":42,"method":"Net.getCookies"}"#);

    // Exactly the getCookies handler ran, exactly once.
    assert_eq!(log.lock().as_slice(), ["getCookies"]);
    assert_eq!(channel.take(), [r#"{"id":42,"result":{}}"#]);
}

#[test]
fn alternate_dispatcher_replaces_default_page_handling() {
    struct Interceptor {
        log: CallLog,
    }
    impl AlternateDispatcher for Interceptor {
        fn dispatch(&self, _call_id: CallId, command: &str, args: &CallArgs) {
            self.log
                .lock()
                .push(format!("alternate:{}:{}", command, args.is_present("ignoreCache")));
        }
    }

    let protocol = ProtocolBuilder::new()
        .domain("Page", |d| {
            d.command("reload", |c| {
                c.optional_param("ignoreCache", TypeKind::Scalar(ScalarKind::Boolean))
            })
        })
        .build()
        .unwrap();

    let (channel, responder) = channel_and_responder();
    let default_log: CallLog = Arc::new(Mutex::new(Vec::new()));
    let log = default_log.clone();
    let dispatcher = DomainDispatcher::builder(protocol.clone(), "Page", responder.clone())
        .unwrap()
        .handle("reload", move |_args, _outs| {
            log.lock().push("default:reload".to_string());
            Ok(())
        })
        .unwrap()
        .build()
        .unwrap();

    let alternate_log: CallLog = Arc::new(Mutex::new(Vec::new()));
    let mut router = Router::new(protocol, responder);
    router.register(dispatcher).unwrap();
    assert!(router.set_alternate(
        "Page",
        Box::new(Interceptor {
            log: alternate_log.clone(),
        })
    ));

    router.dispatch_text(r#"{"id":8,"method":"Page.reload","params":{"ignoreCache":true}}"#);

    // The alternate received the extracted arguments; the default
    // handler never ran, and response delivery became the alternate's
    // responsibility.
    assert_eq!(alternate_log.lock().as_slice(), ["alternate:reload:true"]);
    assert!(default_log.lock().is_empty());
    assert!(channel.is_empty());
}
