// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-domain dispatchers.
//!
//! A [`DomainDispatcher`] is assembled once from the protocol graph:
//! the routing shape is synthesized for the domain's command count,
//! one route per command is built, and a handler is bound to every
//! command by stable id. Assembly fails rather than producing a
//! dispatcher that could receive a call it cannot answer.

use crate::error::{BindError, CommandError};
use crate::response::{CallId, Responder};
use crate::route::{AsyncHandler, CallArgs, CommandHandler, CommandRoute, OutSlots, SyncHandler};
use crate::schema::{CommandId, DomainId, Protocol};
use crate::strategy::RouteShape;
use crate::wire::WireObject;
use arc_swap::ArcSwapOption;
use std::sync::Arc;

/// Runtime-installed override that fully replaces default handling for
/// a domain.
///
/// When installed, every call routed to the domain is delegated here
/// with the same extracted arguments the default handler would have
/// seen; the default handler is not consulted. The installation is
/// checked fresh on every call, so installing or clearing between
/// calls takes effect immediately.
pub trait AlternateDispatcher: Send + Sync {
    /// Take over one call.
    fn dispatch(&self, call_id: CallId, command: &str, args: &CallArgs);
}

/// Routes calls for one domain to its bound handlers.
pub struct DomainDispatcher {
    protocol: Arc<Protocol>,
    domain: DomainId,
    name: String,
    responder: Responder,
    shape: RouteShape,
    routes: Vec<CommandRoute>,
    alternate: ArcSwapOption<Box<dyn AlternateDispatcher>>,
}

impl std::fmt::Debug for DomainDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomainDispatcher")
            .field("domain", &self.domain)
            .field("name", &self.name)
            .field("commands", &self.routes.len())
            .field("has_alternate", &self.has_alternate())
            .finish_non_exhaustive()
    }
}

impl DomainDispatcher {
    /// Start assembling a dispatcher for `domain`.
    ///
    /// Fails for an unknown domain, and for a domain with zero
    /// commands, which has no dispatcher body.
    pub fn builder(
        protocol: Arc<Protocol>,
        domain: &str,
        responder: Responder,
    ) -> Result<DispatcherBuilder, BindError> {
        let domain_id = protocol
            .domain_id(domain)
            .ok_or_else(|| BindError::UnknownDomain(domain.to_string()))?;
        let command_count = protocol
            .domain(domain_id)
            .map(|d| d.commands.len())
            .unwrap_or(0);
        if command_count == 0 {
            return Err(BindError::EmptyDomain(domain.to_string()));
        }
        let handlers = (0..command_count).map(|_| None).collect();
        Ok(DispatcherBuilder {
            protocol,
            domain: domain_id,
            responder,
            handlers,
        })
    }

    /// Stable id of the domain this dispatcher routes for.
    pub fn domain_id(&self) -> DomainId {
        self.domain
    }

    /// The domain this dispatcher routes for.
    pub fn domain_name(&self) -> &str {
        &self.name
    }

    /// Install the alternate dispatcher, replacing any previous one.
    pub fn set_alternate(&self, alternate: Box<dyn AlternateDispatcher>) {
        log::info!("Alternate dispatcher installed for domain '{}'", self.name);
        self.alternate.store(Some(Arc::new(alternate)));
    }

    /// Remove the alternate dispatcher; default handling resumes.
    pub fn clear_alternate(&self) {
        self.alternate.store(None);
    }

    /// Whether an alternate dispatcher is currently installed.
    pub fn has_alternate(&self) -> bool {
        self.alternate.load().is_some()
    }

    /// Route one call.
    ///
    /// Returns `false` when the method name matches none of the
    /// domain's commands; the caller (the router shell) owns reporting
    /// that; it is never silently absorbed here.
    pub fn dispatch(
        &self,
        call_id: CallId,
        command: &str,
        params: Option<&WireObject>,
    ) -> bool {
        let Some(id) = self.shape.resolve(command) else {
            return false;
        };
        let Some(route) = self.routes.get(id.index as usize) else {
            // Shape and routes are built from the same command list.
            log::error!("Route table out of step with routing shape for '{}'", self.name);
            return false;
        };

        log::debug!("Dispatching {}.{}", self.name, command);
        let alternate = self.alternate.load_full();
        route.dispatch(
            &self.protocol,
            &self.responder,
            alternate.as_deref().map(|b| b.as_ref()),
            call_id,
            params,
        );
        true
    }
}

/// Binds handlers to a domain's commands, then assembles the
/// dispatcher.
pub struct DispatcherBuilder {
    protocol: Arc<Protocol>,
    domain: DomainId,
    responder: Responder,
    handlers: Vec<Option<CommandHandler>>,
}

impl std::fmt::Debug for DispatcherBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatcherBuilder")
            .field("domain", &self.domain)
            .field("bound", &self.handlers.iter().filter(|h| h.is_some()).count())
            .field("total", &self.handlers.len())
            .finish_non_exhaustive()
    }
}

impl DispatcherBuilder {
    /// Bind a synchronous handler.
    pub fn handle(
        self,
        command: &str,
        handler: impl Fn(&CallArgs, &mut OutSlots) -> Result<(), CommandError> + Send + Sync + 'static,
    ) -> Result<Self, BindError> {
        self.bind(command, CommandHandler::Sync(Box::new(handler) as SyncHandler))
    }

    /// Bind an asynchronous handler.
    pub fn handle_async(
        self,
        command: &str,
        handler: impl Fn(&CallArgs, crate::completion::Completion) -> Result<(), CommandError>
            + Send
            + Sync
            + 'static,
    ) -> Result<Self, BindError> {
        self.bind(command, CommandHandler::Async(Box::new(handler) as AsyncHandler))
    }

    fn bind(mut self, command: &str, handler: CommandHandler) -> Result<Self, BindError> {
        // The id was minted by `builder`, so the lookup only fails for
        // a protocol dropped out from under us; treat it as unknown.
        let Some(domain) = self.protocol.domain(self.domain) else {
            return Err(BindError::UnknownCommand {
                domain: String::new(),
                command: command.to_string(),
            });
        };
        let Some(index) = domain.command_index(command) else {
            return Err(BindError::UnknownCommand {
                domain: domain.name.clone(),
                command: command.to_string(),
            });
        };
        let declared = &domain.commands[index];
        if declared.is_async != handler.is_async() {
            return Err(BindError::HandlerKindMismatch {
                domain: domain.name.clone(),
                command: command.to_string(),
                command_is_async: declared.is_async,
            });
        }
        if self.handlers[index].is_some() {
            log::warn!(
                "Handler for {}.{} bound twice; keeping the newer one",
                domain.name,
                command
            );
        }
        self.handlers[index] = Some(handler);
        Ok(self)
    }

    /// Assemble the dispatcher. Fails if any command was left without
    /// a handler.
    pub fn build(self) -> Result<DomainDispatcher, BindError> {
        let Self {
            protocol,
            domain: domain_id,
            responder,
            handlers,
        } = self;
        let Some(domain) = protocol.domain(domain_id) else {
            return Err(BindError::UnknownDomain(String::new()));
        };
        let name = domain.name.clone();

        let mut routes = Vec::with_capacity(handlers.len());
        for (index, handler) in handlers.into_iter().enumerate() {
            let Some(handler) = handler else {
                return Err(BindError::UnboundCommand {
                    domain: name.clone(),
                    command: domain
                        .commands
                        .get(index)
                        .map(|c| c.name.clone())
                        .unwrap_or_default(),
                });
            };
            routes.push(CommandRoute {
                id: CommandId {
                    domain: domain_id.0,
                    index: index as u16,
                },
                handler,
            });
        }

        let shape = RouteShape::synthesize(domain_id, domain);
        log::info!(
            "Assembled dispatcher for domain '{}' ({} commands, {:?} routing)",
            name,
            routes.len(),
            shape.strategy()
        );

        Ok(DomainDispatcher {
            protocol: protocol.clone(),
            domain: domain_id,
            name,
            responder,
            shape,
            routes,
            alternate: ArcSwapOption::empty(),
        })
    }
}
