// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder API for protocol graphs.
//!
//! Parsing schema text is an upstream concern; this builder is how an
//! already-typechecked schema becomes the immutable [`Protocol`] graph.
//! Uniqueness invariants (domain, command, event, and parameter names)
//! are enforced at `build`.

use crate::error::SchemaError;
use crate::schema::model::{Command, Direction, Domain, Event, Parameter, Protocol};
use crate::schema::types::TypeKind;
use std::collections::HashSet;
use std::sync::Arc;

/// Builder for a [`Protocol`].
#[derive(Debug, Default)]
pub struct ProtocolBuilder {
    domains: Vec<Domain>,
}

impl ProtocolBuilder {
    /// Start an empty protocol.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a domain, configured through the closure.
    pub fn domain(mut self, name: impl Into<String>, f: impl FnOnce(DomainBuilder) -> DomainBuilder) -> Self {
        let builder = f(DomainBuilder::new(name));
        self.domains.push(builder.finish());
        self
    }

    /// Validate invariants and freeze the graph.
    pub fn build(self) -> Result<Arc<Protocol>, SchemaError> {
        let mut seen_domains = HashSet::new();
        for domain in &self.domains {
            if !seen_domains.insert(domain.name.as_str()) {
                return Err(SchemaError::DuplicateDomain(domain.name.clone()));
            }

            let mut seen_commands = HashSet::new();
            for command in &domain.commands {
                if !seen_commands.insert(command.name.as_str()) {
                    return Err(SchemaError::DuplicateCommand {
                        domain: domain.name.clone(),
                        command: command.name.clone(),
                    });
                }
                check_parameters(
                    &format!("{}.{}", domain.name, command.name),
                    command.call_params.iter().chain(&command.return_params),
                )?;
            }

            let mut seen_events = HashSet::new();
            for event in &domain.events {
                if !seen_events.insert(event.name.as_str()) {
                    return Err(SchemaError::DuplicateEvent {
                        domain: domain.name.clone(),
                        event: event.name.clone(),
                    });
                }
                check_parameters(
                    &format!("{}.{}", domain.name, event.name),
                    event.params.iter(),
                )?;
            }
        }

        Ok(Arc::new(Protocol {
            domains: self.domains,
        }))
    }
}

fn check_parameters<'a>(
    owner: &str,
    params: impl Iterator<Item = &'a Parameter>,
) -> Result<(), SchemaError> {
    // Call and return lists are separate key spaces; check each
    // direction on its own.
    let mut seen: HashSet<(Direction, &str)> = HashSet::new();
    for param in params {
        if !seen.insert((param.direction, param.name.as_str())) {
            return Err(SchemaError::DuplicateParameter {
                owner: owner.to_string(),
                parameter: param.name.clone(),
            });
        }
    }
    Ok(())
}

/// Builder for one domain.
#[derive(Debug)]
pub struct DomainBuilder {
    domain: Domain,
}

impl DomainBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            domain: Domain {
                name: name.into(),
                commands: Vec::new(),
                events: Vec::new(),
            },
        }
    }

    /// Add a synchronous command.
    pub fn command(self, name: impl Into<String>, f: impl FnOnce(CommandBuilder) -> CommandBuilder) -> Self {
        self.push_command(name, false, f)
    }

    /// Add an asynchronous command; its return parameters are delivered
    /// by the completion object.
    pub fn async_command(
        self,
        name: impl Into<String>,
        f: impl FnOnce(CommandBuilder) -> CommandBuilder,
    ) -> Self {
        self.push_command(name, true, f)
    }

    fn push_command(
        mut self,
        name: impl Into<String>,
        is_async: bool,
        f: impl FnOnce(CommandBuilder) -> CommandBuilder,
    ) -> Self {
        let builder = f(CommandBuilder::new(name, is_async));
        self.domain.commands.push(builder.command);
        self
    }

    /// Add an event.
    pub fn event(mut self, name: impl Into<String>, f: impl FnOnce(EventBuilder) -> EventBuilder) -> Self {
        let builder = f(EventBuilder::new(name));
        self.domain.events.push(builder.event);
        self
    }

    fn finish(self) -> Domain {
        self.domain
    }
}

/// Builder for one command.
#[derive(Debug)]
pub struct CommandBuilder {
    command: Command,
}

impl CommandBuilder {
    fn new(name: impl Into<String>, is_async: bool) -> Self {
        Self {
            command: Command {
                name: name.into(),
                is_async,
                call_params: Vec::new(),
                return_params: Vec::new(),
            },
        }
    }

    /// Add a required call parameter.
    pub fn param(mut self, name: impl Into<String>, kind: TypeKind) -> Self {
        self.command
            .call_params
            .push(Parameter::new(name, Direction::Call, false, kind));
        self
    }

    /// Add an optional call parameter.
    pub fn optional_param(mut self, name: impl Into<String>, kind: TypeKind) -> Self {
        self.command
            .call_params
            .push(Parameter::new(name, Direction::Call, true, kind));
        self
    }

    /// Add a required return parameter.
    pub fn returns(mut self, name: impl Into<String>, kind: TypeKind) -> Self {
        self.command
            .return_params
            .push(Parameter::new(name, Direction::Return, false, kind));
        self
    }

    /// Add an optional return parameter.
    pub fn optional_returns(mut self, name: impl Into<String>, kind: TypeKind) -> Self {
        self.command
            .return_params
            .push(Parameter::new(name, Direction::Return, true, kind));
        self
    }
}

/// Builder for one event.
#[derive(Debug)]
pub struct EventBuilder {
    event: Event,
}

impl EventBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            event: Event {
                name: name.into(),
                params: Vec::new(),
            },
        }
    }

    /// Add a required output parameter.
    pub fn param(mut self, name: impl Into<String>, kind: TypeKind) -> Self {
        self.event
            .params
            .push(Parameter::new(name, Direction::Event, false, kind));
        self
    }

    /// Add an optional output parameter.
    pub fn optional_param(mut self, name: impl Into<String>, kind: TypeKind) -> Self {
        self.event
            .params
            .push(Parameter::new(name, Direction::Event, true, kind));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::ScalarKind;

    #[test]
    fn duplicate_domain_rejected() {
        let err = ProtocolBuilder::new()
            .domain("Page", |d| d.command("reload", |c| c))
            .domain("Page", |d| d.command("enable", |c| c))
            .build()
            .unwrap_err();
        assert_eq!(err, SchemaError::DuplicateDomain("Page".into()));
    }

    #[test]
    fn duplicate_command_rejected() {
        let err = ProtocolBuilder::new()
            .domain("Page", |d| {
                d.command("reload", |c| c).command("reload", |c| c)
            })
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateCommand {
                domain: "Page".into(),
                command: "reload".into()
            }
        );
    }

    #[test]
    fn duplicate_parameter_rejected() {
        let err = ProtocolBuilder::new()
            .domain("Page", |d| {
                d.command("navigate", |c| {
                    c.param("url", TypeKind::Scalar(ScalarKind::String))
                        .param("url", TypeKind::Scalar(ScalarKind::String))
                })
            })
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateParameter {
                owner: "Page.navigate".into(),
                parameter: "url".into()
            }
        );
    }

    #[test]
    fn call_and_return_keys_are_separate_spaces() {
        // The same key on both sides of a command is legal.
        let protocol = ProtocolBuilder::new()
            .domain("Storage", |d| {
                d.command("resolve", |c| {
                    c.param("id", TypeKind::Scalar(ScalarKind::String))
                        .returns("id", TypeKind::Scalar(ScalarKind::String))
                })
            })
            .build();
        assert!(protocol.is_ok());
    }

    #[test]
    fn events_carry_output_parameters() {
        let protocol = ProtocolBuilder::new()
            .domain("Net", |d| {
                d.command("enable", |c| c).event("requestWillBeSent", |e| {
                    e.param("requestId", TypeKind::Scalar(ScalarKind::String))
                        .optional_param("wallTime", TypeKind::Scalar(ScalarKind::Number))
                })
            })
            .build()
            .unwrap();

        let id = protocol.event_id("Net", "requestWillBeSent").unwrap();
        let event = protocol.event(id).unwrap();
        assert_eq!(event.params.len(), 2);
        assert!(event.params[1].optional);
        assert_eq!(event.params[0].direction, Direction::Event);
    }
}
