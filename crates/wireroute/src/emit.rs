// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Handler-trait skeleton emission.
//!
//! Renders the per-domain handler surface as Rust source text, for
//! developers implementing a domain against a schema. Signatures are
//! derived from the same type classifiers the runtime marshalling
//! uses: by-reference kinds take references, value scalars are copied,
//! optionals collapse to `Option`, and asynchronous commands take a
//! completion handle instead of output slots.

use crate::schema::{Command, Parameter, Protocol, ScalarKind, TypeKind};

/// Plan for one generated handler trait.
#[derive(Debug, Clone)]
pub struct TraitSpec {
    pub domain: String,
    pub methods: Vec<MethodSpec>,
}

/// Plan for one generated trait method.
#[derive(Debug, Clone)]
pub struct MethodSpec {
    pub name: String,
    pub is_async: bool,
    pub params: Vec<String>,
}

impl MethodSpec {
    fn render(&self) -> String {
        let mut all = vec!["&self".to_string()];
        all.extend(self.params.iter().cloned());
        format!(
            "    fn {}({}) -> Result<(), CommandError>;",
            self.name,
            all.join(", ")
        )
    }
}

/// Build the trait plan for a domain. Returns `None` for a domain the
/// protocol does not declare.
pub fn plan_handler_trait(protocol: &Protocol, domain: &str) -> Option<TraitSpec> {
    let id = protocol.domain_id(domain)?;
    let domain = protocol.domain(id)?;

    let methods = domain
        .commands
        .iter()
        .map(|command| MethodSpec {
            name: snake_case(&command.name),
            is_async: command.is_async,
            params: method_params(command),
        })
        .collect();

    Some(TraitSpec {
        domain: domain.name.clone(),
        methods,
    })
}

/// Render a trait plan as Rust source text.
pub fn emit_handler_trait(spec: &TraitSpec) -> String {
    let methods: Vec<String> = spec.methods.iter().map(MethodSpec::render).collect();
    format!(
        "/// Handler surface for the `{domain}` domain.\n\
         ///\n\
         /// Implementations report failure by returning `Err`; for\n\
         /// asynchronous commands the eventual response is delivered\n\
         /// through the supplied completion handle.\n\
         pub trait {domain}Handler: Send + Sync {{\n\
         {methods}\n\
         }}",
        domain = spec.domain,
        methods = methods.join("\n"),
    )
}

fn method_params(command: &Command) -> Vec<String> {
    let mut params: Vec<String> = command
        .call_params
        .iter()
        .map(|param| {
            format!(
                "{}: {}",
                snake_case(&param.name),
                call_param_type(param)
            )
        })
        .collect();

    if command.is_async {
        params.push("callback: Completion".to_string());
    } else {
        for param in &command.return_params {
            params.push(format!(
                "out_{}: &mut Option<{}>",
                snake_case(&param.name),
                owned_type(&param.kind)
            ));
        }
    }
    params
}

fn call_param_type(param: &Parameter) -> String {
    let base = if param.kind.passes_by_reference() {
        borrowed_type(&param.kind)
    } else {
        owned_type(&param.kind)
    };
    if param.optional {
        format!("Option<{}>", base)
    } else {
        base
    }
}

fn borrowed_type(kind: &TypeKind) -> String {
    match kind {
        TypeKind::Scalar(ScalarKind::String) => "&str".to_string(),
        TypeKind::Array(_) => "&[WireValue]".to_string(),
        TypeKind::ObjectRef(_) => "&WireObject".to_string(),
        other => owned_type(other),
    }
}

fn owned_type(kind: &TypeKind) -> String {
    match kind {
        TypeKind::Scalar(ScalarKind::Boolean) => "bool".to_string(),
        TypeKind::Scalar(ScalarKind::Integer) => "i64".to_string(),
        TypeKind::Scalar(ScalarKind::Number) => "f64".to_string(),
        TypeKind::Scalar(ScalarKind::String) | TypeKind::Enum(_) => "String".to_string(),
        TypeKind::Array(_) => "Vec<WireValue>".to_string(),
        TypeKind::ObjectRef(_) => "WireObject".to_string(),
    }
}

fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (index, ch) in name.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if index > 0 {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
