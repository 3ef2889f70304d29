use apigen_core::error::GeneratorError;
use apigen_core::ir::SpecMetadata;
use minijinja::{Value, context};

use super::operations::operation_contexts;
use super::{header_context, render};
use crate::type_mapper::{field_ident, string_literal};

/// Emit `server.rs`: an axum controller dispatching to a spec implementation.
pub fn emit_server(spec: &SpecMetadata) -> Result<String, GeneratorError> {
    render(
        "server.rs.j2",
        include_str!("../../templates/server.rs.j2"),
        context! {
            header => header_context(spec),
            operations => operation_contexts(spec),
            routes => route_contexts(spec),
        },
    )
}

/// One route per distinct path, carrying every method bound on it.
fn route_contexts(spec: &SpecMetadata) -> Vec<Value> {
    let mut routes: Vec<(&str, Vec<String>)> = Vec::new();
    for op in &spec.operations {
        let name = field_ident(&op.name.snake_case);
        let handler = format!(
            "{}(handle_{}::<S>)",
            op.method.as_lower(),
            name.trim_start_matches("r#")
        );
        match routes.iter_mut().find(|(path, _)| *path == op.path) {
            Some((_, handlers)) => handlers.push(handler),
            None => routes.push((&op.path, vec![handler])),
        }
    }
    routes
        .into_iter()
        .map(|(path, handlers)| {
            context! {
                path => string_literal(path),
                method_router => handlers.join("."),
            }
        })
        .collect()
}
