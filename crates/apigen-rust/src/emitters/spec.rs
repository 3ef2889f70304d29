use apigen_core::error::GeneratorError;
use apigen_core::ir::SpecMetadata;
use minijinja::context;

use super::operations::operation_contexts;
use super::{header_context, render};

/// Emit `spec.rs`: the async trait with one method per operation.
pub fn emit_spec(spec: &SpecMetadata) -> Result<String, GeneratorError> {
    render(
        "spec.rs.j2",
        include_str!("../../templates/spec.rs.j2"),
        context! {
            header => header_context(spec),
            operations => operation_contexts(spec),
        },
    )
}
