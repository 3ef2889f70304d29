use apigen_core::error::GeneratorError;
use apigen_core::ir::SpecMetadata;
use minijinja::context;

use super::operations::operation_contexts;
use super::{header_context, render};

/// Emit `client.rs`: a reqwest client implementing the spec trait.
pub fn emit_client(spec: &SpecMetadata) -> Result<String, GeneratorError> {
    render(
        "client.rs.j2",
        include_str!("../../templates/client.rs.j2"),
        context! {
            header => header_context(spec),
            operations => operation_contexts(spec),
        },
    )
}
