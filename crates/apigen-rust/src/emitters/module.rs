use apigen_core::error::GeneratorError;
use apigen_core::ir::SpecMetadata;
use minijinja::context;

use super::{header_context, render};

/// Emit `mod.rs`, declaring the generated modules.
pub fn emit_module(spec: &SpecMetadata, server: bool) -> Result<String, GeneratorError> {
    render(
        "mod.rs.j2",
        include_str!("../../templates/mod.rs.j2"),
        context! {
            header => header_context(spec),
            server => server,
        },
    )
}
