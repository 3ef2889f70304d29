use crate::error::TransformError;
use crate::ir::{SpecInfo, SpecMetadata};
use crate::parse::ref_resolve::RefLookup;
use crate::parse::spec::OpenApiSpec;

use super::operations_parser::parse_operations;
use super::schema_resolver::SchemaResolver;

/// Compile a parsed document into the descriptor model.
///
/// Every call starts from a fresh registry, so the same document always yields
/// the same metadata.
pub fn transform(spec: &OpenApiSpec) -> Result<SpecMetadata, TransformError> {
    let lookup = RefLookup::new(spec);
    let mut resolver = SchemaResolver::new(lookup);

    // Phase 1: component schemas, so every reference key is registered
    for (name, node) in lookup.schema_entries() {
        resolver.resolve_component(name, node)?;
    }

    // Phase 2: operations
    let operations = parse_operations(spec, &mut resolver)?;

    let refs = resolver.into_registry().build();
    log::debug!(
        "compiled {} operation(s) and {} named type(s) from `{}`",
        operations.len(),
        refs.len(),
        spec.info.title
    );

    Ok(SpecMetadata {
        info: SpecInfo {
            title: spec.info.title.clone(),
            version: spec.info.version.clone(),
        },
        name_prefix: spec.name_prefix.clone().unwrap_or_default(),
        operations,
        refs,
    })
}
