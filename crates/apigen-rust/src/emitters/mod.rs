pub mod client;
pub mod module;
pub mod operations;
pub mod server;
pub mod spec;
pub mod types;

use apigen_core::error::GeneratorError;
use apigen_core::ir::SpecMetadata;
use minijinja::{Environment, Value, context};

use crate::type_mapper::type_ident;

/// Render one template with the shared environment settings.
pub(crate) fn render(
    name: &'static str,
    source: &'static str,
    ctx: Value,
) -> Result<String, GeneratorError> {
    let template_error = |err: minijinja::Error| GeneratorError::Template {
        template: name.to_string(),
        message: err.to_string(),
    };
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_keep_trailing_newline(true);
    env.add_template(name, source).map_err(template_error)?;
    let tmpl = env.get_template(name).map_err(template_error)?;
    tmpl.render(ctx).map_err(template_error)
}

/// Top-level symbol names, built from the document's name prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolNames {
    pub spec_trait: String,
    pub client: String,
    pub controller: String,
}

impl SymbolNames {
    pub fn new(spec: &SpecMetadata) -> Self {
        let prefix = if spec.name_prefix.is_empty() {
            String::new()
        } else {
            type_ident(&spec.name_prefix)
        };
        Self {
            spec_trait: format!("{prefix}Spec"),
            client: format!("{prefix}Client"),
            controller: format!("{prefix}AxumController"),
        }
    }
}

/// Context shared by every file header.
pub(crate) fn header_context(spec: &SpecMetadata) -> Value {
    let names = SymbolNames::new(spec);
    context! {
        title => spec.info.title.clone(),
        version => spec.info.version.clone(),
        spec_trait => names.spec_trait,
        client => names.client,
        controller => names.controller,
    }
}
