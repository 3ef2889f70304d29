use apigen_core::error::GeneratorError;
use apigen_core::ir::SpecMetadata;
use apigen_core::{CodeGenerator, GeneratedFile};
use log::debug;

use crate::emitters;

/// Options of one generation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RustGeneratorConfig {
    /// Emit `server.rs` with the axum controller.
    pub server: bool,
}

impl Default for RustGeneratorConfig {
    fn default() -> Self {
        Self { server: true }
    }
}

/// Rust code generator: types, spec trait, reqwest client, axum server.
pub struct RustGenerator;

impl CodeGenerator for RustGenerator {
    type Config = RustGeneratorConfig;
    type Error = GeneratorError;

    fn generate(
        &self,
        spec: &SpecMetadata,
        config: &RustGeneratorConfig,
    ) -> Result<Vec<GeneratedFile>, GeneratorError> {
        let mut files = vec![
            GeneratedFile {
                path: "types.rs".to_string(),
                content: emitters::types::emit_types(spec)?,
            },
            GeneratedFile {
                path: "spec.rs".to_string(),
                content: emitters::spec::emit_spec(spec)?,
            },
            GeneratedFile {
                path: "client.rs".to_string(),
                content: emitters::client::emit_client(spec)?,
            },
        ];
        if config.server {
            files.push(GeneratedFile {
                path: "server.rs".to_string(),
                content: emitters::server::emit_server(spec)?,
            });
        }
        files.push(GeneratedFile {
            path: "mod.rs".to_string(),
            content: emitters::module::emit_module(spec, config.server)?,
        });

        for file in &files {
            debug!("rendered {} ({} bytes)", file.path, file.content.len());
        }
        debug!(
            "generated {} files for {} {}",
            files.len(),
            spec.info.title,
            spec.info.version
        );
        Ok(files)
    }
}
