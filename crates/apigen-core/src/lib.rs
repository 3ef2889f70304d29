//! OpenAPI 3.x to type-model compiler shared by the apigen code generators.
//!
//! [`parse`] deserializes a document, [`transform::transform`] resolves it
//! into [`ir::SpecMetadata`], and a [`CodeGenerator`] renders that metadata
//! into source files.

pub mod config;
pub mod error;
pub mod ir;
pub mod parse;
pub mod transform;

/// One rendered output file, relative to the target's output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

/// Renders resolved spec metadata into files.
pub trait CodeGenerator {
    type Config;
    type Error: std::error::Error;

    fn generate(
        &self,
        spec: &ir::SpecMetadata,
        config: &Self::Config,
    ) -> Result<Vec<GeneratedFile>, Self::Error>;
}
