pub mod name_normalizer;
pub mod operations_parser;
pub mod registry;
pub mod schema_resolver;
pub mod spec_to_ir;

pub use registry::ReferenceRegistry;
pub use spec_to_ir::transform;
