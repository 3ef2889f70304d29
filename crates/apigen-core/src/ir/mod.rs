pub mod descriptors;
pub mod operations;
pub mod types;

pub use descriptors::*;
pub use operations::*;
pub use types::{NormalizedName, SpecInfo, SpecMetadata};
