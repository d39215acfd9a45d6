//! ci-resolver - Validation and dependency resolution for CI build configurations

pub mod cli;
pub mod core;
pub mod graph;
pub mod resolve;
pub mod validation;

// Re-export commonly used types
pub use core::{ReleaseBuildConfiguration, TestStepConfiguration};
pub use graph::{ConsumerEdge, ResolvedGraph};
pub use resolve::{ArtifactStream, ClaimRelease};
pub use validation::{is_valid_configuration, validate, ConfigurationError, ValidationError, ValidationErrors};
