//! Application layer for genforge.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (GenerationService, TemplateService)
//! - **Registries**: Constraint profiles and templates, shared read-only
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! Business rules live in `crate::domain`; this layer sequences them and
//! talks to the outside world through ports.

pub mod cancellation;
pub mod error;
pub mod ports;
pub mod registry;
pub mod services;

pub use cancellation::CancellationToken;
pub use error::ApplicationError;
pub use registry::{ConstraintRegistry, TemplateRegistry};

// Re-export main services
pub use services::{
    GenerationOptions, GenerationPlan, GenerationRequest, GenerationService, ProfileInfo,
    TemplateInfo, TemplateService,
};

// Re-export port traits (for adapter implementation)
pub use ports::{CommandOutput, CommandRunner, Enhancer, Filesystem};
