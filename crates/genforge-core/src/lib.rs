//! genforge core - hexagonal architecture implementation
//!
//! Domain and application layers of the genforge project generator: a
//! constraint-driven engine that picks a template for an archetype, writes
//! it to disk, runs its setup commands and validates the result.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           genforge-cli (CLI)            │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │ (GenerationService, TemplateService)    │
//! │   registries, pipeline, rule evaluator  │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │  (Filesystem, CommandRunner, Enhancer)  │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    genforge-adapters (Infrastructure)   │
//! │ (LocalFilesystem, ShellRunner, ...)     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use genforge_core::prelude::*;
//! # fn adapters() -> (Box<dyn Filesystem>, Box<dyn CommandRunner>) { unimplemented!() }
//!
//! let (fs, runner) = adapters();
//! let service = GenerationService::new(
//!     Arc::new(ConstraintRegistry::new()),
//!     Arc::new(TemplateRegistry::new()),
//!     fs,
//!     runner,
//! );
//!
//! let request = GenerationRequest::new(Archetype::new("nextjs-web").unwrap(), "my-app", "./out");
//! let result = service.generate(request, &CancellationToken::new()).unwrap();
//! println!("success: {}", result.success);
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        CancellationToken, ConstraintRegistry, GenerationOptions, GenerationRequest,
        GenerationService, TemplateRegistry, TemplateService,
        ports::{CommandOutput, CommandRunner, Enhancer, Filesystem},
    };
    pub use crate::domain::{
        Archetype, ConstraintOverride, GenerationContext, GenerationResult, GenerationTemplate,
        PipelineState, Platform, ProjectConstraints, TemplateFile, TemplateId, ValidationRule,
        Variable,
    };
    pub use crate::error::{GenforgeError, GenforgeResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
