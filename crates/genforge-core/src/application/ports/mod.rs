//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `genforge-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations
//!   - `CommandRunner`: Shell commands
//!   - `Enhancer`: The external enhancement collaborator
//!
//! - **Driving (Input) Ports**: `GenerationService::generate`, called by the CLI

pub mod output;

pub use output::{CommandOutput, CommandRunner, Enhancer, Filesystem};

#[cfg(test)]
pub use output::{MockCommandRunner, MockEnhancer, MockFilesystem};
