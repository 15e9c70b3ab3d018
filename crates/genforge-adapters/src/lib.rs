//! Infrastructure adapters for genforge.
//!
//! This crate implements the ports defined in
//! `genforge_core::application::ports` and ships the built-in catalog:
//!
//! | Module | Provides |
//! |--------|----------|
//! | [`filesystem`] | [`LocalFilesystem`], [`MemoryFilesystem`] |
//! | [`process`] | [`ShellRunner`], [`ScriptedRunner`] |
//! | [`enhancer`] | [`ChatCompletionEnhancer`], [`CannedEnhancer`] |
//! | [`builtin_constraints`] | the ten archetype profiles |
//! | [`builtin_templates`] | the eight templates plus manifest discovery |
//! | [`template_loader`] | `template.toml` manifests |

pub mod builtin_constraints;
pub mod builtin_templates;
pub mod enhancer;
pub mod filesystem;
pub mod process;
pub mod template_loader;

pub use enhancer::{CannedEnhancer, ChatCompletionEnhancer, EnhancerSettings};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use process::{ScriptedResponse, ScriptedRunner, ShellRunner};
pub use template_loader::ManifestLoader;
