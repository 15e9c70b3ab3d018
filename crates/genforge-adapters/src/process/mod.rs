//! Command runner adapters.

mod scripted;
mod shell;

pub use scripted::{ScriptedRunner, ScriptedResponse};
pub use shell::ShellRunner;
