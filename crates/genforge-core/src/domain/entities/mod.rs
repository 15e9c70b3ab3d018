pub mod common;
pub mod constraints;
pub mod context;
pub mod result;
pub mod suggestion;
pub mod template;

pub use crate::domain::DomainError;
pub use constraints::ProjectConstraints;
pub use context::GenerationContext;
pub use result::GenerationResult;
pub use template::GenerationTemplate;
