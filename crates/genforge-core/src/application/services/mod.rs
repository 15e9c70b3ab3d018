//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "generate a project" or "list templates".

pub mod generation_service;
pub mod rule_evaluator;
pub mod template_service;

pub use generation_service::{
    GenerationOptions, GenerationPlan, GenerationRequest, GenerationService,
    POST_ENHANCEMENT_TASKS,
};
pub use rule_evaluator::RuleEvaluator;
pub use template_service::{ProfileInfo, TemplateInfo, TemplateService};
