//! Enhancer adapters.
//!
//! - [`ChatCompletionEnhancer`]: any OpenAI-compatible `/chat/completions` API
//! - [`CannedEnhancer`]: fixed answers, for tests and offline runs

mod canned;
mod chat_completion;

pub use canned::CannedEnhancer;
pub use chat_completion::{ChatCompletionEnhancer, EnhancerSettings, extract_json};
