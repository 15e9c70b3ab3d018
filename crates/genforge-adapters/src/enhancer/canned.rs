//! Canned enhancer: fixed answers, no network.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use genforge_core::{
    application::{ApplicationError, ports::Enhancer},
    domain::{GenerationContext, TaskSuggestion, TemplateSuggestion},
    error::GenforgeResult,
};

/// Returns preconfigured suggestions or failures.
///
/// Tasks without an explicit answer get an empty suggestion. Clones share
/// the call log.
#[derive(Debug, Clone, Default)]
pub struct CannedEnhancer {
    template: Option<Result<TemplateSuggestion, String>>,
    tasks: HashMap<String, Result<TaskSuggestion, String>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl CannedEnhancer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_template(mut self, suggestion: TemplateSuggestion) -> Self {
        self.template = Some(Ok(suggestion));
        self
    }

    pub fn failing_template(mut self, reason: impl Into<String>) -> Self {
        self.template = Some(Err(reason.into()));
        self
    }

    pub fn with_task(mut self, task: impl Into<String>, suggestion: TaskSuggestion) -> Self {
        self.tasks.insert(task.into(), Ok(suggestion));
        self
    }

    pub fn failing_task(mut self, task: impl Into<String>, reason: impl Into<String>) -> Self {
        self.tasks.insert(task.into(), Err(reason.into()));
        self
    }

    /// `"template"` or the task name, per call, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: &str) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call.to_string());
        }
    }
}

fn answer<T: Clone + Default>(canned: Option<&Result<T, String>>) -> GenforgeResult<T> {
    match canned {
        Some(Ok(s)) => Ok(s.clone()),
        Some(Err(reason)) => Err(ApplicationError::Enhancement {
            reason: reason.clone(),
        }
        .into()),
        None => Ok(T::default()),
    }
}

impl Enhancer for CannedEnhancer {
    fn enhance_template(
        &self,
        _context: &GenerationContext,
        _requirements: &str,
    ) -> GenforgeResult<TemplateSuggestion> {
        self.record("template");
        answer(self.template.as_ref())
    }

    fn enhance_with_task(
        &self,
        _context: &GenerationContext,
        task: &str,
    ) -> GenforgeResult<TaskSuggestion> {
        self.record(task);
        answer(self.tasks.get(task))
    }
}
