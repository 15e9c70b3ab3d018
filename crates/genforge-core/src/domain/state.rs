//! Pipeline state machine.
//!
//! ```text
//! Idle → Validating → TemplateSelected → ContextBuilt → [Enhancing]
//!      → Materializing → CommandExecuting → Validated → [PostEnhancing]
//!      → Completed
//!
//! Validating | TemplateSelected ──fatal──▶ Failed
//! any non-terminal ──cancel──▶ Failed
//! ```

use std::fmt;

use serde::Serialize;

use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PipelineState {
    Idle,
    Validating,
    TemplateSelected,
    ContextBuilt,
    Enhancing,
    Materializing,
    CommandExecuting,
    Validated,
    PostEnhancing,
    Completed,
    Failed,
}

impl PipelineState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::TemplateSelected => "template-selected",
            Self::ContextBuilt => "context-built",
            Self::Enhancing => "enhancing",
            Self::Materializing => "materializing",
            Self::CommandExecuting => "command-executing",
            Self::Validated => "validated",
            Self::PostEnhancing => "post-enhancing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Forward transitions, including fatal failure. Cancellation is
    /// handled separately by [`RunTracker::cancel`].
    pub const fn can_transition_to(&self, next: Self) -> bool {
        use PipelineState::*;
        matches!(
            (self, next),
            (Idle, Validating)
                | (Validating, TemplateSelected | Failed)
                | (TemplateSelected, ContextBuilt | Failed)
                | (ContextBuilt, Enhancing | Materializing)
                | (Enhancing, Materializing)
                | (Materializing, CommandExecuting)
                | (CommandExecuting, Validated)
                | (Validated, PostEnhancing | Completed)
                | (PostEnhancing, Completed)
        )
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current state plus every state visited, in order.
#[derive(Debug, Clone)]
pub struct RunTracker {
    state: PipelineState,
    trail: Vec<PipelineState>,
}

impl Default for RunTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl RunTracker {
    pub fn new() -> Self {
        Self {
            state: PipelineState::Idle,
            trail: vec![PipelineState::Idle],
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn trail(&self) -> &[PipelineState] {
        &self.trail
    }

    pub fn advance(&mut self, next: PipelineState) -> Result<(), DomainError> {
        if !self.state.can_transition_to(next) {
            return Err(DomainError::IllegalTransition {
                from: self.state.to_string(),
                to: next.to_string(),
            });
        }
        self.enter(next);
        Ok(())
    }

    /// Move to `Failed` from any non-terminal state. No-op when terminal.
    pub fn cancel(&mut self) {
        if !self.state.is_terminal() {
            self.enter(PipelineState::Failed);
        }
    }

    fn enter(&mut self, next: PipelineState) {
        self.state = next;
        self.trail.push(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PipelineState::*;

    #[test]
    fn happy_path_with_optional_stages() {
        let mut run = RunTracker::new();
        for s in [
            Validating,
            TemplateSelected,
            ContextBuilt,
            Enhancing,
            Materializing,
            CommandExecuting,
            Validated,
            PostEnhancing,
            Completed,
        ] {
            run.advance(s).unwrap();
        }
        assert_eq!(run.state(), Completed);
        assert_eq!(run.trail().len(), 10);
    }

    #[test]
    fn optional_stages_can_be_skipped() {
        assert!(ContextBuilt.can_transition_to(Materializing));
        assert!(Validated.can_transition_to(Completed));
    }

    #[test]
    fn fatal_failure_only_from_early_stages() {
        assert!(Validating.can_transition_to(Failed));
        assert!(TemplateSelected.can_transition_to(Failed));
        assert!(!Materializing.can_transition_to(Failed));
        assert!(!CommandExecuting.can_transition_to(Failed));
    }

    #[test]
    fn illegal_jump_is_rejected() {
        let mut run = RunTracker::new();
        let err = run.advance(Materializing).unwrap_err();
        assert!(matches!(err, DomainError::IllegalTransition { .. }));
        assert_eq!(run.state(), Idle);
    }

    #[test]
    fn cancel_from_any_non_terminal_state() {
        let mut run = RunTracker::new();
        run.advance(Validating).unwrap();
        run.advance(TemplateSelected).unwrap();
        run.advance(ContextBuilt).unwrap();
        run.advance(Materializing).unwrap();
        run.cancel();
        assert_eq!(run.state(), Failed);

        // terminal states absorb
        run.cancel();
        assert_eq!(run.trail().iter().filter(|s| **s == Failed).count(), 1);
        assert!(run.advance(Completed).is_err());
    }
}
