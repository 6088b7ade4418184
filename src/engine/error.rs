//! Execution errors.

use thiserror::Error;

/// Boxed error returned by command actions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while executing a command.
///
/// The taxonomy gives callers a three-way split for retry-vs-abort
/// decisions: the command was structurally inapplicable (`UnknownCommand`,
/// `NoTransitionForState`), applicable but rejected by a business rule
/// (`NoAdmissibleTransition`), or applicable but its side effect failed
/// (`ActionFailed`). Every failure leaves the subject's state exactly as
/// it was before the call.
#[derive(Debug, Error)]
pub enum ExecuteError {
    /// No action was ever registered for the requested command.
    #[error("no action registered for command {command}")]
    UnknownCommand { command: String },

    /// The command is known but has no registered transition from the
    /// subject's current state. Raised before the action runs.
    #[error("no transition from state {state} for command {command}")]
    NoTransitionForState { command: String, state: String },

    /// Transitions exist for the current state but every guard rejected
    /// them. The action has not run.
    #[error("no admissible transition from state {state} for command {command}")]
    NoAdmissibleTransition { command: String, state: String },

    /// The bound action was invoked and returned failure. The transition
    /// was not applied.
    #[error("action for command {command} failed: {source}")]
    ActionFailed {
        command: String,
        #[source]
        source: BoxError,
    },
}

impl ExecuteError {
    /// Whether the command was structurally inapplicable, as opposed to
    /// rejected by a guard or failed in its action.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ExecuteError::UnknownCommand { .. } | ExecuteError::NoTransitionForState { .. }
        )
    }
}
