use thiserror::Error;

use crate::engine::EngineState;

/// The word source could not supply a usable word for the next round.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no word available: {reason}")]
pub struct WordUnavailable {
    pub reason: String,
}

impl WordUnavailable {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error(transparent)]
    WordUnavailable(#[from] WordUnavailable),

    /// An action was requested in a state that does not accept it.
    #[error("cannot {action} while {state}")]
    InvalidStateTransition {
        action: &'static str,
        state: EngineState,
    },
}
