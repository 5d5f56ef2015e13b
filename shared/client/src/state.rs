//! Form submission state machine.

use serde::{Deserialize, Serialize};

/// Where a form is in its submit cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormState {
    /// Being edited
    #[default]
    Idle,
    /// Local schema check in progress
    Validating,
    /// Local check failed; field errors are set
    Invalid,
    /// Request in flight
    Submitting,
    /// Server accepted the submission
    Succeeded,
    /// Server rejected the submission or could not be reached
    Failed,
}

impl FormState {
    pub fn can_transition_to(&self, target: FormState) -> bool {
        use FormState::*;

        match (self, target) {
            (Idle, Validating) => true,

            (Validating, Invalid) => true,
            (Validating, Submitting) => true,

            (Invalid, Idle) => true,

            (Submitting, Succeeded) => true,
            (Submitting, Failed) => true,

            (Succeeded, Idle) => true,
            (Failed, Idle) => true,

            _ => false,
        }
    }

    /// Whether a submit cycle is running.
    pub fn is_busy(&self) -> bool {
        matches!(self, FormState::Validating | FormState::Submitting)
    }

    /// Whether the last submit cycle finished and the form may go back to idle.
    pub fn is_settled(&self) -> bool {
        matches!(self, FormState::Invalid | FormState::Succeeded | FormState::Failed)
    }
}

impl std::fmt::Display for FormState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Validating => write!(f, "validating"),
            Self::Invalid => write!(f, "invalid"),
            Self::Submitting => write!(f, "submitting"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
        }
    }
}
