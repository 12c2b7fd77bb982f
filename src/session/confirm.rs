/// Deletion confirmation for an edit session. Purely local UI state; nothing
/// reaches the store before `ProceedDelete`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfirmState {
    #[default]
    Idle,
    ConfirmPending,
}

impl ConfirmState {
    fn as_str(self) -> &'static str {
        match self {
            ConfirmState::Idle => "idle",
            ConfirmState::ConfirmPending => "confirm_pending",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    Request,
    Confirm,
    Cancel,
}

impl ConfirmAction {
    fn as_str(self) -> &'static str {
        match self {
            ConfirmAction::Request => "request",
            ConfirmAction::Confirm => "confirm",
            ConfirmAction::Cancel => "cancel",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmEffect {
    ShowPrompt,
    ProceedDelete,
    DismissPrompt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmError {
    InvalidTransition {
        state: ConfirmState,
        action: ConfirmAction,
    },
}

impl std::fmt::Display for ConfirmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfirmError::InvalidTransition { state, action } => {
                write!(
                    f,
                    "invalid confirmation transition: state={} action={}",
                    state.as_str(),
                    action.as_str()
                )
            }
        }
    }
}

/// `Request` arms the prompt; `Confirm` yields the proceed effect and leaves
/// the armed state in place for the delete dispatch to consume and reset;
/// `Cancel` dismisses the prompt with the draft untouched.
pub fn confirm_transition(
    state: &mut ConfirmState,
    action: ConfirmAction,
) -> Result<ConfirmEffect, ConfirmError> {
    match (*state, action) {
        (ConfirmState::Idle, ConfirmAction::Request) => {
            *state = ConfirmState::ConfirmPending;
            Ok(ConfirmEffect::ShowPrompt)
        }
        (ConfirmState::ConfirmPending, ConfirmAction::Confirm) => {
            Ok(ConfirmEffect::ProceedDelete)
        }
        (ConfirmState::ConfirmPending, ConfirmAction::Cancel) => {
            *state = ConfirmState::Idle;
            Ok(ConfirmEffect::DismissPrompt)
        }
        (state_now, action) => Err(ConfirmError::InvalidTransition {
            state: state_now,
            action,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_confirm_round_trip() {
        let mut state = ConfirmState::Idle;
        assert_eq!(
            confirm_transition(&mut state, ConfirmAction::Request).expect("request"),
            ConfirmEffect::ShowPrompt
        );
        assert_eq!(state, ConfirmState::ConfirmPending);
        assert_eq!(
            confirm_transition(&mut state, ConfirmAction::Confirm).expect("confirm"),
            ConfirmEffect::ProceedDelete
        );
        // Still armed: the delete dispatch consumes and resets it.
        assert_eq!(state, ConfirmState::ConfirmPending);
    }

    #[test]
    fn cancel_returns_to_idle() {
        let mut state = ConfirmState::ConfirmPending;
        assert_eq!(
            confirm_transition(&mut state, ConfirmAction::Cancel).expect("cancel"),
            ConfirmEffect::DismissPrompt
        );
        assert_eq!(state, ConfirmState::Idle);
    }

    #[test]
    fn confirm_without_prompt_is_invalid() {
        let mut state = ConfirmState::Idle;
        assert!(confirm_transition(&mut state, ConfirmAction::Confirm).is_err());
        assert!(confirm_transition(&mut state, ConfirmAction::Cancel).is_err());
        assert_eq!(state, ConfirmState::Idle);

        let mut state = ConfirmState::ConfirmPending;
        assert!(confirm_transition(&mut state, ConfirmAction::Request).is_err());
        assert_eq!(state, ConfirmState::ConfirmPending);
    }
}
