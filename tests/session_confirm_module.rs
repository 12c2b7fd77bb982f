use dimcfg::session::{confirm_transition, ConfirmAction, ConfirmEffect, ConfirmState};

#[test]
fn confirm_module_full_request_confirm_cycle() {
    let mut state = ConfirmState::default();
    assert_eq!(state, ConfirmState::Idle);

    assert_eq!(
        confirm_transition(&mut state, ConfirmAction::Request).expect("request"),
        ConfirmEffect::ShowPrompt
    );
    assert_eq!(state, ConfirmState::ConfirmPending);
    assert_eq!(
        confirm_transition(&mut state, ConfirmAction::Confirm).expect("confirm"),
        ConfirmEffect::ProceedDelete
    );
    // The armed state survives until the delete dispatch consumes it.
    assert_eq!(state, ConfirmState::ConfirmPending);
}

#[test]
fn confirm_module_cancel_then_request_again() {
    let mut state = ConfirmState::Idle;
    confirm_transition(&mut state, ConfirmAction::Request).expect("request");
    assert_eq!(
        confirm_transition(&mut state, ConfirmAction::Cancel).expect("cancel"),
        ConfirmEffect::DismissPrompt
    );
    assert_eq!(state, ConfirmState::Idle);

    // A dismissed prompt does not poison the session; a fresh request works.
    assert_eq!(
        confirm_transition(&mut state, ConfirmAction::Request).expect("request"),
        ConfirmEffect::ShowPrompt
    );
}

#[test]
fn confirm_module_invalid_transitions_leave_state_unchanged() {
    let mut state = ConfirmState::Idle;
    let err = confirm_transition(&mut state, ConfirmAction::Confirm).expect_err("invalid");
    assert!(err.to_string().contains("state=idle action=confirm"));
    assert_eq!(state, ConfirmState::Idle);

    let mut state = ConfirmState::ConfirmPending;
    let err = confirm_transition(&mut state, ConfirmAction::Request).expect_err("invalid");
    assert!(err
        .to_string()
        .contains("state=confirm_pending action=request"));
    assert_eq!(state, ConfirmState::ConfirmPending);
}
