pub mod confirm;
pub mod controller;

pub use confirm::{confirm_transition, ConfirmAction, ConfirmEffect, ConfirmError, ConfirmState};
pub use controller::{
    DeleteOutcome, EditSession, MappingEditController, NavTarget, SaveOutcome, SessionError,
};
