use super::confirm::ConfirmState;
use crate::config::{validated_mapping, DimensionName, FieldErrors, MappingDraft};
use crate::shared::field_key::FieldKey;
use crate::shared::ids::ScopeId;
use crate::store::{ConfigStore, StoreError};

/// Ephemeral per-visit state for editing one dimension mapping. Created when
/// the edit screen opens, dropped when the user navigates away; never
/// persisted independently of the collection.
#[derive(Debug, Clone)]
pub struct EditSession {
    pub original_name: DimensionName,
    pub draft: MappingDraft,
    pub confirm: ConfirmState,
}

impl EditSession {
    pub fn field_key(&self) -> FieldKey {
        FieldKey::dimension(&self.original_name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("dimension `{name}` not found in scope `{scope}`")]
    NotFound { name: String, scope: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Where the caller navigates after a dispatched mutation: save returns to
/// the dimension list for the scope, delete goes back one level (the previous
/// screen may not be the list).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavTarget {
    DimensionList,
    Previous,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Rejected(FieldErrors),
    Dispatched { nav: NavTarget },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    NotConfirmed,
    Dispatched { nav: NavTarget },
}

/// Bridges an edit session to the external store. Every `save`/`delete` call
/// dispatches at most one mutation and returns without waiting for remote
/// confirmation; retry and conflict resolution belong to the store.
pub struct MappingEditController<'a, S: ConfigStore> {
    store: &'a mut S,
    scope: ScopeId,
}

impl<'a, S: ConfigStore> MappingEditController<'a, S> {
    pub fn new(store: &'a mut S, scope: ScopeId) -> Self {
        Self { store, scope }
    }

    pub fn scope(&self) -> &ScopeId {
        &self.scope
    }

    /// Fails fast when the mapping is absent (e.g. concurrently deleted);
    /// callers surface this as "nothing to edit" rather than opening an
    /// empty draft that a save would re-create.
    pub fn load_for_edit(&self, original_name: &DimensionName) -> Result<EditSession, SessionError> {
        let snapshot = self.store.read_configuration(&self.scope)?;
        let mapping = snapshot
            .dimensions
            .get(original_name.as_str())
            .ok_or_else(|| SessionError::NotFound {
                name: original_name.as_str().to_string(),
                scope: self.scope.as_str().to_string(),
            })?;
        Ok(EditSession {
            original_name: original_name.clone(),
            draft: MappingDraft::from_mapping(mapping),
            confirm: ConfirmState::Idle,
        })
    }

    /// Validates the draft against the latest snapshot. Any error rejects the
    /// save with no mutation dispatched; a clean draft dispatches exactly one
    /// `mutate_mapping` and signals navigation back to the dimension list.
    pub fn save(&mut self, session: &EditSession) -> Result<SaveOutcome, SessionError> {
        let snapshot = self.store.read_configuration(&self.scope)?;
        let mapping = match validated_mapping(
            &session.draft,
            &snapshot.dimensions,
            &session.original_name,
        ) {
            Ok(mapping) => mapping,
            Err(errors) => return Ok(SaveOutcome::Rejected(errors)),
        };
        self.store
            .mutate_mapping(&self.scope, &session.original_name, mapping)?;
        Ok(SaveOutcome::Dispatched {
            nav: NavTarget::DimensionList,
        })
    }

    /// Dispatches the removal only after the confirmation prompt was
    /// accepted; otherwise nothing is dispatched and the session is left
    /// unchanged.
    pub fn delete(&mut self, session: &mut EditSession) -> Result<DeleteOutcome, SessionError> {
        if session.confirm != ConfirmState::ConfirmPending {
            return Ok(DeleteOutcome::NotConfirmed);
        }
        self.store
            .remove_mapping(&self.scope, &session.original_name)?;
        session.confirm = ConfirmState::Idle;
        Ok(DeleteOutcome::Dispatched {
            nav: NavTarget::Previous,
        })
    }

    /// Forwards one clear request for a dismissed inline error banner.
    pub fn clear_field_error(&mut self, key: &FieldKey) -> Result<(), SessionError> {
        self.store.clear_annotation(&self.scope, key)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Mapping, MappingTarget, UserDimensions};
    use crate::store::MemoryStore;

    fn seeded_store() -> (MemoryStore, ScopeId) {
        let scope = ScopeId::parse("ws_1").expect("scope");
        let mut store = MemoryStore::new();
        store.seed(
            scope.clone(),
            UserDimensions::from_mappings(vec![
                Mapping {
                    name: DimensionName::parse("Dept").expect("name"),
                    target: MappingTarget::Tag,
                },
                Mapping {
                    name: DimensionName::parse("Loc").expect("name"),
                    target: MappingTarget::Tag,
                },
            ])
            .expect("dimensions"),
        );
        (store, scope)
    }

    #[test]
    fn load_for_edit_fails_fast_on_missing_mapping() {
        let (mut store, scope) = seeded_store();
        let controller = MappingEditController::new(&mut store, scope);
        let missing = DimensionName::parse("Ghost").expect("name");
        assert!(matches!(
            controller.load_for_edit(&missing),
            Err(SessionError::NotFound { .. })
        ));
    }

    #[test]
    fn load_for_edit_copies_current_mapping_into_draft() {
        let (mut store, scope) = seeded_store();
        let controller = MappingEditController::new(&mut store, scope);
        let name = DimensionName::parse("Dept").expect("name");
        let session = controller.load_for_edit(&name).expect("session");
        assert_eq!(session.draft.name, "Dept");
        assert_eq!(session.draft.target, Some(MappingTarget::Tag));
        assert_eq!(session.confirm, ConfirmState::Idle);
        assert_eq!(session.field_key().as_str(), "dimension_Dept");
    }

    #[test]
    fn save_renames_and_navigates_to_list() {
        let (mut store, scope) = seeded_store();
        let mut controller = MappingEditController::new(&mut store, scope.clone());
        let name = DimensionName::parse("Dept").expect("name");
        let mut session = controller.load_for_edit(&name).expect("session");
        session.draft = MappingDraft {
            name: "Department".to_string(),
            target: Some(MappingTarget::ReportField),
        };

        let outcome = controller.save(&session).expect("save");
        assert_eq!(
            outcome,
            SaveOutcome::Dispatched {
                nav: NavTarget::DimensionList
            }
        );
        let snapshot = store.read_configuration(&scope).expect("snapshot");
        let names: Vec<&str> = snapshot.dimensions.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Department", "Loc"]);
    }

    #[test]
    fn save_rejects_duplicate_without_mutation() {
        let (mut store, scope) = seeded_store();
        let mut controller = MappingEditController::new(&mut store, scope.clone());
        let name = DimensionName::parse("Dept").expect("name");
        let mut session = controller.load_for_edit(&name).expect("session");
        session.draft = MappingDraft {
            name: "Loc".to_string(),
            target: Some(MappingTarget::ReportField),
        };

        let outcome = controller.save(&session).expect("save");
        let SaveOutcome::Rejected(errors) = outcome else {
            panic!("expected rejection, got {outcome:?}");
        };
        assert!(!errors.is_empty());
        let snapshot = store.read_configuration(&scope).expect("snapshot");
        assert!(snapshot.dimensions.contains("Dept"));
        assert!(snapshot.annotations.is_empty());
    }

    #[test]
    fn delete_requires_prior_confirmation() {
        let (mut store, scope) = seeded_store();
        let mut controller = MappingEditController::new(&mut store, scope.clone());
        let name = DimensionName::parse("Dept").expect("name");
        let mut session = controller.load_for_edit(&name).expect("session");

        assert_eq!(
            controller.delete(&mut session).expect("delete"),
            DeleteOutcome::NotConfirmed
        );
        assert!(store
            .read_configuration(&scope)
            .expect("snapshot")
            .dimensions
            .contains("Dept"));

        session.confirm = ConfirmState::ConfirmPending;
        let mut controller = MappingEditController::new(&mut store, scope.clone());
        assert_eq!(
            controller.delete(&mut session).expect("delete"),
            DeleteOutcome::Dispatched {
                nav: NavTarget::Previous
            }
        );
        assert_eq!(session.confirm, ConfirmState::Idle);
        assert!(!store
            .read_configuration(&scope)
            .expect("snapshot")
            .dimensions
            .contains("Dept"));
    }
}
