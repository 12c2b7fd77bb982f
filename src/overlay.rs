use crate::config::DimensionName;
use crate::shared::field_key::FieldKey;
use crate::store::{ConfigSnapshot, PendingAction};

/// Read-only projection of one dimension's pending/error annotation. Not
/// cached: callers re-project from the latest snapshot on every render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingErrorOverlay {
    pub pending_action: Option<PendingAction>,
    pub error: Option<String>,
}

impl PendingErrorOverlay {
    pub fn is_pending(&self) -> bool {
        self.pending_action.is_some()
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}

pub fn overlay_for(snapshot: &ConfigSnapshot, key: &FieldKey) -> PendingErrorOverlay {
    snapshot
        .annotations
        .get(key.as_str())
        .map(|annotation| PendingErrorOverlay {
            pending_action: annotation.pending_action,
            error: annotation.error.clone(),
        })
        .unwrap_or_default()
}

pub fn dimension_overlay(snapshot: &ConfigSnapshot, name: &DimensionName) -> PendingErrorOverlay {
    overlay_for(snapshot, &FieldKey::dimension(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FieldAnnotation;
    use std::collections::BTreeMap;

    #[test]
    fn missing_annotation_projects_empty_overlay() {
        let snapshot = ConfigSnapshot::default();
        let name = DimensionName::parse("Dept").expect("name");
        let overlay = dimension_overlay(&snapshot, &name);
        assert!(!overlay.is_pending());
        assert!(!overlay.has_error());
    }

    #[test]
    fn overlay_reflects_store_annotation() {
        let name = DimensionName::parse("Dept").expect("name");
        let key = FieldKey::dimension(&name);
        let snapshot = ConfigSnapshot {
            dimensions: Default::default(),
            annotations: BTreeMap::from_iter([(
                key,
                FieldAnnotation {
                    pending_action: Some(PendingAction::Update),
                    error: Some("offline conflict".to_string()),
                },
            )]),
        };
        let overlay = dimension_overlay(&snapshot, &name);
        assert_eq!(overlay.pending_action, Some(PendingAction::Update));
        assert_eq!(overlay.error.as_deref(), Some("offline conflict"));
    }
}
