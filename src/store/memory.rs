use super::{ConfigSnapshot, ConfigStore, StoreError};
use crate::config::{DimensionName, Mapping, UserDimensions};
use crate::shared::field_key::FieldKey;
use crate::shared::ids::ScopeId;
use std::collections::BTreeMap;

/// In-memory reference store. Mutations are applied immediately and stamped
/// with a pending annotation; `resolve_pending`/`fail_pending` replay the
/// asynchronous remote outcome the real sync layer would deliver later.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    scopes: BTreeMap<ScopeId, ConfigSnapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&mut self, scope: ScopeId, dimensions: UserDimensions) {
        self.scopes.insert(
            scope,
            ConfigSnapshot {
                dimensions,
                annotations: BTreeMap::new(),
            },
        );
    }

    /// Marks the dispatched mutation under `key` as remotely confirmed.
    pub fn resolve_pending(&mut self, scope: &ScopeId, key: &FieldKey) {
        if let Some(snapshot) = self.scopes.get_mut(scope) {
            if let Some(annotation) = snapshot.annotations.get_mut(key.as_str()) {
                annotation.pending_action = None;
                if annotation.error.is_none() {
                    snapshot.annotations.remove(key.as_str());
                }
            }
        }
    }

    /// Marks the dispatched mutation under `key` as remotely failed, leaving
    /// a dismissible error annotation behind.
    pub fn fail_pending(&mut self, scope: &ScopeId, key: &FieldKey, message: &str) {
        if let Some(snapshot) = self.scopes.get_mut(scope) {
            let annotation = snapshot.annotations.entry(key.clone()).or_default();
            annotation.pending_action = None;
            annotation.error = Some(message.to_string());
        }
    }

    fn snapshot_mut(&mut self, scope: &ScopeId) -> &mut ConfigSnapshot {
        self.scopes.entry(scope.clone()).or_default()
    }
}

impl ConfigStore for MemoryStore {
    fn read_configuration(&self, scope: &ScopeId) -> Result<ConfigSnapshot, StoreError> {
        Ok(self.scopes.get(scope).cloned().unwrap_or_default())
    }

    fn mutate_mapping(
        &mut self,
        scope: &ScopeId,
        original: &DimensionName,
        mapping: Mapping,
    ) -> Result<(), StoreError> {
        self.snapshot_mut(scope)
            .apply_mapping_mutation(original, mapping);
        Ok(())
    }

    fn remove_mapping(&mut self, scope: &ScopeId, name: &DimensionName) -> Result<(), StoreError> {
        self.snapshot_mut(scope).apply_mapping_removal(name);
        Ok(())
    }

    fn clear_annotation(&mut self, scope: &ScopeId, key: &FieldKey) -> Result<(), StoreError> {
        self.snapshot_mut(scope).apply_annotation_clear(key);
        Ok(())
    }
}
