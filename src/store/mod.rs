mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::config::{DimensionName, Mapping, UserDimensions};
use crate::shared::field_key::FieldKey;
use crate::shared::ids::ScopeId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Pending-action marker the synchronization layer attaches to a field while
/// a dispatched mutation has not been remotely confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PendingAction {
    Add,
    Update,
    Delete,
}

impl PendingAction {
    pub fn as_str(self) -> &'static str {
        match self {
            PendingAction::Add => "add",
            PendingAction::Update => "update",
            PendingAction::Delete => "delete",
        }
    }
}

impl std::fmt::Display for PendingAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Store-owned metadata for one field key. The core only reads these and
/// requests clears; it never writes them directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldAnnotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_action: Option<PendingAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Per-scope slice of the remote configuration record the core reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    #[serde(default)]
    pub dimensions: UserDimensions,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<FieldKey, FieldAnnotation>,
}

impl ConfigSnapshot {
    /// Applies a rename/retype of the mapping named `original`, stamping a
    /// pending annotation under the original name's field key the way the
    /// sync layer annotates an optimistic write. A missing original is
    /// treated as an add: mutations are at-least-once-ish and the store does
    /// not re-validate what the client dispatched.
    pub(crate) fn apply_mapping_mutation(&mut self, original: &DimensionName, mapping: Mapping) {
        let key = FieldKey::dimension(original);
        let pending = if self.dimensions.contains(original.as_str()) {
            // Replace cannot collide here: the entry either keeps its name or
            // takes one the client already checked; a racing duplicate simply
            // loses to the existing entry.
            if self.dimensions.replace(original, mapping.clone()).is_err() {
                return;
            }
            PendingAction::Update
        } else {
            if self.dimensions.add(mapping).is_err() {
                return;
            }
            PendingAction::Add
        };
        self.annotations.entry(key).or_default().pending_action = Some(pending);
    }

    /// Removes the mapping and any annotation attached to its field key.
    /// Removing an absent mapping is a no-op.
    pub(crate) fn apply_mapping_removal(&mut self, name: &DimensionName) {
        let _ = self.dimensions.remove(name);
        self.annotations.remove(FieldKey::dimension(name).as_str());
    }

    pub(crate) fn apply_annotation_clear(&mut self, key: &FieldKey) {
        self.annotations.remove(key.as_str());
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read snapshot {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to create snapshot directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write snapshot {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode snapshot for {path}: {source}")]
    Encode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid snapshot json in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Contract over the externally synchronized configuration store. Mutations
/// are fire-and-forget from the caller's point of view: `Ok(())` means the
/// request was accepted for processing, not that it was remotely confirmed.
/// Completion arrives asynchronously through the next snapshot read.
pub trait ConfigStore {
    fn read_configuration(&self, scope: &ScopeId) -> Result<ConfigSnapshot, StoreError>;

    fn mutate_mapping(
        &mut self,
        scope: &ScopeId,
        original: &DimensionName,
        mapping: Mapping,
    ) -> Result<(), StoreError>;

    fn remove_mapping(&mut self, scope: &ScopeId, name: &DimensionName) -> Result<(), StoreError>;

    fn clear_annotation(&mut self, scope: &ScopeId, key: &FieldKey) -> Result<(), StoreError>;
}
