use super::{ConfigSnapshot, ConfigStore, StoreError};
use crate::config::{DimensionName, Mapping};
use crate::shared::field_key::FieldKey;
use crate::shared::fs_atomic::atomic_write_file;
use crate::shared::ids::ScopeId;
use std::fs;
use std::path::{Path, PathBuf};

/// File-backed store: one JSON snapshot per scope under a root directory.
/// A missing snapshot reads as empty; writes replace the file atomically.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn scope_path(&self, scope: &ScopeId) -> PathBuf {
        self.root.join(format!("{}.json", scope.as_str()))
    }

    fn load(&self, scope: &ScopeId) -> Result<ConfigSnapshot, StoreError> {
        let path = self.scope_path(scope);
        if !path.exists() {
            return Ok(ConfigSnapshot::default());
        }
        let raw = fs::read_to_string(&path).map_err(|source| StoreError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| StoreError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    fn save(&self, scope: &ScopeId, snapshot: &ConfigSnapshot) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root).map_err(|source| StoreError::CreateDir {
            path: self.root.display().to_string(),
            source,
        })?;
        let path = self.scope_path(scope);
        let encoded =
            serde_json::to_vec_pretty(snapshot).map_err(|source| StoreError::Encode {
                path: path.display().to_string(),
                source,
            })?;
        atomic_write_file(&path, &encoded).map_err(|source| StoreError::Write {
            path: path.display().to_string(),
            source,
        })
    }
}

impl ConfigStore for FileStore {
    fn read_configuration(&self, scope: &ScopeId) -> Result<ConfigSnapshot, StoreError> {
        self.load(scope)
    }

    fn mutate_mapping(
        &mut self,
        scope: &ScopeId,
        original: &DimensionName,
        mapping: Mapping,
    ) -> Result<(), StoreError> {
        let mut snapshot = self.load(scope)?;
        snapshot.apply_mapping_mutation(original, mapping);
        self.save(scope, &snapshot)
    }

    fn remove_mapping(&mut self, scope: &ScopeId, name: &DimensionName) -> Result<(), StoreError> {
        let mut snapshot = self.load(scope)?;
        snapshot.apply_mapping_removal(name);
        self.save(scope, &snapshot)
    }

    fn clear_annotation(&mut self, scope: &ScopeId, key: &FieldKey) -> Result<(), StoreError> {
        let mut snapshot = self.load(scope)?;
        snapshot.apply_annotation_clear(key);
        self.save(scope, &snapshot)
    }
}
