//! In-memory store implementation

use crate::error::{StoreError, StoreResult};
use crate::name::TypeName;
use crate::store::FileStore;
use crate::unit::{CompiledArtifact, SourceUnit};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

/// A fully in-memory file store.
///
/// Sources and artifacts are stored in `BTreeMap`s, making it suitable for
/// tests and for hosting synthetic units that have no on-disk source.
/// Cloning shares the underlying maps.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    sources: Arc<RwLock<BTreeMap<TypeName, SourceUnit>>>,
    artifacts: Arc<RwLock<BTreeMap<TypeName, Arc<CompiledArtifact>>>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with source units.
    pub fn with_sources<I>(units: I) -> Self
    where
        I: IntoIterator<Item = SourceUnit>,
    {
        let store = Self::new();
        {
            let mut sources = store.sources.write().unwrap_or_else(|e| e.into_inner());
            for unit in units {
                sources.insert(unit.name.clone(), unit);
            }
        }
        store
    }

    /// Add or replace a source unit.
    pub fn add_source(&self, unit: SourceUnit) {
        let mut sources = self.sources.write().unwrap_or_else(|e| e.into_inner());
        sources.insert(unit.name.clone(), unit);
    }

    /// Number of artifacts currently held.
    pub fn artifact_count(&self) -> usize {
        match self.artifacts.read() {
            Ok(artifacts) => artifacts.len(),
            Err(_) => 0,
        }
    }
}

impl FileStore for MemoryStore {
    fn find_source(&self, name: &TypeName) -> StoreResult<Option<SourceUnit>> {
        let sources = self.sources.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(sources.get(name).cloned())
    }

    fn find_artifact(&self, name: &TypeName) -> Option<Arc<CompiledArtifact>> {
        let artifacts = match self.artifacts.read() {
            Ok(guard) => guard,
            Err(_) => return None,
        };
        artifacts.get(name).cloned()
    }

    fn list_artifacts(&self) -> Vec<Arc<CompiledArtifact>> {
        let artifacts = match self.artifacts.read() {
            Ok(guard) => guard,
            Err(_) => return Vec::new(),
        };
        artifacts.values().cloned().collect()
    }

    fn put_artifact(&self, artifact: CompiledArtifact) {
        let mut artifacts = self.artifacts.write().unwrap_or_else(|e| e.into_inner());
        artifacts.insert(artifact.name.clone(), Arc::new(artifact));
    }

    fn close(&self) -> StoreResult<()> {
        let mut artifacts = self.artifacts.write().map_err(|_| StoreError::LockPoisoned)?;
        artifacts.clear();
        Ok(())
    }
}
