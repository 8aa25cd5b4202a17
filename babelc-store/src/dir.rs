//! Directory-backed store implementation

use crate::error::{StoreError, StoreResult};
use crate::name::TypeName;
use crate::store::FileStore;
use crate::unit::{CompiledArtifact, SourceUnit};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// A store that resolves sources under a list of on-disk roots.
///
/// `pkg.Outer` resolves to `<root>/pkg/Outer.<extension>`, first root
/// wins. Artifacts are held in memory only; compiled output is never
/// persisted to disk by the store.
#[derive(Debug)]
pub struct DirStore {
    roots: Vec<PathBuf>,
    extension: String,
    artifacts: RwLock<BTreeMap<TypeName, Arc<CompiledArtifact>>>,
}

impl DirStore {
    /// Create a store over the given source roots.
    pub fn new<I, P>(roots: I, extension: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
            extension: extension.into(),
            artifacts: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

impl FileStore for DirStore {
    fn find_source(&self, name: &TypeName) -> StoreResult<Option<SourceUnit>> {
        let rel = name.as_rel_path(&self.extension);
        for root in &self.roots {
            let path = root.join(&rel);
            match std::fs::read_to_string(&path) {
                Ok(text) => {
                    return Ok(Some(SourceUnit::new(name.clone(), text).with_origin(path)))
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(None)
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
