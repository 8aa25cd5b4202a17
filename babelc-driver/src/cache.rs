//! Compiled-artifact cache
//!
//! At most one compiled artifact per type name per session generation.
//! The cache has no storage of its own: it is a query facade over the
//! session store's already-written outputs. Population happens implicitly
//! when the toolchain writes artifacts during compilation; a new handle
//! generation starts with an empty store and therefore an empty cache.

use babelc_store::{CompiledArtifact, FileStore, TypeName};
use std::sync::Arc;

/// Query facade over a handle generation's compiled artifacts.
#[derive(Clone)]
pub struct ArtifactCache {
    store: Arc<dyn FileStore>,
}

impl ArtifactCache {
    pub fn new(store: Arc<dyn FileStore>) -> Self {
        Self { store }
    }

    /// The artifact for `name`, if the store already holds one. No side
    /// effects.
    pub fn lookup(&self, name: &TypeName) -> Option<Arc<CompiledArtifact>> {
        self.store.find_artifact(name)
    }

    /// Every artifact produced so far in this session generation.
    pub fn list_all(&self) -> Vec<Arc<CompiledArtifact>> {
        self.store.list_artifacts()
    }
}
