//! FileStore trait definition

use crate::error::StoreResult;
use crate::name::TypeName;
use crate::unit::{CompiledArtifact, SourceUnit};
use std::sync::Arc;

/// File-manager capability backing a toolchain session.
///
/// Maps type names to source units and compiled artifacts. Artifacts are
/// held in memory for the lifetime of the store; there is no durable
/// artifact storage.
///
/// # Implementations
/// - `MemoryStore`: fully in-memory sources and artifacts
/// - `DirStore`: sources resolved under on-disk roots, artifacts in memory
pub trait FileStore: Send + Sync {
    /// Look up the source unit declaring `name`.
    ///
    /// Absence is `Ok(None)`. Only I/O failures unrelated to absence are
    /// errors; resolution cannot proceed without knowing whether the
    /// source exists.
    fn find_source(&self, name: &TypeName) -> StoreResult<Option<SourceUnit>>;

    /// The compiled artifact for `name`, if one has been produced in this
    /// store's lifetime.
    fn find_artifact(&self, name: &TypeName) -> Option<Arc<CompiledArtifact>>;

    /// Every artifact produced so far.
    fn list_artifacts(&self) -> Vec<Arc<CompiledArtifact>>;

    /// Record a compiled artifact, overwriting any existing one for the
    /// same name. Called by the toolchain as it emits output; callers of
    /// the driver never write artifacts directly.
    fn put_artifact(&self, artifact: CompiledArtifact);

    /// Release held resources. Only the store's exclusive owner may close
    /// it.
    fn close(&self) -> StoreResult<()>;
}
