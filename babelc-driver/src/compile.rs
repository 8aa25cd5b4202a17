//! Compile service
//!
//! The three compile request shapes: compile-by-name (cached),
//! compile-fresh (uncached, single unit) and compile-batch (uncached,
//! many units). All three use the session store as both input and output
//! target, so successful compiles write their artifacts straight into
//! the cache's backing storage.

use crate::diag::{Diagnostic, DiagnosticSink};
use crate::error::DriverError;
use crate::locate::resolve_in_store;
use crate::outcome::Resolution;
use crate::session::ToolchainSession;
use babelc_store::{CompiledArtifact, SourceUnit, TypeName};
use std::sync::Arc;
use tracing::{debug, warn};

/// Drives the toolchain's full compile phase.
pub struct CompileService {
    session: Arc<ToolchainSession>,
}

impl CompileService {
    pub fn new(session: Arc<ToolchainSession>) -> Self {
        Self { session }
    }

    /// Compile `name`, consulting the cache first.
    ///
    /// A cache hit returns the previously compiled artifact without
    /// invoking the toolchain; diagnostics from the original compile are
    /// not replayed. On a miss the name is resolved (with enclosing-type
    /// fallback) and the resolved unit compiled. A failed invocation
    /// yields `Failed` plus whatever the sink received; it is not raised.
    pub fn compile_by_name(
        &self,
        name: &TypeName,
        options: &[String],
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Resolution<Arc<CompiledArtifact>>, DriverError> {
        let Some(handle) = self.session.ensure_ready()? else {
            return Ok(Resolution::NotFound);
        };
        let cache = handle.cache();

        if let Some(artifact) = cache.lookup(name) {
            debug!("cache hit for {name}");
            return Ok(Resolution::Found(artifact));
        }

        let Some(resolved) = resolve_in_store(handle.store.as_ref(), name)? else {
            return Ok(Resolution::NotFound);
        };

        debug!("compiling {} (unit {})", name, resolved.name);
        if let Err(e) =
            handle
                .toolchain
                .compile(&[resolved.unit], options, handle.store.as_ref(), sink)
        {
            sink.report(Diagnostic::error(format!("compile failed: {e}")).with_unit(name.as_str()));
            return Ok(Resolution::Failed);
        }

        // Compiling the resolved unit emits artifacts for every type it
        // declares. Prefer the requested name; fall back to the unit's
        // own name for toolchains that emit only top-level artifacts.
        match cache.lookup(name).or_else(|| cache.lookup(&resolved.name)) {
            Some(artifact) => Ok(Resolution::Found(artifact)),
            None => Ok(Resolution::Failed),
        }
    }

    /// Compile a caller-supplied unit, bypassing cache lookup entirely.
    ///
    /// Intended for editor-style tooling where a stale cached artifact
    /// would be wrong. The compile still writes through the shared store,
    /// so it can silently refresh an existing cache entry for `name`.
    pub fn compile_fresh(
        &self,
        unit: &SourceUnit,
        name: &TypeName,
        options: &[String],
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Resolution<Arc<CompiledArtifact>>, DriverError> {
        let Some(handle) = self.session.ensure_ready()? else {
            return Ok(Resolution::NotFound);
        };

        debug!("fresh compile of {name}");
        if let Err(e) = handle.toolchain.compile(
            std::slice::from_ref(unit),
            options,
            handle.store.as_ref(),
            sink,
        ) {
            sink.report(Diagnostic::error(format!("compile failed: {e}")).with_unit(name.as_str()));
            return Ok(Resolution::Failed);
        }

        match handle.cache().lookup(name) {
            Some(artifact) => Ok(Resolution::Found(artifact)),
            None => Ok(Resolution::Failed),
        }
    }

    /// Compile all `units` in a single toolchain invocation, so that
    /// units may reference each other, and return every artifact now
    /// present in the store.
    ///
    /// Whether units that failed to compile have artifacts is decided by
    /// the toolchain; the returned set is consistent with whatever the
    /// sink reports.
    pub fn compile_batch(
        &self,
        units: &[SourceUnit],
        options: &[String],
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Vec<Arc<CompiledArtifact>>, DriverError> {
        let Some(handle) = self.session.ensure_ready()? else {
            return Ok(Vec::new());
        };

        debug!("batch compiling {} units", units.len());
        if let Err(e) = handle
            .toolchain
            .compile(units, options, handle.store.as_ref(), sink)
        {
            warn!("batch compile failed: {e}");
            sink.report(Diagnostic::error(format!("compile failed: {e}")));
        }

        Ok(handle.cache().list_all())
    }
}
