//! Driver facade
//!
//! Composes the session, locator, cache and the parse/compile services
//! behind the operations a host runtime calls. The driver holds no state
//! of its own beyond the single session it threads through every
//! component.

use crate::compile::CompileService;
use crate::diag::DiagnosticSink;
use crate::error::DriverError;
use crate::locate::{ResolvedSource, SourceLocator};
use crate::outcome::Resolution;
use crate::parse::ParseService;
use crate::session::ToolchainSession;
use crate::toolchain::{Parsed, ParseRequest, SyntaxTree, Toolchain, ToolchainFactory};
use babelc_config::PathConfig;
use babelc_store::{CompiledArtifact, FileStore, SourceUnit, TypeName};
use std::fmt;
use std::sync::Arc;

/// On-demand foreign-language compilation driver.
///
/// Parses and compiles foreign source units through an external
/// toolchain, caching compiled artifacts for the lifetime of the current
/// toolchain session. Construct one per process and share it; the
/// underlying handle is created lazily on first use and torn down
/// explicitly.
pub struct Driver {
    session: Arc<ToolchainSession>,
    locator: SourceLocator,
    parser: ParseService,
    compiler: CompileService,
}

impl Driver {
    /// Driver over a private toolchain handle, configured from `paths`
    /// when it is first constructed.
    pub fn new(factory: Arc<dyn ToolchainFactory>, paths: PathConfig) -> Self {
        Self::from_session(ToolchainSession::new(factory, paths))
    }

    /// Driver joining a cooperating owner's pre-configured handle. The
    /// driver never reconfigures or closes what it does not own; the
    /// factory is only consulted if the shared handle is unavailable.
    pub fn new_shared(
        factory: Arc<dyn ToolchainFactory>,
        paths: PathConfig,
        toolchain: Arc<dyn Toolchain>,
        store: Arc<dyn FileStore>,
    ) -> Self {
        Self::from_session(ToolchainSession::new(factory, paths).with_shared(toolchain, store))
    }

    fn from_session(session: ToolchainSession) -> Self {
        let session = Arc::new(session);
        Self {
            locator: SourceLocator::new(session.clone()),
            parser: ParseService::new(session.clone()),
            compiler: CompileService::new(session.clone()),
            session,
        }
    }

    /// Resolve `name` to its source unit, falling back to enclosing
    /// types for nested names.
    pub fn resolve(&self, name: &TypeName) -> Result<Resolution<ResolvedSource>, DriverError> {
        self.locator.resolve(name)
    }

    /// Parse the unit declaring `name` without compiling or caching.
    pub fn parse_by_name(
        &self,
        name: &TypeName,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Resolution<Vec<SyntaxTree>>, DriverError> {
        self.parser.parse_by_name(name, sink)
    }

    /// Parse raw text as an anonymous unit, optionally with position and
    /// doc-comment lookup services scoped to the parse.
    pub fn parse_text(
        &self,
        text: &str,
        request: ParseRequest,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Resolution<Parsed>, DriverError> {
        self.parser.parse_text(text, request, sink)
    }

    /// Compile `name`, returning the cached artifact when one exists.
    pub fn compile_by_name(
        &self,
        name: &TypeName,
        options: &[String],
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Resolution<Arc<CompiledArtifact>>, DriverError> {
        self.compiler.compile_by_name(name, options, sink)
    }

    /// Compile a caller-supplied unit without consulting the cache.
    pub fn compile_fresh(
        &self,
        unit: &SourceUnit,
        name: &TypeName,
        options: &[String],
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Resolution<Arc<CompiledArtifact>>, DriverError> {
        self.compiler.compile_fresh(unit, name, options, sink)
    }

    /// Compile all `units` in one toolchain invocation and return every
    /// artifact the store now holds.
    pub fn compile_batch(
        &self,
        units: &[SourceUnit],
        options: &[String],
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Vec<Arc<CompiledArtifact>>, DriverError> {
        self.compiler.compile_batch(units, options, sink)
    }

    /// Tear down the current toolchain handle. The next operation lazily
    /// creates a fresh one with an empty artifact cache.
    pub fn teardown(&self) -> Result<(), DriverError> {
        self.session.teardown()
    }
}

impl fmt::Debug for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Driver")
            .field("session", &self.session)
            .finish()
    }
}
