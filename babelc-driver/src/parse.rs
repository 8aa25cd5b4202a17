//! Parse-only service
//!
//! Produces syntax trees without compiling. Both entry points are pure
//! with respect to the artifact cache: they never populate or consult it.

use crate::diag::{Diagnostic, DiagnosticSink};
use crate::error::DriverError;
use crate::locate::resolve_in_store;
use crate::outcome::Resolution;
use crate::session::ToolchainSession;
use crate::toolchain::{Parsed, ParseRequest, SyntaxTree};
use babelc_store::{SourceUnit, TypeName};
use std::sync::Arc;
use tracing::debug;

/// Fixed name under which raw text is parsed; such units exist only for
/// the duration of the call and never have an on-disk source.
pub const SCRATCH_UNIT_NAME: &str = "scratch";

/// Produces syntax trees from resolved units or raw text.
pub struct ParseService {
    session: Arc<ToolchainSession>,
}

impl ParseService {
    pub fn new(session: Arc<ToolchainSession>) -> Self {
        Self { session }
    }

    /// Parse the unit declaring `name`.
    ///
    /// A missing source is an expected outcome for speculative lookups,
    /// reported as `NotFound`. A toolchain-level error is converted into
    /// `Failed`; callers distinguish "parse produced diagnostics" from
    /// "parse subsystem failed" only through the sink.
    pub fn parse_by_name(
        &self,
        name: &TypeName,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Resolution<Vec<SyntaxTree>>, DriverError> {
        let Some(handle) = self.session.ensure_ready()? else {
            return Ok(Resolution::NotFound);
        };

        let Some(resolved) = resolve_in_store(handle.store.as_ref(), name)? else {
            return Ok(Resolution::NotFound);
        };

        debug!("parsing {} (unit {})", name, resolved.name);
        match handle
            .toolchain
            .parse(&[resolved.unit], ParseRequest::trees_only(), sink)
        {
            Ok(parsed) => Ok(Resolution::Found(parsed.trees)),
            Err(e) => {
                sink.report(Diagnostic::error(format!("parse failed: {e}")).with_unit(name.as_str()));
                Ok(Resolution::Failed)
            }
        }
    }

    /// Parse raw text as an anonymous unit under [`SCRATCH_UNIT_NAME`].
    ///
    /// Intended for speculative or interactive parsing where no on-disk
    /// source exists yet. Position and doc-comment lookup services are
    /// returned when requested and the toolchain supports them.
    pub fn parse_text(
        &self,
        text: &str,
        request: ParseRequest,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Resolution<Parsed>, DriverError> {
        let Some(handle) = self.session.ensure_ready()? else {
            return Ok(Resolution::Failed);
        };

        let name = TypeName::new(SCRATCH_UNIT_NAME)?;
        let unit = SourceUnit::new(name, text);
        match handle.toolchain.parse(&[unit], request, sink) {
            Ok(parsed) => Ok(Resolution::Found(parsed)),
            Err(e) => {
                sink.report(
                    Diagnostic::error(format!("parse failed: {e}")).with_unit(SCRATCH_UNIT_NAME),
                );
                Ok(Resolution::Failed)
            }
        }
    }
}
