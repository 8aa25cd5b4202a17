//! External toolchain capability
//!
//! The driver implements no language semantics of its own; it drives an
//! external toolchain through these interfaces. Implementations turn
//! source units into syntax trees and, given a store to write through,
//! into compiled artifacts, emitting diagnostics along the way.

use crate::diag::{DiagnosticSink, SourcePosition};
use crate::error::ToolchainError;
use babelc_config::PathConfig;
use babelc_store::{FileStore, SourceUnit, TypeName};
use std::fmt;
use std::sync::Arc;

/// A parsed syntax tree for one source unit.
///
/// Opaque to the driver: trees are handed back to the caller uninspected.
/// One source unit can declare several types, and one parse call can
/// yield zero or more trees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxTree {
    /// Name of the unit this tree was parsed from
    pub unit: String,
    /// Types the unit declares, outermost first
    pub declared: Vec<TypeName>,
}

impl SyntaxTree {
    pub fn new(unit: impl Into<String>, declared: Vec<TypeName>) -> Self {
        Self {
            unit: unit.into(),
            declared,
        }
    }
}

/// Position lookup scoped to one parse.
pub trait PositionLookup: Send + Sync {
    fn position_of(&self, name: &TypeName) -> Option<SourcePosition>;
}

/// Documentation-comment lookup scoped to one parse.
pub trait DocLookup: Send + Sync {
    fn doc_of(&self, name: &TypeName) -> Option<String>;
}

/// What a parse invocation should produce besides trees.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseRequest {
    pub want_positions: bool,
    pub want_docs: bool,
}

impl ParseRequest {
    pub fn trees_only() -> Self {
        Self::default()
    }

    pub fn with_positions(mut self) -> Self {
        self.want_positions = true;
        self
    }

    pub fn with_docs(mut self) -> Self {
        self.want_docs = true;
        self
    }
}

/// Result of a parse invocation.
#[derive(Clone)]
pub struct Parsed {
    pub trees: Vec<SyntaxTree>,
    /// Position service for this parse, when requested and supported
    pub positions: Option<Arc<dyn PositionLookup>>,
    /// Doc-comment service for this parse, when requested and supported
    pub docs: Option<Arc<dyn DocLookup>>,
}

impl Parsed {
    pub fn trees(trees: Vec<SyntaxTree>) -> Self {
        Self {
            trees,
            positions: None,
            docs: None,
        }
    }
}

impl fmt::Debug for Parsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parsed")
            .field("trees", &self.trees)
            .field("positions", &self.positions.is_some())
            .field("docs", &self.docs.is_some())
            .finish()
    }
}

/// The external compiler.
///
/// Implementations must tolerate being called back into the driver while
/// they execute; the session guards against the resulting reentrancy.
pub trait Toolchain: Send + Sync {
    /// Parse-only phase over the given units. Never writes artifacts.
    fn parse(
        &self,
        units: &[SourceUnit],
        request: ParseRequest,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Parsed, ToolchainError>;

    /// Full compile phase over the given units. Emitted artifacts are
    /// written through `store`; the returned flag is the toolchain's own
    /// success verdict.
    fn compile(
        &self,
        units: &[SourceUnit],
        options: &[String],
        store: &dyn FileStore,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<bool, ToolchainError>;
}

/// Creates toolchain handles for exclusively-owned sessions.
///
/// The factory configures the returned store from the ambient `paths`;
/// shared handles never pass through here, they arrive pre-configured
/// from their cooperating owner.
pub trait ToolchainFactory: Send + Sync {
    fn create(
        &self,
        paths: &PathConfig,
    ) -> Result<(Arc<dyn Toolchain>, Arc<dyn FileStore>), ToolchainError>;
}
