//! Babelc Driver - On-demand foreign-language compilation
//!
//! Lets a host runtime resolve, parse, and compile source units written
//! in a second language through an external toolchain, while caching
//! compiled artifacts and cooperating with a toolchain session other
//! subsystems may share.
//!
//! The crate drives; it does not compile. Language semantics, type
//! checking and code generation live behind the [`Toolchain`] capability.
//!
//! # Usage
//! ```rust,ignore
//! use babelc_driver::{Driver, DiagnosticCollector, ProcessToolchainFactory, Resolution};
//! use babelc_config::{CommandConfig, PathConfig};
//! use std::sync::Arc;
//!
//! let factory = Arc::new(ProcessToolchainFactory::new(CommandConfig::default()));
//! let driver = Driver::new(factory, PathConfig::with_source_root("srv/sources"));
//!
//! let mut sink = DiagnosticCollector::new();
//! match driver.compile_by_name(&"pkg.Outer".parse()?, &[], &mut sink)? {
//!     Resolution::Found(artifact) => println!("{} bytes", artifact.len()),
//!     Resolution::NotFound => println!("no such type"),
//!     Resolution::Failed => println!("{} diagnostics", sink.diagnostics().len()),
//! }
//! driver.teardown()?;
//! ```

mod cache;
mod compile;
mod diag;
mod driver;
mod error;
mod locate;
mod outcome;
mod parse;
mod process;
mod session;
mod toolchain;

pub use cache::ArtifactCache;
pub use compile::CompileService;
pub use diag::{Diagnostic, DiagnosticCollector, DiagnosticSink, Severity, SourcePosition};
pub use driver::Driver;
pub use error::{DriverError, ToolchainError};
pub use locate::{ResolvedSource, SourceLocator};
pub use outcome::Resolution;
pub use parse::{ParseService, SCRATCH_UNIT_NAME};
pub use process::{ProcessToolchain, ProcessToolchainFactory};
pub use session::{Handle, ToolchainSession};
pub use toolchain::{
    DocLookup, Parsed, ParseRequest, PositionLookup, SyntaxTree, Toolchain, ToolchainFactory,
};

// Re-export the vocabulary crates callers need alongside the driver
pub use babelc_config;
pub use babelc_store;
