//! Babelc API - unified driver interface
//!
//! Re-exports the driver vocabulary and provides a process-wide driver
//! singleton for host-runtime and CLI convenience.
//!
//! For library use, prefer the explicit [`Driver`] object; the global
//! entry points below exist for call sites that cannot thread one
//! through.

use std::sync::Arc;

// Re-export instance management
pub mod instance;
pub use instance::{init, instance, is_initialized, try_instance};

// Re-export the driver vocabulary
pub use babelc_driver::{
    Diagnostic, DiagnosticCollector, DiagnosticSink, DocLookup, Driver, DriverError, Parsed,
    ParseRequest, PositionLookup, ProcessToolchain, ProcessToolchainFactory, ResolvedSource,
    Resolution, Severity, SourcePosition, SyntaxTree, Toolchain, ToolchainError, ToolchainFactory,
};

// Re-export config and store types callers need alongside the driver
pub use babelc_config::{CommandConfig, LogLevel, PathConfig};
pub use babelc_store::{
    CompiledArtifact, DirStore, FileStore, MemoryStore, SourceUnit, StoreError, TypeName,
};

/// Resolve `name` through the process-wide driver.
///
/// # Panics
/// If the process-wide driver is not initialized
pub fn resolve_type(name: &TypeName) -> Result<Resolution<ResolvedSource>, DriverError> {
    instance().resolve(name)
}

/// Parse the unit declaring `name` through the process-wide driver.
///
/// # Panics
/// If the process-wide driver is not initialized
pub fn parse_type(
    name: &TypeName,
    sink: &mut dyn DiagnosticSink,
) -> Result<Resolution<Vec<SyntaxTree>>, DriverError> {
    instance().parse_by_name(name, sink)
}

/// Parse raw text through the process-wide driver.
///
/// # Panics
/// If the process-wide driver is not initialized
pub fn parse_snippet(
    text: &str,
    request: ParseRequest,
    sink: &mut dyn DiagnosticSink,
) -> Result<Resolution<Parsed>, DriverError> {
    instance().parse_text(text, request, sink)
}

/// Compile `name` through the process-wide driver, using its cache.
///
/// # Panics
/// If the process-wide driver is not initialized
pub fn compile_type(
    name: &TypeName,
    options: &[String],
    sink: &mut dyn DiagnosticSink,
) -> Result<Resolution<Arc<CompiledArtifact>>, DriverError> {
    instance().compile_by_name(name, options, sink)
}

/// Tear down the process-wide driver's toolchain session. The next
/// operation recreates it lazily.
///
/// # Panics
/// If the process-wide driver is not initialized
pub fn teardown() -> Result<(), DriverError> {
    instance().teardown()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoToolchain;

    impl Toolchain for EchoToolchain {
        fn parse(
            &self,
            units: &[SourceUnit],
            _request: ParseRequest,
            _sink: &mut dyn DiagnosticSink,
        ) -> Result<Parsed, ToolchainError> {
            Ok(Parsed::trees(
                units
                    .iter()
                    .map(|u| SyntaxTree::new(u.name.as_str(), vec![u.name.clone()]))
                    .collect(),
            ))
        }

        fn compile(
            &self,
            units: &[SourceUnit],
            _options: &[String],
            store: &dyn FileStore,
            _sink: &mut dyn DiagnosticSink,
        ) -> Result<bool, ToolchainError> {
            for unit in units {
                store.put_artifact(CompiledArtifact::new(
                    unit.name.clone(),
                    unit.text.as_bytes().to_vec(),
                ));
            }
            Ok(true)
        }
    }

    struct EchoFactory {
        store: MemoryStore,
    }

    impl ToolchainFactory for EchoFactory {
        fn create(
            &self,
            _paths: &PathConfig,
        ) -> Result<(Arc<dyn Toolchain>, Arc<dyn FileStore>), ToolchainError> {
            Ok((Arc::new(EchoToolchain), Arc::new(self.store.clone())))
        }
    }

    fn test_driver() -> Driver {
        let store = MemoryStore::with_sources([SourceUnit::new(
            TypeName::new("pkg.Hello").unwrap(),
            "greetings",
        )]);
        Driver::new(Arc::new(EchoFactory { store }), PathConfig::default())
    }

    // The global driver is per-process state; these run against one
    // install regardless of test order or threading.
    fn ensure_installed() {
        static ONCE: std::sync::Once = std::sync::Once::new();
        ONCE.call_once(|| init(test_driver()));
    }

    #[test]
    fn test_instance_lifecycle() {
        ensure_installed();
        assert!(is_initialized());
        assert!(try_instance().is_some());
    }

    #[test]
    fn test_global_compile_and_resolve() {
        ensure_installed();
        let name = TypeName::new("pkg.Hello").unwrap();

        let resolved = resolve_type(&name).unwrap();
        assert!(resolved.is_found());

        let mut sink = DiagnosticCollector::new();
        let artifact = compile_type(&name, &[], &mut sink).unwrap().found().unwrap();
        assert_eq!(artifact.bytes, b"greetings".to_vec());
    }

    #[test]
    fn test_global_parse_snippet() {
        ensure_installed();
        let mut sink = DiagnosticCollector::new();
        let parsed = parse_snippet("anything", ParseRequest::trees_only(), &mut sink)
            .unwrap()
            .found()
            .unwrap();
        assert_eq!(parsed.trees.len(), 1);
    }
}
