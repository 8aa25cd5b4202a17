//! Babelc CLI - Command line interface
//!
//! Project-based batch compilation - configuration comes from a JSON
//! manifest naming the external toolchain, the source roots and the
//! units to compile.

use clap::Parser;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use babelc_api::{
    CommandConfig, DiagnosticCollector, Driver, LogLevel, PathConfig, ProcessToolchainFactory,
    Resolution, SourceUnit, TypeName,
};

/// babelc.json structure
#[derive(Debug, serde::Deserialize)]
struct Manifest {
    /// External toolchain invocation
    #[serde(default)]
    toolchain: CommandConfig,
    /// Source roots, class path and source extension
    #[serde(default)]
    paths: PathConfig,
    /// Fully-qualified names to compile
    units: Vec<String>,
    /// Extra options passed to every compile
    #[serde(default)]
    options: Vec<String>,
    /// Log level: "silent", "error", "warn", "info", "debug", "trace"
    #[serde(default)]
    log_level: Option<String>,
}

#[derive(Parser)]
#[command(
    name = "babelc",
    about = "On-demand foreign-language batch compiler",
    version = "0.1.0"
)]
struct Cli {
    /// Manifest file path (default: ./babelc.json)
    #[arg(value_name = "MANIFEST", default_value = "babelc.json")]
    manifest: PathBuf,

    /// Override the manifest's log level
    #[arg(long, value_name = "LEVEL")]
    log: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let manifest = match read_manifest(&cli.manifest) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    init_tracing(resolve_log_level(&cli, &manifest));

    let paths = anchor_paths(&cli.manifest, manifest.paths.clone());
    let factory = Arc::new(ProcessToolchainFactory::new(manifest.toolchain.clone()));
    let driver = Driver::new(factory, paths);

    let units = collect_units(&driver, &manifest.units);

    let mut sink = DiagnosticCollector::new();
    let artifacts = match driver.compile_batch(&units, &manifest.options, &mut sink) {
        Ok(artifacts) => artifacts,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    for diagnostic in sink.diagnostics() {
        eprintln!("{diagnostic}");
    }

    println!("Compiled {} artifacts", artifacts.len());
    for artifact in &artifacts {
        println!("  {} ({} bytes)", artifact.name, artifact.len());
    }

    let failed = sink.has_errors();
    if let Err(e) = driver.teardown() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
    if failed {
        process::exit(1);
    }
}

/// Read and parse the manifest
fn read_manifest(path: &Path) -> Result<Manifest, String> {
    if !path.exists() {
        return Err(format!(
            "'{}' not found\n\nThe current directory is not a babelc project.\nHint: create '{}' and list the units to compile",
            path.display(),
            path.display()
        ));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read '{}': {e}", path.display()))?;

    let manifest: Manifest = serde_json::from_str(&content)
        .map_err(|e| format!("failed to parse '{}': {e}", path.display()))?;

    if manifest.units.is_empty() {
        return Err(format!("'{}' lists no units to compile", path.display()));
    }

    Ok(manifest)
}

/// Resolve manifest paths relative to the manifest's directory
fn anchor_paths(manifest_path: &Path, mut paths: PathConfig) -> PathConfig {
    let base = manifest_path.parent().unwrap_or(Path::new("."));
    paths.source_path = paths.source_path.iter().map(|p| base.join(p)).collect();
    paths.class_path = paths.class_path.iter().map(|p| base.join(p)).collect();
    paths
}

fn resolve_log_level(cli: &Cli, manifest: &Manifest) -> LogLevel {
    cli.log
        .as_deref()
        .or(manifest.log_level.as_deref())
        .and_then(LogLevel::parse)
        .unwrap_or_default()
}

fn init_tracing(level: LogLevel) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolve every listed name to its source unit, or exit
fn collect_units(driver: &Driver, names: &[String]) -> Vec<SourceUnit> {
    let mut units = Vec::with_capacity(names.len());
    for raw in names {
        let name: TypeName = match raw.parse() {
            Ok(name) => name,
            Err(e) => {
                eprintln!("Error: '{raw}': {e}");
                process::exit(1);
            }
        };
        match driver.resolve(&name) {
            Ok(Resolution::Found(resolved)) => units.push(resolved.unit),
            Ok(_) => {
                eprintln!("Error: no source found for '{raw}'");
                process::exit(1);
            }
            Err(e) => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        }
    }
    units
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_parse_minimal() {
        let manifest: Manifest = serde_json::from_str(r#"{"units": ["pkg.A"]}"#).unwrap();
        assert_eq!(manifest.units, vec!["pkg.A".to_string()]);
        assert_eq!(manifest.toolchain.program, "javac");
        assert_eq!(manifest.paths.source_extension, "java");
        assert!(manifest.options.is_empty());
    }

    #[test]
    fn test_manifest_parse_full() {
        let manifest: Manifest = serde_json::from_str(
            r#"{
                "toolchain": {"program": "fcc", "output_flag": "--out", "artifact_extension": "obj"},
                "paths": {"source_path": ["src"], "class_path": ["lib"], "source_extension": "fl"},
                "units": ["pkg.A", "pkg.B"],
                "options": ["-g"],
                "log_level": "debug"
            }"#,
        )
        .unwrap();
        assert_eq!(manifest.toolchain.program, "fcc");
        assert_eq!(manifest.paths.source_extension, "fl");
        assert_eq!(manifest.units.len(), 2);
        assert_eq!(manifest.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_anchor_paths_relative_to_manifest() {
        let paths = PathConfig {
            source_path: vec![PathBuf::from("src")],
            class_path: vec![PathBuf::from("lib")],
            source_extension: "java".to_string(),
        };
        let anchored = anchor_paths(Path::new("/proj/babelc.json"), paths);
        assert_eq!(anchored.source_path, vec![PathBuf::from("/proj/src")]);
        assert_eq!(anchored.class_path, vec![PathBuf::from("/proj/lib")]);
    }

    #[test]
    fn test_missing_manifest_is_an_error() {
        let err = read_manifest(Path::new("/nonexistent/babelc.json")).unwrap_err();
        assert!(err.contains("not found"));
    }
}
