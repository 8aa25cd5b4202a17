//! Subprocess-backed toolchain
//!
//! Drives an external compiler executable. Units are materialized into a
//! scratch directory, the command is invoked once per request, stderr
//! lines become diagnostics and emitted artifact files are harvested back
//! into the store. The scratch directory is removed after each request;
//! artifacts live only in the store.

use crate::diag::{Diagnostic, DiagnosticSink, Severity};
use crate::error::ToolchainError;
use crate::toolchain::{Parsed, ParseRequest, SyntaxTree, Toolchain, ToolchainFactory};
use babelc_config::{CommandConfig, PathConfig};
use babelc_store::{CompiledArtifact, DirStore, FileStore, SourceUnit, TypeName};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

/// Toolchain adapter around an external compiler command.
pub struct ProcessToolchain {
    command: CommandConfig,
    paths: PathConfig,
    scratch_root: PathBuf,
    sequence: AtomicU64,
}

impl ProcessToolchain {
    pub fn new(command: CommandConfig, paths: PathConfig) -> Self {
        Self {
            command,
            paths,
            scratch_root: std::env::temp_dir(),
            sequence: AtomicU64::new(0),
        }
    }

    /// Override where scratch directories are created.
    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = root.into();
        self
    }

    fn next_scratch_dir(&self) -> PathBuf {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        self.scratch_root
            .join(format!("babelc-{}-{}", std::process::id(), seq))
    }

    /// Write the units under `dir` the way the toolchain expects to find
    /// them, returning the staged file paths.
    fn stage_units(&self, dir: &Path, units: &[SourceUnit]) -> Result<Vec<PathBuf>, ToolchainError> {
        let mut staged = Vec::with_capacity(units.len());
        for unit in units {
            let path = dir.join(unit.name.as_rel_path(&self.paths.source_extension));
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, &unit.text)?;
            staged.push(path);
        }
        Ok(staged)
    }

    fn run(
        &self,
        args: &[String],
        sink: &mut dyn DiagnosticSink,
    ) -> Result<bool, ToolchainError> {
        debug!("running {} with {} args", self.command.program, args.len());
        let output = Command::new(&self.command.program)
            .args(args)
            .output()
            .map_err(|e| {
                ToolchainError::Unavailable(format!(
                    "failed to run {}: {e}",
                    self.command.program
                ))
            })?;

        for line in String::from_utf8_lossy(&output.stderr).lines() {
            if !line.trim().is_empty() {
                sink.report(classify_line(line));
            }
        }
        Ok(output.status.success())
    }
}

impl Toolchain for ProcessToolchain {
    fn parse(
        &self,
        units: &[SourceUnit],
        _request: ParseRequest,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Parsed, ToolchainError> {
        // Position and doc lookups need an in-process toolchain API;
        // a subprocess can only report trees and diagnostics.
        let dir = self.next_scratch_dir();
        let staged = self.stage_units(&dir, units)?;

        let out_dir = dir.join("out");
        std::fs::create_dir_all(&out_dir)?;
        let args = build_parse_args(&self.command, &self.paths, &out_dir, &staged);

        let result = self.run(&args, sink);
        let _ = std::fs::remove_dir_all(&dir);

        if result? {
            let trees = units
                .iter()
                .map(|u| SyntaxTree::new(u.name.as_str(), vec![u.name.clone()]))
                .collect();
            Ok(Parsed::trees(trees))
        } else {
            Ok(Parsed::trees(Vec::new()))
        }
    }

    fn compile(
        &self,
        units: &[SourceUnit],
        options: &[String],
        store: &dyn FileStore,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<bool, ToolchainError> {
        let dir = self.next_scratch_dir();
        let staged = self.stage_units(&dir, units)?;

        let out_dir = dir.join("out");
        std::fs::create_dir_all(&out_dir)?;
        let args = build_compile_args(&self.command, &self.paths, options, &out_dir, &staged);

        let result = self.run(&args, sink);
        let harvested = match &result {
            // Harvest even after a reported failure: partial compiles may
            // still have emitted artifacts for the units that succeeded
            Ok(_) => harvest_artifacts(&out_dir, &self.command.artifact_extension, store),
            Err(_) => Ok(()),
        };
        let _ = std::fs::remove_dir_all(&dir);
        harvested?;
        result
    }
}

fn class_path_args(command: &CommandConfig, paths: &PathConfig) -> Vec<String> {
    match (&command.class_path_flag, paths.class_path.is_empty()) {
        (Some(flag), false) => {
            let joined = paths
                .class_path
                .iter()
                .map(|p| p.to_string_lossy().to_string())
                .collect::<Vec<_>>()
                .join(":");
            vec![flag.clone(), joined]
        }
        _ => Vec::new(),
    }
}

fn build_parse_args(
    command: &CommandConfig,
    paths: &PathConfig,
    out_dir: &Path,
    staged: &[PathBuf],
) -> Vec<String> {
    let mut args = command.base_options.clone();
    match &command.check_flag {
        Some(flag) => args.push(flag.clone()),
        // No syntax-check flag: compile into the scratch output
        // directory, which is discarded without being harvested.
        None => {
            args.push(command.output_flag.clone());
            args.push(out_dir.to_string_lossy().to_string());
        }
    }
    args.extend(class_path_args(command, paths));
    args.extend(staged.iter().map(|p| p.to_string_lossy().to_string()));
    args
}

fn build_compile_args(
    command: &CommandConfig,
    paths: &PathConfig,
    options: &[String],
    out_dir: &Path,
    staged: &[PathBuf],
) -> Vec<String> {
    let mut args = command.base_options.clone();
    args.extend(options.iter().cloned());
    args.push(command.output_flag.clone());
    args.push(out_dir.to_string_lossy().to_string());
    args.extend(class_path_args(command, paths));
    args.extend(staged.iter().map(|p| p.to_string_lossy().to_string()));
    args
}

/// Walk `out_dir` and write every emitted artifact file into the store,
/// keyed by the dotted name derived from its relative path.
fn harvest_artifacts(
    out_dir: &Path,
    extension: &str,
    store: &dyn FileStore,
) -> Result<(), ToolchainError> {
    let mut files = Vec::new();
    collect_files(out_dir, &mut files)?;

    for path in files {
        if path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        let rel = path.strip_prefix(out_dir).unwrap_or(&path);
        let Some(name) = artifact_name(rel) else {
            trace!("skipping artifact with unmappable path {}", rel.display());
            continue;
        };
        let bytes = std::fs::read(&path)?;
        store.put_artifact(CompiledArtifact::new(name, bytes));
    }
    Ok(())
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_files(&path, out)?;
        } else {
            out.push(path);
        }
    }
    Ok(())
}

/// Dotted type name for an emitted artifact's store key.
///
/// Common toolchains emit nested types with a `$` separator in the file
/// name; both path separators and `$` map back to dots.
fn artifact_name(rel: &Path) -> Option<TypeName> {
    let stem = rel.with_extension("");
    let dotted = stem
        .to_string_lossy()
        .replace(['/', '\\'], ".")
        .replace('$', ".");
    TypeName::new(dotted).ok()
}

/// Factory producing `ProcessToolchain` handles over a `DirStore` rooted
/// at the ambient source path.
pub struct ProcessToolchainFactory {
    command: CommandConfig,
}

impl ProcessToolchainFactory {
    pub fn new(command: CommandConfig) -> Self {
        Self { command }
    }
}

impl ToolchainFactory for ProcessToolchainFactory {
    fn create(
        &self,
        paths: &PathConfig,
    ) -> Result<(Arc<dyn Toolchain>, Arc<dyn FileStore>), ToolchainError> {
        let toolchain = ProcessToolchain::new(self.command.clone(), paths.clone());
        let store = DirStore::new(
            paths.source_path.iter().cloned(),
            paths.source_extension.clone(),
        );
        Ok((Arc::new(toolchain), Arc::new(store)))
    }
}

/// Classify a raw stderr line by the severity tag it carries.
fn classify_line(line: &str) -> Diagnostic {
    let severity = if line.contains(" error:") || line.contains("error: ") {
        Severity::Error
    } else if line.contains(" warning:") || line.contains("warning: ") {
        Severity::Warning
    } else {
        Severity::Note
    };
    Diagnostic::new(severity, line.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_name_from_rel_path() {
        assert_eq!(
            artifact_name(Path::new("pkg/Outer.class")).unwrap().as_str(),
            "pkg.Outer"
        );
        assert_eq!(
            artifact_name(Path::new("pkg/Outer$Inner.class"))
                .unwrap()
                .as_str(),
            "pkg.Outer.Inner"
        );
        assert_eq!(
            artifact_name(Path::new("Toplevel.class")).unwrap().as_str(),
            "Toplevel"
        );
    }

    #[test]
    fn test_classify_stderr_lines() {
        let d = classify_line("pkg/A.java:4: error: ';' expected");
        assert_eq!(d.severity, Severity::Error);

        let d = classify_line("pkg/A.java:9: warning: unchecked cast");
        assert_eq!(d.severity, Severity::Warning);

        let d = classify_line("1 problem was found");
        assert_eq!(d.severity, Severity::Note);
    }

    #[test]
    fn test_compile_args_order() {
        let command = CommandConfig {
            program: "fcc".to_string(),
            check_flag: None,
            output_flag: "-d".to_string(),
            class_path_flag: Some("-cp".to_string()),
            artifact_extension: "obj".to_string(),
            base_options: vec!["-strict".to_string()],
        };
        let paths = PathConfig {
            source_path: vec![],
            class_path: vec![PathBuf::from("/lib/a"), PathBuf::from("/lib/b")],
            source_extension: "fl".to_string(),
        };

        let args = build_compile_args(
            &command,
            &paths,
            &["-g".to_string()],
            Path::new("/tmp/out"),
            &[PathBuf::from("/tmp/src/pkg/A.fl")],
        );

        assert_eq!(
            args,
            vec![
                "-strict",
                "-g",
                "-d",
                "/tmp/out",
                "-cp",
                "/lib/a:/lib/b",
                "/tmp/src/pkg/A.fl",
            ]
        );
    }

    #[test]
    fn test_parse_args_prefer_check_flag() {
        let command = CommandConfig {
            check_flag: Some("-fsyntax-only".to_string()),
            class_path_flag: None,
            ..CommandConfig::default()
        };
        let paths = PathConfig::default();

        let args = build_parse_args(
            &command,
            &paths,
            Path::new("/tmp/out"),
            &[PathBuf::from("/tmp/src/A.java")],
        );

        assert!(args.contains(&"-fsyntax-only".to_string()));
        assert!(!args.contains(&"/tmp/out".to_string()));
    }
}
