//! Babelc Config - Pure configuration data structures
//!
//! This crate contains only data structures, no logic or global state.
//! It serves as the shared configuration vocabulary across all babelc crates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where an exclusively-owned toolchain handle looks for foreign sources
/// and referenced compiled types.
///
/// Consulted only while constructing an exclusive handle; shared handles
/// arrive already configured by their cooperating owner and are never
/// reconfigured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    /// Roots searched for foreign source files
    #[serde(default)]
    pub source_path: Vec<PathBuf>,
    /// Entries the toolchain uses to resolve references outside the
    /// compiled units
    #[serde(default)]
    pub class_path: Vec<PathBuf>,
    /// File extension of foreign source files, without the dot
    #[serde(default = "default_source_extension")]
    pub source_extension: String,
}

fn default_source_extension() -> String {
    "java".to_string()
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            source_path: Vec::new(),
            class_path: Vec::new(),
            source_extension: default_source_extension(),
        }
    }
}

impl PathConfig {
    /// Config rooted at a single source directory.
    pub fn with_source_root(root: impl Into<PathBuf>) -> Self {
        Self {
            source_path: vec![root.into()],
            ..Self::default()
        }
    }
}

/// How to invoke an external compiler executable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandConfig {
    /// Executable name or path
    pub program: String,
    /// Flag that stops the toolchain after syntax checking, used for
    /// parse-only requests (e.g. `-fsyntax-only`). When absent, parse-only
    /// requests compile into a scratch directory that is discarded.
    #[serde(default)]
    pub check_flag: Option<String>,
    /// Flag that selects the artifact output directory (e.g. `-d`)
    #[serde(default = "default_output_flag")]
    pub output_flag: String,
    /// Flag that passes the reference path (e.g. `-classpath`)
    #[serde(default)]
    pub class_path_flag: Option<String>,
    /// Extension of emitted artifact files, without the dot
    #[serde(default = "default_artifact_extension")]
    pub artifact_extension: String,
    /// Options prepended to every invocation
    #[serde(default)]
    pub base_options: Vec<String>,
}

fn default_output_flag() -> String {
    "-d".to_string()
}

fn default_artifact_extension() -> String {
    "class".to_string()
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            program: "javac".to_string(),
            check_flag: None,
            output_flag: default_output_flag(),
            class_path_flag: Some("-classpath".to_string()),
            artifact_extension: default_artifact_extension(),
            base_options: vec!["-proc:none".to_string()],
        }
    }
}

/// Log verbosity for the driver crates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Get the string name of the level
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// Parse a level name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "silent" | "error" => Some(LogLevel::Error),
            "warn" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Warn
    }
}
