//! Source units and compiled artifacts

use crate::name::TypeName;
use std::path::{Path, PathBuf};

/// Foreign source text tagged with the type name it was resolved for.
///
/// After enclosing-type fallback the tag is the enclosing type's name,
/// not the name originally requested. Units are read-only once handed to
/// the toolchain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    /// The name this unit was resolved for
    pub name: TypeName,
    /// The source text
    pub text: String,
    /// Where the text came from, if it has an on-disk origin
    pub origin: Option<PathBuf>,
}

impl SourceUnit {
    /// Create an in-memory source unit.
    pub fn new(name: TypeName, text: impl Into<String>) -> Self {
        Self {
            name,
            text: text.into(),
            origin: None,
        }
    }

    /// Set the on-disk origin of this unit.
    pub fn with_origin(mut self, origin: impl Into<PathBuf>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }
}

/// In-memory compiled output for exactly one type name.
///
/// Created by a successful compile, retained by the backing store for the
/// lifetime of the current toolchain session, and invalidated only by
/// session teardown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledArtifact {
    /// The type this artifact was compiled from
    pub name: TypeName,
    /// The compiled output
    pub bytes: Vec<u8>,
}

impl CompiledArtifact {
    pub fn new(name: TypeName, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name,
            bytes: bytes.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_construction() {
        let name = TypeName::new("pkg.A").unwrap();
        let unit = SourceUnit::new(name.clone(), "class A {}").with_origin("/srv/pkg/A.java");
        assert_eq!(unit.name, name);
        assert_eq!(unit.text, "class A {}");
        assert_eq!(unit.origin(), Some(Path::new("/srv/pkg/A.java")));
    }

    #[test]
    fn test_artifact_construction() {
        let artifact = CompiledArtifact::new(TypeName::new("pkg.A").unwrap(), vec![0xca, 0xfe]);
        assert_eq!(artifact.len(), 2);
        assert!(!artifact.is_empty());
    }
}
