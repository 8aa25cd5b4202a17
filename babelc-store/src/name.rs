//! Fully-qualified type names

use crate::error::{StoreError, StoreResult};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// A dot-separated fully-qualified type name, e.g. `pkg.Outer.Inner`.
///
/// A nested type's enclosing type is derivable by truncating the name at
/// its last separator. Names are always non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeName(String);

impl TypeName {
    /// Create a type name. Fails on an empty name.
    pub fn new(name: impl Into<String>) -> StoreResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(StoreError::InvalidName {
                reason: "empty name".to_string(),
            });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The enclosing type's name, if this name is nested.
    ///
    /// Truncation never produces an empty name: `.Inner` has no enclosing
    /// type even though it contains a separator.
    pub fn enclosing(&self) -> Option<TypeName> {
        match self.0.rfind('.') {
            Some(idx) if idx > 0 => Some(TypeName(self.0[..idx].to_string())),
            _ => None,
        }
    }

    /// The last segment of the name.
    pub fn simple_name(&self) -> &str {
        match self.0.rfind('.') {
            Some(idx) => &self.0[idx + 1..],
            None => &self.0,
        }
    }

    /// Relative file path for this name: `pkg.Outer` becomes
    /// `pkg/Outer.<extension>`.
    pub fn as_rel_path(&self, extension: &str) -> PathBuf {
        let mut path = PathBuf::from(self.0.replace('.', "/"));
        path.set_extension(extension);
        path
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TypeName {
    type Err = StoreError;

    fn from_str(s: &str) -> StoreResult<Self> {
        TypeName::new(s)
    }
}
