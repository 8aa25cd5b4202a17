//! Name-to-source resolution
//!
//! Resolves a fully-qualified type name to the source unit declaring it.
//! A nested type's source lives in its enclosing type's unit, so a direct
//! miss retries with the name truncated at the last separator until no
//! separator remains.

use crate::error::DriverError;
use crate::outcome::Resolution;
use crate::session::ToolchainSession;
use babelc_store::{FileStore, SourceUnit, TypeName};
use std::sync::Arc;
use tracing::trace;

/// A source unit together with the name it was actually resolved for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
    pub unit: SourceUnit,
    /// The name the unit was found under; the enclosing type's name when
    /// nested-type fallback occurred.
    pub name: TypeName,
}

/// Resolves type names against the session store.
pub struct SourceLocator {
    session: Arc<ToolchainSession>,
}

impl SourceLocator {
    pub fn new(session: Arc<ToolchainSession>) -> Self {
        Self { session }
    }

    /// Resolve `name`, falling back to enclosing types.
    ///
    /// Returns `NotFound` when every truncation level misses, and also
    /// while the session handle is mid-construction; only store I/O
    /// failures unrelated to absence are errors.
    pub fn resolve(&self, name: &TypeName) -> Result<Resolution<ResolvedSource>, DriverError> {
        match self.session.ensure_ready()? {
            Some(handle) => Ok(resolve_in_store(handle.store.as_ref(), name)?
                .map_or(Resolution::NotFound, Resolution::Found)),
            // Mid-construction reentrancy: fail soft
            None => Ok(Resolution::NotFound),
        }
    }
}

/// The truncation loop, shared with the compile service which already
/// holds a handle.
pub(crate) fn resolve_in_store(
    store: &dyn FileStore,
    name: &TypeName,
) -> Result<Option<ResolvedSource>, DriverError> {
    let mut current = name.clone();
    loop {
        if let Some(unit) = store.find_source(&current)? {
            return Ok(Some(ResolvedSource {
                unit,
                name: current,
            }));
        }
        match current.enclosing() {
            Some(enclosing) => {
                trace!("no source for {current}, retrying as {enclosing}");
                current = enclosing;
            }
            None => return Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use babelc_store::MemoryStore;

    fn name(s: &str) -> TypeName {
        TypeName::new(s).unwrap()
    }

    fn store_with(names: &[&str]) -> MemoryStore {
        MemoryStore::with_sources(
            names
                .iter()
                .map(|n| SourceUnit::new(name(n), format!("source of {n}"))),
        )
    }

    #[test]
    fn test_direct_hit_keeps_name() {
        let store = store_with(&["pkg.Outer"]);
        let resolved = resolve_in_store(&store, &name("pkg.Outer"))
            .unwrap()
            .unwrap();
        assert_eq!(resolved.name, name("pkg.Outer"));
        assert_eq!(resolved.unit.text, "source of pkg.Outer");
    }

    #[test]
    fn test_nested_name_falls_back_to_enclosing() {
        let store = store_with(&["pkg.Outer"]);
        let resolved = resolve_in_store(&store, &name("pkg.Outer.Inner"))
            .unwrap()
            .unwrap();
        // The unit is tagged with the name it was found under
        assert_eq!(resolved.name, name("pkg.Outer"));
    }

    #[test]
    fn test_fallback_walks_several_levels() {
        let store = store_with(&["pkg.Outer"]);
        let resolved = resolve_in_store(&store, &name("pkg.Outer.Inner.Deeper"))
            .unwrap()
            .unwrap();
        assert_eq!(resolved.name, name("pkg.Outer"));
    }

    #[test]
    fn test_exhausted_fallback_is_absent() {
        let store = store_with(&["pkg.Other"]);
        assert!(resolve_in_store(&store, &name("pkg.Outer.Inner"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_package_segment_is_tried_last() {
        // A source registered under the bare package name still resolves
        let store = store_with(&["pkg"]);
        let resolved = resolve_in_store(&store, &name("pkg.Outer.Inner"))
            .unwrap()
            .unwrap();
        assert_eq!(resolved.name, name("pkg"));
    }
}
