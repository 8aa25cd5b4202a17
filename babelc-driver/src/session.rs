//! Toolchain session lifecycle
//!
//! Guarantees a toolchain handle exists before any other operation,
//! exactly once per generation, and decides exclusive vs shared
//! ownership. The external toolchain may call back into the driver while
//! its own handle is still being built; such calls must observe "not yet
//! ready" instead of recursing into construction.

use crate::cache::ArtifactCache;
use crate::error::DriverError;
use crate::toolchain::{Toolchain, ToolchainFactory};
use babelc_config::PathConfig;
use babelc_store::FileStore;
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// A live toolchain handle: the external compiler plus its file store.
///
/// Cheap to clone; clones refer to the same generation.
#[derive(Clone)]
pub struct Handle {
    pub toolchain: Arc<dyn Toolchain>,
    pub store: Arc<dyn FileStore>,
    owned: bool,
}

impl Handle {
    fn exclusive(toolchain: Arc<dyn Toolchain>, store: Arc<dyn FileStore>) -> Self {
        Self {
            toolchain,
            store,
            owned: true,
        }
    }

    fn shared(toolchain: Arc<dyn Toolchain>, store: Arc<dyn FileStore>) -> Self {
        Self {
            toolchain,
            store,
            owned: false,
        }
    }

    /// Whether this session exclusively owns the handle's resources.
    pub fn is_owned(&self) -> bool {
        self.owned
    }

    /// The artifact cache scoped to this handle generation.
    pub fn cache(&self) -> ArtifactCache {
        ArtifactCache::new(self.store.clone())
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle").field("owned", &self.owned).finish()
    }
}

enum State {
    Absent,
    Constructing,
    Ready(Handle),
}

/// Lazily-constructed, explicitly-torn-down toolchain session.
///
/// When a cooperating owner's handle was supplied, `ensure_ready` joins
/// it (shared mode) instead of creating a private one; a shared session
/// never reconfigures or closes resources it does not own.
pub struct ToolchainSession {
    state: Mutex<State>,
    factory: Arc<dyn ToolchainFactory>,
    shared: Option<(Arc<dyn Toolchain>, Arc<dyn FileStore>)>,
    paths: PathConfig,
}

impl ToolchainSession {
    pub fn new(factory: Arc<dyn ToolchainFactory>, paths: PathConfig) -> Self {
        Self {
            state: Mutex::new(State::Absent),
            factory,
            shared: None,
            paths,
        }
    }

    /// Join a cooperating owner's pre-configured handle instead of
    /// creating a private one.
    pub fn with_shared(
        mut self,
        toolchain: Arc<dyn Toolchain>,
        store: Arc<dyn FileStore>,
    ) -> Self {
        self.shared = Some((toolchain, store));
        self
    }

    /// The current handle, creating one if none exists. Idempotent.
    ///
    /// `Ok(None)` means the handle is mid-construction: a call arriving
    /// while construction is in flight - reentrant from the toolchain
    /// itself, or from another thread - short-circuits instead of
    /// blocking or recursing. Construction failure is fatal for this
    /// call and rolls the session back to absent.
    pub fn ensure_ready(&self) -> Result<Option<Handle>, DriverError> {
        {
            let mut state = self.lock_state()?;
            match &*state {
                State::Ready(handle) => return Ok(Some(handle.clone())),
                State::Constructing => return Ok(None),
                State::Absent => *state = State::Constructing,
            }
        }

        // The lock is dropped here: handle construction may call back
        // into `ensure_ready`, which then observes `Constructing`.
        let constructed = self.construct();

        let mut state = self.lock_state()?;
        match constructed {
            Ok(handle) => {
                *state = State::Ready(handle.clone());
                Ok(Some(handle))
            }
            Err(e) => {
                *state = State::Absent;
                Err(e)
            }
        }
    }

    fn construct(&self) -> Result<Handle, DriverError> {
        if let Some((toolchain, store)) = &self.shared {
            debug!("joining shared toolchain handle");
            return Ok(Handle::shared(toolchain.clone(), store.clone()));
        }

        info!("creating exclusive toolchain handle");
        let (toolchain, store) = self
            .factory
            .create(&self.paths)
            .map_err(|source| DriverError::SessionConstruction { source })?;
        Ok(Handle::exclusive(toolchain, store))
    }

    /// Release the current handle. The next operation lazily creates a
    /// fresh one, with an empty artifact cache.
    ///
    /// Exclusive stores are closed; a shared handle is dropped without
    /// touching resources its cooperating owner still uses. Calling this
    /// concurrently with in-flight requests is undefined behavior by
    /// contract.
    pub fn teardown(&self) -> Result<(), DriverError> {
        let previous = {
            let mut state = self.lock_state()?;
            std::mem::replace(&mut *state, State::Absent)
        };

        if let State::Ready(handle) = previous {
            if handle.is_owned() {
                info!("closing exclusive toolchain handle");
                handle.store.close()?;
            } else {
                debug!("releasing shared toolchain handle");
            }
        }
        Ok(())
    }

    fn lock_state(&self) -> Result<std::sync::MutexGuard<'_, State>, DriverError> {
        self.state.lock().map_err(|_| DriverError::StatePoisoned)
    }
}

impl fmt::Debug for ToolchainSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state.lock() {
            Ok(guard) => match &*guard {
                State::Absent => "absent",
                State::Constructing => "constructing",
                State::Ready(_) => "ready",
            },
            Err(_) => "poisoned",
        };
        f.debug_struct("ToolchainSession")
            .field("state", &state)
            .field("shared", &self.shared.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::DiagnosticSink;
    use crate::error::ToolchainError;
    use crate::toolchain::{Parsed, ParseRequest};
    use babelc_store::{MemoryStore, SourceUnit, TypeName};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct IdleToolchain;

    impl Toolchain for IdleToolchain {
        fn parse(
            &self,
            _units: &[SourceUnit],
            _request: ParseRequest,
            _sink: &mut dyn DiagnosticSink,
        ) -> Result<Parsed, ToolchainError> {
            Ok(Parsed::trees(Vec::new()))
        }

        fn compile(
            &self,
            _units: &[SourceUnit],
            _options: &[String],
            _store: &dyn FileStore,
            _sink: &mut dyn DiagnosticSink,
        ) -> Result<bool, ToolchainError> {
            Ok(true)
        }
    }

    struct CountingFactory {
        creations: AtomicUsize,
    }

    impl CountingFactory {
        fn new() -> Self {
            Self {
                creations: AtomicUsize::new(0),
            }
        }
    }

    impl ToolchainFactory for CountingFactory {
        fn create(
            &self,
            _paths: &PathConfig,
        ) -> Result<(Arc<dyn Toolchain>, Arc<dyn FileStore>), ToolchainError> {
            self.creations.fetch_add(1, Ordering::SeqCst);
            Ok((Arc::new(IdleToolchain), Arc::new(MemoryStore::new())))
        }
    }

    struct FailingFactory;

    impl ToolchainFactory for FailingFactory {
        fn create(
            &self,
            _paths: &PathConfig,
        ) -> Result<(Arc<dyn Toolchain>, Arc<dyn FileStore>), ToolchainError> {
            Err(ToolchainError::Unavailable("no compiler on host".to_string()))
        }
    }

    /// Factory that calls back into its own session mid-construction, the
    /// way an external toolchain can trigger a resolution that loops back
    /// into the driver before the handle is finished.
    struct ReentrantFactory {
        session: Mutex<Option<Arc<ToolchainSession>>>,
        observed_not_ready: AtomicUsize,
    }

    impl ReentrantFactory {
        fn new() -> Self {
            Self {
                session: Mutex::new(None),
                observed_not_ready: AtomicUsize::new(0),
            }
        }

        fn attach(&self, session: Arc<ToolchainSession>) {
            *self.session.lock().unwrap() = Some(session);
        }
    }

    impl ToolchainFactory for ReentrantFactory {
        fn create(
            &self,
            _paths: &PathConfig,
        ) -> Result<(Arc<dyn Toolchain>, Arc<dyn FileStore>), ToolchainError> {
            let session = self.session.lock().unwrap().clone().unwrap();
            if session.ensure_ready().unwrap().is_none() {
                self.observed_not_ready.fetch_add(1, Ordering::SeqCst);
            }
            Ok((Arc::new(IdleToolchain), Arc::new(MemoryStore::new())))
        }
    }

    #[test]
    fn test_ensure_ready_is_idempotent() {
        let factory = Arc::new(CountingFactory::new());
        let session = ToolchainSession::new(factory.clone(), PathConfig::default());

        let first = session.ensure_ready().unwrap().unwrap();
        let second = session.ensure_ready().unwrap().unwrap();

        assert_eq!(factory.creations.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first.toolchain, &second.toolchain));
        assert!(first.is_owned());
    }

    #[test]
    fn test_reentrant_construction_short_circuits() {
        let factory = Arc::new(ReentrantFactory::new());
        let session = Arc::new(ToolchainSession::new(
            factory.clone(),
            PathConfig::default(),
        ));
        factory.attach(session.clone());

        let handle = session.ensure_ready().unwrap();
        assert!(handle.is_some());
        assert_eq!(factory.observed_not_ready.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_construction_failure_rolls_back() {
        let session = ToolchainSession::new(Arc::new(FailingFactory), PathConfig::default());

        let err = session.ensure_ready().unwrap_err();
        assert!(matches!(err, DriverError::SessionConstruction { .. }));

        // The session must be usable again, not stuck constructing
        let err = session.ensure_ready().unwrap_err();
        assert!(matches!(err, DriverError::SessionConstruction { .. }));
    }

    #[test]
    fn test_teardown_then_lazy_recreation() {
        let factory = Arc::new(CountingFactory::new());
        let session = ToolchainSession::new(factory.clone(), PathConfig::default());

        session.ensure_ready().unwrap();
        session.teardown().unwrap();
        session.ensure_ready().unwrap();

        assert_eq!(factory.creations.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_teardown_without_handle_is_noop() {
        let session =
            ToolchainSession::new(Arc::new(CountingFactory::new()), PathConfig::default());
        session.teardown().unwrap();
    }

    #[test]
    fn test_shared_handle_is_joined_not_created() {
        let factory = Arc::new(CountingFactory::new());
        let toolchain: Arc<dyn Toolchain> = Arc::new(IdleToolchain);
        let store = Arc::new(MemoryStore::new());

        let session = ToolchainSession::new(factory.clone(), PathConfig::default())
            .with_shared(toolchain, store.clone());

        let handle = session.ensure_ready().unwrap().unwrap();
        assert!(!handle.is_owned());
        assert_eq!(factory.creations.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_teardown_leaves_shared_store_open() {
        let toolchain: Arc<dyn Toolchain> = Arc::new(IdleToolchain);
        let store = Arc::new(MemoryStore::new());
        store.put_artifact(babelc_store::CompiledArtifact::new(
            TypeName::new("pkg.A").unwrap(),
            vec![1],
        ));

        let session = ToolchainSession::new(Arc::new(CountingFactory::new()), PathConfig::default())
            .with_shared(toolchain, store.clone());

        session.ensure_ready().unwrap();
        session.teardown().unwrap();

        // The cooperating owner's artifacts were not cleared
        assert_eq!(store.artifact_count(), 1);
    }

    fn _assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_session_is_send_sync() {
        _assert_send_sync::<ToolchainSession>();
    }
}
