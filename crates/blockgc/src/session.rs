//! Shared access to an engine.
//!
//! An engine is single-writer: each operation needs a consistent view of the
//! whole object graph. A [`Session`] owns one engine behind one exclusive
//! lock, so a multi-threaded host can hand clones of it to whatever serves a
//! user's interactions. Separate sessions never share state.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::error::ConfigError;

/// A cloneable handle to one engine guarded by a mutex.
///
/// # Example
///
/// ```
/// use blockgc::{CollectionScope, Session};
///
/// let session: Session<String> = Session::new();
/// let worker = session.clone();
/// std::thread::spawn(move || {
///     worker.lock().allocate("from a thread".to_owned(), 4, []).unwrap();
/// })
/// .join()
/// .unwrap();
///
/// let collected = session.with(|engine| engine.collect(CollectionScope::All));
/// assert_eq!(collected, 1);
/// ```
#[derive(Debug)]
pub struct Session<P> {
    engine: Arc<Mutex<Engine<P>>>,
}

impl<P> Clone for Session<P> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
        }
    }
}

impl<P> Default for Session<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Session<P> {
    /// Start a session with a default engine.
    #[must_use]
    pub fn new() -> Self {
        Self::from_engine(Engine::new())
    }

    /// Start a session with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] reported by [`EngineConfig::validate`].
    pub fn with_config(config: EngineConfig) -> Result<Self, ConfigError> {
        Engine::with_config(config).map(Self::from_engine)
    }

    /// Wrap an existing engine.
    #[must_use]
    pub fn from_engine(engine: Engine<P>) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
        }
    }

    /// Lock the engine for a sequence of operations.
    pub fn lock(&self) -> MutexGuard<'_, Engine<P>> {
        self.engine.lock()
    }

    /// Run `f` with the engine locked.
    pub fn with<R>(&self, f: impl FnOnce(&mut Engine<P>) -> R) -> R {
        f(&mut self.engine.lock())
    }

    /// Whether two handles refer to the same session.
    #[must_use]
    pub fn same_session(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.engine, &other.engine)
    }
}
