//! Build-once state holder used by the calendar and session registries.
//!
//! Readers go through a lock-free `OnceLock`. Builders serialize on a mutex
//! so concurrent `configure` calls build at most once and nobody observes a
//! partially built state. Resetting needs `&mut self`.

use std::fmt;
use std::sync::{Mutex, OnceLock, PoisonError};

pub struct InitOnce<S> {
    guard: Mutex<()>,
    state: OnceLock<S>,
}

impl<S> InitOnce<S> {
    pub fn new() -> Self {
        Self {
            guard: Mutex::new(()),
            state: OnceLock::new(),
        }
    }

    pub fn get(&self) -> Option<&S> {
        self.state.get()
    }

    /// Runs `build` unless a state is already present. Returns `true` when
    /// this call built the state.
    pub fn init_with<E>(&self, build: impl FnOnce() -> Result<S, E>) -> Result<bool, E> {
        if self.state.get().is_some() {
            return Ok(false);
        }
        let _guard = self.guard.lock().unwrap_or_else(PoisonError::into_inner);
        if self.state.get().is_some() {
            return Ok(false);
        }
        let state = build()?;
        // Only the guard holder sets, so this cannot already be filled.
        let _ = self.state.set(state);
        Ok(true)
    }

    pub fn reset(&mut self) -> Option<S> {
        self.state.take()
    }
}

impl<S> Default for InitOnce<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: fmt::Debug> fmt::Debug for InitOnce<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InitOnce")
            .field("state", &self.state.get())
            .finish()
    }
}
