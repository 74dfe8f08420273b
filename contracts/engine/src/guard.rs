//! Reentrancy Guard
//!
//! Mutual-exclusion region around every state-mutating entry point. The
//! hazard is synchronous self-reentrancy: a token collaborator calling back
//! into the engine before the original operation finishes. Execution is
//! otherwise single-threaded, so a plain flag is sufficient.

use std::cell::Cell;

use synthusd_common::errors::{SynthError, SynthResult};

/// Engine-local lock flag
#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    locked: Cell<bool>,
}

impl ReentrancyGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the guarded region.
    ///
    /// Fails with `Reentrancy` if a guarded operation is already active.
    /// The returned permit clears the flag when dropped, so every exit path
    /// (including error returns) releases the lock.
    pub fn enter(&self) -> SynthResult<EntryPermit<'_>> {
        if self.locked.get() {
            return Err(SynthError::Reentrancy);
        }
        self.locked.set(true);
        Ok(EntryPermit { guard: self })
    }

    /// True while a guarded operation is active
    pub fn is_locked(&self) -> bool {
        self.locked.get()
    }
}

/// Scoped permit for one guarded operation
#[derive(Debug)]
pub struct EntryPermit<'a> {
    guard: &'a ReentrancyGuard,
}

impl Drop for EntryPermit<'_> {
    fn drop(&mut self) {
        self.guard.locked.set(false);
    }
}
