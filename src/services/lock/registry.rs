//! Accessors by handle and by name, and bulk release of an owner's guards.

use std::collections::BTreeMap;

use super::core::{LockHandle, LockStatus};
use super::options::LockOptions;
use super::triggers::{BULK_RELEASE, MANUAL};
use crate::types::errors::{LockError, LockResult};

/// An object exposing the guards of its methods.
pub trait LockOwner {
    fn lock_handles(&self) -> Vec<LockHandle>;
}

/// Release a guard. The reason defaults to `"manual"`.
pub fn unlock(handle: &LockHandle, reason: Option<&str>) -> LockResult<()> {
    handle.release(reason.unwrap_or(MANUAL))
}

pub fn is_locked(handle: &LockHandle) -> LockResult<bool> {
    handle.is_locked()
}

pub fn lock_status(handle: &LockHandle) -> LockResult<LockStatus> {
    handle.status()
}

pub fn lock_options(handle: &LockHandle) -> LockResult<LockOptions> {
    handle.options()
}

/// Release every guard of `owner`. Returns how many were live.
///
/// Already-unlocked guards are released again without error; guards that
/// no longer exist are skipped.
pub fn unlock_all<T: LockOwner + ?Sized>(owner: &T) -> usize {
    owner
        .lock_handles()
        .iter()
        .filter(|handle| handle.release(BULK_RELEASE).is_ok())
        .count()
}

// ─── GuardSet ────────────────────────────────────────────────────────────────

/// Named guards of one owner.
///
/// By-name accessors fail with `LockError::NotGuarded` for names that were
/// never registered, naming the accessor that was misused.
#[derive(Debug, Default, Clone)]
pub struct GuardSet {
    handles: BTreeMap<String, LockHandle>,
}

impl GuardSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register under the guard's own name, replacing any previous entry.
    pub fn register(&mut self, handle: LockHandle) {
        self.handles.insert(handle.name().to_string(), handle);
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handles.keys().map(String::as_str)
    }

    pub fn handle(&self, method: &str) -> LockResult<&LockHandle> {
        self.lookup("handle", method)
    }

    pub fn release(&self, method: &str, reason: Option<&str>) -> LockResult<()> {
        unlock(self.lookup("release", method)?, reason)
    }

    pub fn is_locked(&self, method: &str) -> LockResult<bool> {
        self.lookup("is_locked", method)?.is_locked()
    }

    pub fn status(&self, method: &str) -> LockResult<LockStatus> {
        self.lookup("status", method)?.status()
    }

    pub fn options(&self, method: &str) -> LockResult<LockOptions> {
        self.lookup("options", method)?.options()
    }

    fn lookup(&self, function: &str, method: &str) -> LockResult<&LockHandle> {
        self.handles
            .get(method)
            .ok_or_else(|| LockError::not_guarded(function, method))
    }
}

impl LockOwner for GuardSet {
    fn lock_handles(&self) -> Vec<LockHandle> {
        self.handles.values().cloned().collect()
    }
}

#[cfg(test)]
#[path = "tests/registry_tests.rs"]
mod tests;
