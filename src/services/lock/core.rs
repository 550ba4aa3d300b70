//! Lock state machine shared by a guard and every release trigger.
//!
//! A guard is `UNLOCKED` while `call_counter < threshold` and `LOCKED`
//! otherwise; that predicate alone drives the status channel, the element
//! marking and the short-circuit in `Guard::invoke`. Any release resets the
//! counter to zero and starts a new cycle.
//!
//! **Locking model:** the state mutex is never held while user code runs
//! (locators, wrapped methods), so a wrapped method calling back into its own
//! guard sees the locked state instead of deadlocking.

use std::sync::{Arc, Mutex, MutexGuard, Weak};

use tokio::sync::watch;
use tokio::task::AbortHandle;

use super::options::LockOptions;
use super::triggers;
use crate::services::locator::TargetLocator;
use crate::services::ui::{mark_locked, mark_unlocked, CallArg, Component, WeakElement};
use crate::types::errors::{LockError, LockResult};

pub(crate) const LOG_TARGET: &str = "ui_lock";

// ─── State ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct LockState {
    /// Calls admitted since the last release.
    call_counter: u32,
    /// Bumped on every release; timers only release the cycle that armed them.
    cycle: u64,
    /// Whether the current cycle already went through the lock transition.
    engaged: bool,
    /// Pending auto-release timer, only while locked.
    timeout: Option<AbortHandle>,
    /// Element marked for the current cycle.
    locked_element: Option<WeakElement>,
}

/// Outcome of asking the core to admit a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Admission {
    Admitted,
    Rejected,
}

pub struct LockCore {
    name: String,
    options: LockOptions,
    state: Mutex<LockState>,
    status: watch::Sender<bool>,
}

impl LockCore {
    pub fn new(name: &str, options: LockOptions) -> LockResult<Arc<Self>> {
        options.validate()?;
        let (status, _) = watch::channel(false);
        let core = Arc::new(Self {
            name: name.to_string(),
            options,
            state: Mutex::new(LockState::default()),
            status,
        });
        if core.options.verbose_logging {
            log::debug!(target: LOG_TARGET, "Lock: guard method \"{}\"", core.name);
        }
        Ok(core)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &LockOptions {
        &self.options
    }

    pub fn is_locked(&self) -> bool {
        self.lock_state().call_counter >= self.options.threshold
    }

    pub fn call_count(&self) -> u32 {
        self.lock_state().call_counter
    }

    /// New observer of the status channel; starts at the current value.
    pub fn status(&self) -> LockStatus {
        LockStatus {
            name: Arc::from(self.name.as_str()),
            receiver: self.status.subscribe(),
        }
    }

    pub fn handle(self: &Arc<Self>) -> LockHandle {
        LockHandle {
            name: Arc::from(self.name.as_str()),
            core: Arc::downgrade(self),
        }
    }

    /// Admit or reject a call.
    ///
    /// Order: counter increment, target resolution, then (on the lock
    /// transition) marking, status publication and timer arming. A failed
    /// resolution keeps the increment and is returned after the transition
    /// has been processed, so the status still matches the counter.
    pub(crate) fn enter(
        self: &Arc<Self>,
        owner: &dyn Component,
        args: &[CallArg],
        locator: Option<&dyn TargetLocator>,
    ) -> LockResult<Admission> {
        let threshold = self.options.threshold;
        let cycle = {
            let mut state = self.lock_state();
            if state.call_counter >= threshold {
                if self.options.verbose_logging {
                    log::debug!(
                        target: LOG_TARGET,
                        "Lock: method \"{}\" locked at counter {}",
                        self.name,
                        state.call_counter
                    );
                }
                return Ok(Admission::Rejected);
            }
            state.call_counter += 1;
            state.cycle
        };

        let resolved = match locator {
            Some(locator) => locator.locate(owner, args).map(Some),
            None => Ok(None),
        };

        let mut state = self.lock_state();
        // A release while the locator ran started a new cycle this call no longer belongs to
        let same_cycle = state.cycle == cycle;
        if !same_cycle && self.options.verbose_logging {
            log::debug!(
                target: LOG_TARGET,
                "Lock: method \"{}\" released during target resolution",
                self.name
            );
        }
        if let (true, Ok(Some(element))) = (same_cycle, &resolved) {
            state.locked_element = Some(element.downgrade());
        }
        if same_cycle && state.call_counter >= threshold && !state.engaged {
            state.engaged = true;
            if let Some(element) = state.locked_element.as_ref().and_then(WeakElement::upgrade) {
                mark_locked(&element, self.options.locked_class());
            }
            self.status.send_if_modified(|locked| !std::mem::replace(locked, true));
            if let Some(delay) = self.options.auto_release_delay() {
                state.timeout = triggers::arm_timer(self, state.cycle, delay);
            }
        }
        let counter = state.call_counter;
        drop(state);

        resolved?;
        if self.options.verbose_logging {
            log::debug!(
                target: LOG_TARGET,
                "Lock: execute method \"{}\" at counter {}",
                self.name,
                counter
            );
        }
        Ok(Admission::Admitted)
    }

    /// Reset to `UNLOCKED`. Safe to call any number of times.
    pub fn release(&self, reason: &str) {
        let mut state = self.lock_state();
        self.reset(&mut state, reason);
    }

    /// Release only if `cycle` is still the current one.
    pub(crate) fn release_cycle(&self, cycle: u64, reason: &str) {
        let mut state = self.lock_state();
        if state.cycle != cycle {
            if self.options.verbose_logging {
                log::debug!(
                    target: LOG_TARGET,
                    "Lock: stale {reason} ignored for method \"{}\"",
                    self.name
                );
            }
            return;
        }
        self.reset(&mut state, reason);
    }

    fn reset(&self, state: &mut LockState, reason: &str) {
        let was_locked = state.call_counter >= self.options.threshold;
        if self.options.verbose_logging {
            if was_locked {
                log::debug!(
                    target: LOG_TARGET,
                    "Lock: unlock method \"{}\" at counter {} ({reason})",
                    self.name,
                    state.call_counter
                );
            } else {
                log::warn!(
                    target: LOG_TARGET,
                    "Lock: method \"{}\" released while not locked ({reason})",
                    self.name
                );
            }
        }

        state.call_counter = 0;
        state.engaged = false;
        state.cycle = state.cycle.wrapping_add(1);
        if let Some(timer) = state.timeout.take() {
            timer.abort();
        }
        if let Some(element) = state.locked_element.take().and_then(|weak| weak.upgrade()) {
            mark_unlocked(&element, self.options.locked_class());
        }
        self.status.send_if_modified(|locked| std::mem::replace(locked, false));
    }

    fn lock_state(&self) -> MutexGuard<'_, LockState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }
}

// ─── Handle ──────────────────────────────────────────────────────────────────

/// Non-owning reference to a guard's lock state.
///
/// Handles are what triggers, registries and transport markers hold; they do
/// not keep the guard alive, and every accessor fails with
/// `LockError::Detached` once the guard is gone.
#[derive(Clone)]
pub struct LockHandle {
    name: Arc<str>,
    core: Weak<LockCore>,
}

impl LockHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn release(&self, reason: &str) -> LockResult<()> {
        self.core()?.release(reason);
        Ok(())
    }

    pub fn is_locked(&self) -> LockResult<bool> {
        Ok(self.core()?.is_locked())
    }

    pub fn status(&self) -> LockResult<LockStatus> {
        Ok(self.core()?.status())
    }

    pub fn options(&self) -> LockResult<LockOptions> {
        Ok(self.core()?.options().clone())
    }

    pub fn is_alive(&self) -> bool {
        self.core.strong_count() > 0
    }

    fn core(&self) -> LockResult<Arc<LockCore>> {
        self.core
            .upgrade()
            .ok_or_else(|| LockError::Detached(self.name.to_string()))
    }
}

impl std::fmt::Debug for LockHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockHandle")
            .field("name", &self.name)
            .field("alive", &self.is_alive())
            .finish()
    }
}

// ─── Status ──────────────────────────────────────────────────────────────────

/// Observer of a guard's locked/unlocked status.
///
/// Backed by a `watch` channel: every observer sees the current value first,
/// then later transitions. Rapid transitions may be coalesced into the latest
/// value.
#[derive(Debug, Clone)]
pub struct LockStatus {
    name: Arc<str>,
    receiver: watch::Receiver<bool>,
}

impl LockStatus {
    pub fn get(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Wait for the next transition. `None` once the guard is dropped.
    pub async fn changed(&mut self) -> Option<bool> {
        self.receiver.changed().await.ok()?;
        Some(*self.receiver.borrow_and_update())
    }

    /// Wait until the status equals `locked`.
    pub async fn wait_for(&mut self, locked: bool) -> LockResult<()> {
        self.receiver
            .wait_for(|value| *value == locked)
            .await
            .map(|_| ())
            .map_err(|_| LockError::Detached(self.name.to_string()))
    }

    /// Stream of statuses starting with the current one.
    pub fn into_stream(self) -> impl futures_util::Stream<Item = bool> + Send + 'static {
        use futures_util::stream::{self, StreamExt};

        let mut receiver = self.receiver;
        let current = *receiver.borrow_and_update();
        stream::once(async move { current }).chain(stream::unfold(receiver, |mut rx| async move {
            rx.changed().await.ok()?;
            let value = *rx.borrow_and_update();
            Some((value, rx))
        }))
    }
}

#[cfg(test)]
#[path = "tests/core_tests.rs"]
mod tests;
