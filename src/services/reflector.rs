//! Mirrors a guard's status onto an element.
//!
//! The reflector holds the element weakly and stops on its own once it sees the
//! host tore the element down. Dropping the reflector stops it as well.

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::services::lock::core::LOG_TARGET;
use crate::services::lock::LockHandle;
use crate::services::ui::{mark_locked, mark_unlocked, Element};
use crate::types::errors::{LockError, LockResult};

/// Binding of one guard's status to one element.
///
/// Teardown of the element is noticed when the task starts and on every
/// status transition; between transitions the subscription stays open.
/// Hosts that tear elements down while the guard is idle should drop or
/// `unbind` the reflector with the element.
pub struct LockReflector {
    guard: String,
    task: JoinHandle<()>,
}

impl LockReflector {
    /// Apply the current status to `element` now, then follow every transition.
    pub fn bind(handle: &LockHandle, element: &Element) -> LockResult<Self> {
        let runtime = Handle::try_current().map_err(|_| {
            LockError::Configuration(format!(
                "reflector for \"{}\" needs a running tokio runtime",
                handle.name()
            ))
        })?;
        let mut status = handle.status()?;
        let class = handle.options()?.locked_class().map(str::to_string);

        apply(element, status.get(), class.as_deref());

        let target = element.downgrade();
        let name = handle.name().to_string();
        let task = runtime.spawn(async move {
            if !target.is_alive() {
                log::debug!(target: LOG_TARGET, "Reflector: element of \"{name}\" is gone");
                return;
            }
            while let Some(locked) = status.changed().await {
                let Some(element) = target.upgrade() else {
                    log::debug!(target: LOG_TARGET, "Reflector: element of \"{name}\" is gone");
                    return;
                };
                apply(&element, locked, class.as_deref());
            }
        });

        Ok(Self {
            guard: handle.name().to_string(),
            task,
        })
    }

    pub fn guard(&self) -> &str {
        &self.guard
    }

    /// True once the element or the guard is gone.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop reflecting. The element keeps whatever marking it has.
    pub fn unbind(self) {}
}

impl Drop for LockReflector {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn apply(element: &Element, locked: bool, class: Option<&str>) {
    if locked {
        mark_locked(element, class);
    } else {
        mark_unlocked(element, class);
    }
}

#[cfg(test)]
#[path = "tests/reflector_tests.rs"]
mod tests;
