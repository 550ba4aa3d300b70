//! Reentrancy guard for UI-triggered async operations.
//!
//! Wrap a handler in a [`Guard`]: the first `threshold` calls run, further
//! calls are short-circuited until the guard is released by hand, by a
//! timeout, or by the completion of what the handler returned.

pub mod services;
pub mod types;
#[cfg(test)]
pub mod test_utils;

pub use services::locator::{by_argument, by_property, by_selector, TargetLocator};
pub use services::lock::{
    is_locked, lock_options, lock_status, release_on_activity, unlock, unlock_all, Guard,
    GuardSet, GuardedStream, Invocation, LockConfig, LockHandle, LockOptions, LockOwner,
    LockStatus, Outcome, DEFAULT_LOCKED_CLASS,
};
pub use services::reflector::LockReflector;
pub use services::transport::{intercept, LockContext, LockedClient};
pub use types::errors::{LockError, LockResult};
