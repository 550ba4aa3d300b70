//! Reentrancy guard for UI-triggered operations.
//!
//! - `core`: the lock state machine, its handle and status channel
//! - `guard`: the wrapper factory around a callable
//! - `triggers`: release on timeout, future settlement, stream activity, drop
//! - `registry`: accessors by handle or name, bulk release
//! - `options`: configuration

pub mod core;
pub mod guard;
pub mod options;
pub mod registry;
pub mod triggers;

pub use self::core::{LockCore, LockHandle, LockStatus};
pub use guard::{Guard, Invocation, Outcome};
pub use options::{LockConfig, LockOptions, DEFAULT_LOCKED_CLASS};
pub use registry::{is_locked, lock_options, lock_status, unlock, unlock_all, GuardSet, LockOwner};
pub use triggers::{release_on_activity, GuardedStream, ReleaseOnDrop, SharedFuture};
