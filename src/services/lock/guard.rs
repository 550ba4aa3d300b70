//! Guarded callables.
//!
//! `Guard::new` wraps a plain callable and its configuration into a value
//! that carries its own release/query/status accessors. The wrapped method
//! reports the shape of its result through `Outcome`, and the guard attaches
//! the matching release trigger.

use std::future::Future;
use std::sync::{Arc, Mutex};

use futures_util::future::{BoxFuture, FutureExt};
use futures_util::stream::{BoxStream, Stream, StreamExt};

use super::core::{Admission, LockCore, LockHandle, LockStatus};
use super::options::{LockConfig, LockOptions};
use super::triggers::{self, GuardedStream, SharedFuture};
use crate::services::locator::TargetLocator;
use crate::services::ui::{CallArg, Component};
use crate::types::errors::LockResult;

/// What a wrapped method produced.
pub enum Outcome<T> {
    /// Finished synchronously.
    Value(T),
    /// Work still in flight; settles with `T` (use `Result` for failures).
    Future(BoxFuture<'static, T>),
    /// A stream of results; each `Err` item counts as a stream error.
    Stream(BoxStream<'static, anyhow::Result<T>>),
}

impl<T> Outcome<T> {
    pub fn future<F>(future: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Outcome::Future(future.boxed())
    }

    pub fn stream<S>(stream: S) -> Self
    where
        S: Stream<Item = anyhow::Result<T>> + Send + 'static,
    {
        Outcome::Stream(stream.boxed())
    }
}

/// What a call to a guard returned.
pub enum Invocation<T> {
    Ready(T),
    Pending(SharedFuture<T>),
    Streaming(GuardedStream<T>),
    /// The guard was locked and the method did not run.
    Locked,
}

impl<T: Clone> Invocation<T> {
    pub fn is_locked(&self) -> bool {
        matches!(self, Invocation::Locked)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Invocation::Ready(value) => Some(value),
            _ => None,
        }
    }

    /// Resolve to the produced value. Streams and locked calls yield `None`.
    pub async fn settle(self) -> Option<T> {
        match self {
            Invocation::Ready(value) => Some(value),
            Invocation::Pending(future) => Some(future.await),
            Invocation::Streaming(_) | Invocation::Locked => None,
        }
    }

    /// Copy of this result that can be handed out again, if any.
    fn replay(&self) -> Option<Invocation<T>> {
        match self {
            Invocation::Ready(value) => Some(Invocation::Ready(value.clone())),
            Invocation::Pending(future) => Some(Invocation::Pending(future.clone())),
            Invocation::Streaming(_) | Invocation::Locked => None,
        }
    }
}

impl<T> std::fmt::Debug for Invocation<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Invocation::Ready(_) => "Ready",
            Invocation::Pending(_) => "Pending",
            Invocation::Streaming(_) => "Streaming",
            Invocation::Locked => "Locked",
        };
        f.write_str(kind)
    }
}

type Handler<O, T> = dyn Fn(&O, &[CallArg]) -> Outcome<T> + Send + Sync;

/// One guarded method: the callable plus its lock state.
pub struct Guard<O, T> {
    core: Arc<LockCore>,
    locator: Option<Arc<dyn TargetLocator>>,
    handler: Box<Handler<O, T>>,
    last_result: Mutex<Option<Invocation<T>>>,
}

impl<O, T> Guard<O, T>
where
    O: Component,
    T: Clone + Send + Sync + 'static,
{
    pub fn new<F>(name: &str, config: LockConfig, handler: F) -> LockResult<Self>
    where
        F: Fn(&O, &[CallArg]) -> Outcome<T> + Send + Sync + 'static,
    {
        Ok(Self {
            core: LockCore::new(name, config.options)?,
            locator: config.locator,
            handler: Box::new(handler),
            last_result: Mutex::new(None),
        })
    }

    /// Guard with the default configuration.
    pub fn with_defaults<F>(name: &str, handler: F) -> LockResult<Self>
    where
        F: Fn(&O, &[CallArg]) -> Outcome<T> + Send + Sync + 'static,
    {
        Self::new(name, LockConfig::default(), handler)
    }

    /// Call the wrapped method unless the guard is locked.
    ///
    /// While locked the method does not run and the result is
    /// `Invocation::Locked`, or the last replayable result when
    /// `return_last_result_while_locked` is set.
    ///
    /// A locator error is returned before the method runs, but the call has
    /// already been counted: with the default threshold of 1 the guard stays
    /// locked until something releases it.
    pub fn invoke(&self, owner: &O, args: &[CallArg]) -> LockResult<Invocation<T>> {
        let admission = self.core.enter(owner, args, self.locator.as_deref())?;
        if admission == Admission::Rejected {
            if self.core.options().return_last_result_while_locked {
                let last = self.last_result.lock().unwrap_or_else(|p| p.into_inner());
                if let Some(replayed) = last.as_ref().and_then(Invocation::replay) {
                    return Ok(replayed);
                }
            }
            return Ok(Invocation::Locked);
        }

        let options = self.core.options();
        let invocation = match (self.handler)(owner, args) {
            Outcome::Value(value) => Invocation::Ready(value),
            Outcome::Future(future) if options.release_on_future_settle => {
                Invocation::Pending(triggers::release_on_settle(future, self.handle()))
            }
            Outcome::Future(future) => Invocation::Pending(future.shared()),
            Outcome::Stream(stream) if options.release_on_stream_activity => {
                Invocation::Streaming(GuardedStream::releasing(stream, self.handle()))
            }
            Outcome::Stream(stream) => Invocation::Streaming(GuardedStream::passthrough(stream)),
        };

        *self.last_result.lock().unwrap_or_else(|p| p.into_inner()) = invocation.replay();
        Ok(invocation)
    }

    pub fn release(&self, reason: &str) {
        self.core.release(reason);
    }

    pub fn is_locked(&self) -> bool {
        self.core.is_locked()
    }

    pub fn status(&self) -> LockStatus {
        self.core.status()
    }

    pub fn options(&self) -> &LockOptions {
        self.core.options()
    }

    pub fn handle(&self) -> LockHandle {
        self.core.handle()
    }

    pub fn name(&self) -> &str {
        self.core.name()
    }
}

#[cfg(test)]
#[path = "tests/guard_tests.rs"]
mod tests;
