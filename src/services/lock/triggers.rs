//! Release triggers.
//!
//! Each adapter watches one completion signal and releases a specific guard
//! through its `LockHandle`. Triggers are not exclusive: whichever fires first
//! releases, later ones hit an already-unlocked guard, which is harmless.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use futures_util::future::{BoxFuture, FutureExt, Shared};
use futures_util::stream::{BoxStream, Stream, StreamExt};
use tokio::runtime::Handle;
use tokio::task::AbortHandle;

use super::core::{LockCore, LockHandle, LOG_TARGET};

pub const MANUAL: &str = "manual";
pub const TIMEOUT_REACHED: &str = "timeout reached";
pub const FUTURE_SETTLED: &str = "future settled";
pub const STREAM_CHANGED: &str = "stream changed";
pub const STREAM_ERROR: &str = "stream error";
pub const STREAM_COMPLETE: &str = "stream complete";
pub const STREAM_DROPPED: &str = "stream dropped";
pub const RESPONSE_RECEIVED: &str = "response received";
pub const BULK_RELEASE: &str = "bulk release";

/// A future result that every holder can await.
pub type SharedFuture<T> = Shared<BoxFuture<'static, T>>;

fn release_quietly(handle: &LockHandle, reason: &str) {
    if let Err(e) = handle.release(reason) {
        log::debug!(target: LOG_TARGET, "Lock: {reason} after guard drop: {e}");
    }
}

// ─── Timer ───────────────────────────────────────────────────────────────────

/// Arm the auto-release timer for `cycle`.
///
/// Returns `None` (and logs) outside a tokio runtime; the guard then stays
/// locked until another trigger fires.
pub(crate) fn arm_timer(core: &Arc<LockCore>, cycle: u64, delay: Duration) -> Option<AbortHandle> {
    let runtime = match Handle::try_current() {
        Ok(runtime) => runtime,
        Err(_) => {
            log::warn!(
                target: LOG_TARGET,
                "Lock: no tokio runtime, auto-release disabled for \"{}\"",
                core.name()
            );
            return None;
        }
    };

    let core = Arc::downgrade(core);
    let task = runtime.spawn(async move {
        tokio::time::sleep(delay).await;
        if let Some(core) = core.upgrade() {
            core.release_cycle(cycle, TIMEOUT_REACHED);
        }
    });
    Some(task.abort_handle())
}

// ─── Future Settlement ───────────────────────────────────────────────────────

/// Share `future` and release `handle` once it settles.
///
/// With a runtime the future is driven eagerly by a spawned task, so the
/// guard unlocks even if the caller never awaits the result. Without one it
/// releases when first awaited to completion.
pub fn release_on_settle<T>(
    future: BoxFuture<'static, T>,
    handle: LockHandle,
) -> SharedFuture<T>
where
    T: Clone + Send + Sync + 'static,
{
    let shared = async move {
        let output = future.await;
        release_quietly(&handle, FUTURE_SETTLED);
        output
    }
    .boxed()
    .shared();

    match Handle::try_current() {
        Ok(runtime) => {
            runtime.spawn(shared.clone().map(drop));
        }
        Err(_) => {
            log::warn!(
                target: LOG_TARGET,
                "Lock: no tokio runtime, future release waits for the caller to await"
            );
        }
    }
    shared
}

// ─── Stream Activity ─────────────────────────────────────────────────────────

/// Stream returned by a guarded method.
///
/// When releasing, every item, every error and the end of the stream
/// release the guard, not only completion. The stream is lazy: dropping it
/// before any activity releases as well, so a discarded stream cannot keep
/// the guard locked.
pub struct GuardedStream<T> {
    inner: BoxStream<'static, anyhow::Result<T>>,
    release: Option<LockHandle>,
    active: bool,
    finished: bool,
}

impl<T> GuardedStream<T> {
    pub fn releasing(inner: BoxStream<'static, anyhow::Result<T>>, handle: LockHandle) -> Self {
        Self {
            inner,
            release: Some(handle),
            active: false,
            finished: false,
        }
    }

    pub fn passthrough(inner: BoxStream<'static, anyhow::Result<T>>) -> Self {
        Self {
            inner,
            release: None,
            active: false,
            finished: false,
        }
    }

    fn notify(&mut self, reason: &str) {
        self.active = true;
        if let Some(handle) = &self.release {
            release_quietly(handle, reason);
        }
    }
}

impl<T> Stream for GuardedStream<T> {
    type Item = anyhow::Result<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.finished {
            return Poll::Ready(None);
        }
        match this.inner.poll_next_unpin(cx) {
            Poll::Ready(Some(Ok(item))) => {
                this.notify(STREAM_CHANGED);
                Poll::Ready(Some(Ok(item)))
            }
            Poll::Ready(Some(Err(error))) => {
                this.notify(STREAM_ERROR);
                Poll::Ready(Some(Err(error)))
            }
            Poll::Ready(None) => {
                this.finished = true;
                this.notify(STREAM_COMPLETE);
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T> Drop for GuardedStream<T> {
    fn drop(&mut self) {
        // After activity the guard was already released; a later cycle is not ours
        if !self.active {
            if let Some(handle) = self.release.take() {
                release_quietly(&handle, STREAM_DROPPED);
            }
        }
    }
}

/// Release `handle` on any activity of `stream`, whatever method produced it.
pub fn release_on_activity<S, T>(stream: S, handle: LockHandle) -> GuardedStream<T>
where
    S: Stream<Item = anyhow::Result<T>> + Send + 'static,
{
    GuardedStream::releasing(stream.boxed(), handle)
}

// ─── Drop Guard ──────────────────────────────────────────────────────────────

/// RAII release: releases the guard when dropped, whatever ended the scope.
pub struct ReleaseOnDrop {
    handle: Option<LockHandle>,
    reason: &'static str,
}

impl ReleaseOnDrop {
    pub fn new(handle: Option<LockHandle>, reason: &'static str) -> Self {
        Self { handle, reason }
    }
}

impl Drop for ReleaseOnDrop {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            release_quietly(&handle, self.reason);
        }
    }
}

/// Await `future` and release `handle` afterwards, even on cancellation.
pub async fn release_after<F>(future: F, handle: Option<LockHandle>, reason: &'static str) -> F::Output
where
    F: Future,
{
    let _release = ReleaseOnDrop::new(handle, reason);
    future.await
}

#[cfg(test)]
#[path = "tests/triggers_tests.rs"]
mod tests;
