//! Request-scoped release marker for network calls.
//!
//! A `LockContext` rides along with one request and names the guard to release
//! once the response arrives. Release happens on success, on failure and when
//! the request future is dropped before finishing.

use std::future::Future;

use reqwest::{Client, IntoUrl, Request, Response};

use crate::services::lock::triggers::{release_after, RESPONSE_RECEIVED};
use crate::services::lock::LockHandle;

/// Per-request marker. The default marker releases nothing.
#[derive(Debug, Clone, Default)]
pub struct LockContext {
    lock: Option<LockHandle>,
}

impl LockContext {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn for_guard(handle: LockHandle) -> Self {
        Self { lock: Some(handle) }
    }

    pub fn lock(&self) -> Option<&LockHandle> {
        self.lock.as_ref()
    }
}

/// Run `request` and release the marked guard when it finishes, whatever the outcome.
pub async fn intercept<F>(context: LockContext, request: F) -> F::Output
where
    F: Future,
{
    if let Some(handle) = context.lock() {
        log::trace!(
            target: crate::services::lock::core::LOG_TARGET,
            "Lock: request tagged for \"{}\"",
            handle.name()
        );
    }
    release_after(request, context.lock, RESPONSE_RECEIVED).await
}

/// `reqwest` client that honours `LockContext` markers.
#[derive(Debug, Clone, Default)]
pub struct LockedClient {
    client: Client,
}

impl LockedClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn inner(&self) -> &Client {
        &self.client
    }

    pub async fn execute(&self, request: Request, context: LockContext) -> reqwest::Result<Response> {
        intercept(context, self.client.execute(request)).await
    }

    pub async fn get<U: IntoUrl>(&self, url: U, context: LockContext) -> reqwest::Result<Response> {
        let request = self.client.get(url).build()?;
        self.execute(request, context).await
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
