//! Cancelable request futures
//!
//! Every service call returns a [`CancelableRequest`]. Cancelling it before
//! it completes resolves the future with [`HelpdeskError::Cancelled`] and
//! drops the in-flight HTTP call; cancelling after completion does nothing.

use crate::error::{HelpdeskError, Result};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio_util::sync::CancellationToken;

type BoxedRequest<T> = Pin<Box<dyn Future<Output = Result<T>> + Send>>;

/// Cloneable handle that cancels its request from anywhere
#[derive(Debug, Clone)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// A pending API call that can be aborted
#[must_use = "requests do nothing unless awaited"]
pub struct CancelableRequest<T> {
    handle: CancelHandle,
    future: BoxedRequest<T>,
}

impl<T: Send + 'static> CancelableRequest<T> {
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        let token = CancellationToken::new();
        let guard = token.clone();
        let future = Box::pin(async move {
            tokio::select! {
                biased;
                () = guard.cancelled() => Err(HelpdeskError::Cancelled),
                result = future => result,
            }
        });

        Self {
            handle: CancelHandle { token },
            future,
        }
    }

    /// A request that fails immediately, used when the body cannot be encoded
    pub fn failed(error: HelpdeskError) -> Self {
        Self::new(async move { Err(error) })
    }
}

impl<T> CancelableRequest<T> {
    pub fn handle(&self) -> CancelHandle {
        self.handle.clone()
    }

    pub fn cancel(&self) {
        self.handle.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.handle.is_cancelled()
    }
}

impl<T> Future for CancelableRequest<T> {
    type Output = Result<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.get_mut().future.as_mut().poll(cx)
    }
}
