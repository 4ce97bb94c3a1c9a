//! Call scopes: explicit cancellation and deadlines for KMS calls.
//!
//! A [`CallScope`] is handed to a client when it is built and cloned into
//! every adapter the client creates. Each remote call checks the scope
//! before it starts and races the in-flight request against it.
//!
//! Scopes form a tree. Cancelling a scope cancels all of its children, and
//! a child's deadline is never later than its parent's.

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::error::{KmsError, Result};

/// Cancellation and deadline token for remote calls.
///
/// Cloning is cheap and clones share state: cancelling one clone cancels
/// them all.
#[derive(Clone)]
pub struct CallScope {
    inner: Arc<Inner>,
}

struct Inner {
    cancelled: AtomicBool,
    notify: Notify,
    deadline: Option<Instant>,
    children: Mutex<Vec<Weak<Inner>>>,
}

impl Inner {
    fn new(deadline: Option<Instant>) -> Self {
        Self {
            cancelled: AtomicBool::new(false),
            notify: Notify::new(),
            deadline,
            children: Mutex::new(Vec::new()),
        }
    }

    fn cancel(&self) {
        if self.cancelled.swap(true, Ordering::AcqRel) {
            return;
        }
        self.notify.notify_waiters();

        let children = std::mem::take(&mut *self.children.lock());
        for child in children.iter().filter_map(Weak::upgrade) {
            child.cancel();
        }
    }
}

impl CallScope {
    /// A scope that is never cancelled and has no deadline on its own.
    pub fn background() -> Self {
        Self {
            inner: Arc::new(Inner::new(None)),
        }
    }

    /// Child scope, cancelled together with `self`.
    pub fn child(&self) -> Self {
        self.derive(None)
    }

    /// Child scope that expires `timeout` from now.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.derive(Some(Instant::now() + timeout))
    }

    /// Child scope that expires at `deadline`.
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        self.derive(Some(deadline))
    }

    fn derive(&self, deadline: Option<Instant>) -> Self {
        let deadline = match (self.inner.deadline, deadline) {
            (Some(parent), Some(own)) => Some(parent.min(own)),
            (parent, own) => parent.or(own),
        };
        let child = Arc::new(Inner::new(deadline));

        let mut children = self.inner.children.lock();
        if self.inner.cancelled.load(Ordering::Acquire) {
            child.cancelled.store(true, Ordering::Release);
        } else {
            children.retain(|c| c.strong_count() > 0);
            children.push(Arc::downgrade(&child));
        }
        drop(children);

        Self { inner: child }
    }

    /// Cancel this scope and every scope derived from it.
    ///
    /// In-flight calls fail with [`KmsError::Cancelled`]; so does every
    /// call made afterwards.
    pub fn cancel(&self) {
        self.inner.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// The effective deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.inner.deadline
    }

    /// Time left before the deadline. `None` when there is no deadline.
    pub fn remaining(&self) -> Option<Duration> {
        self.inner
            .deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Fail if the scope is already cancelled or past its deadline.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(KmsError::Cancelled.into());
        }
        if matches!(self.inner.deadline, Some(d) if Instant::now() >= d) {
            return Err(KmsError::DeadlineExceeded.into());
        }
        Ok(())
    }

    /// Resolves once the scope is cancelled or its deadline passes, with
    /// the matching error.
    pub async fn done(&self) -> KmsError {
        match self.inner.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = self.cancelled() => KmsError::Cancelled,
                    _ = tokio::time::sleep_until(deadline.into()) => KmsError::DeadlineExceeded,
                }
            }
            None => {
                self.cancelled().await;
                KmsError::Cancelled
            }
        }
    }

    async fn cancelled(&self) {
        loop {
            // Register before checking the flag so a concurrent cancel
            // cannot slip between the two.
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }

    /// Drive `fut` to completion unless the scope ends first.
    pub async fn run<F, T>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = T>,
    {
        self.check()?;
        tokio::select! {
            biased;
            err = self.done() => Err(err.into()),
            out = fut => Ok(out),
        }
    }
}

impl Default for CallScope {
    fn default() -> Self {
        Self::background()
    }
}

impl fmt::Debug for CallScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallScope")
            .field("cancelled", &self.is_cancelled())
            .field("deadline", &self.inner.deadline)
            .finish()
    }
}
