//! Context provides a cancellation, similar to Golang's Context.

use std::{
    ops::Deref,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use tokio::sync::Notify;
use tokio::time;

#[derive(Clone, Debug)]
pub struct Context {
    inner: Arc<ContextInner>,
}

impl Context {
    /// Create a new Context.
    pub fn new() -> Self {
        Context {
            inner: Arc::new(ContextInner::new()),
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for Context {
    type Target = ContextInner;

    fn deref(&self) -> &Self::Target {
        self.inner.deref()
    }
}

#[derive(Debug)]
pub struct ContextInner {
    cancelled: AtomicBool,
    notify: Notify,
}

impl ContextInner {
    fn new() -> Self {
        ContextInner {
            cancelled: AtomicBool::new(false),
            notify: Notify::new(),
        }
    }

    /// Cancel the context. Safe to call from any thread, including a signal
    /// handler's.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    /// Returns true iff the context has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Wait until the context is cancelled.
    #[allow(unused)]
    pub async fn wait(&self) {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            // Register before the flag check so a cancel landing between
            // the two still wakes us.
            notified.as_mut().enable();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }

    /// Wait until the duration expires, or the context is cancelled.
    /// Returns true if the context has been cancelled.
    pub async fn wait_timeout(&self, duration: Duration) -> bool {
        let notified = self.notify.notified();
        tokio::pin!(notified);
        // Register before the flag check so a cancel landing between the
        // two still wakes us.
        notified.as_mut().enable();
        if self.is_cancelled() {
            return true;
        }
        tokio::select! {
            _ = notified => {}
            _ = time::sleep(duration) => {}
        }
        self.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn timeout_expires_without_cancel() {
        let ctx = Context::new();
        assert!(!ctx.wait_timeout(Duration::from_millis(10)).await);
        assert!(!ctx.is_cancelled());
    }

    #[tokio::test]
    async fn cancelled_context_returns_immediately() {
        let ctx = Context::new();
        ctx.cancel();
        let start = Instant::now();
        assert!(ctx.wait_timeout(Duration::from_secs(5)).await);
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn cancel_wakes_a_waiter() {
        let ctx = Context::new();
        let remote = ctx.clone();
        tokio::spawn(async move {
            time::sleep(Duration::from_millis(5)).await;
            remote.cancel();
        });
        let start = Instant::now();
        assert!(ctx.wait_timeout(Duration::from_secs(5)).await);
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
