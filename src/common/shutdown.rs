use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tokio::sync::Notify;

/// One-shot shutdown signal shared between the channel and its listen loop.
#[derive(Clone, Default)]
pub struct Shutdown {
    inner: Arc<ShutdownInner>,
}

#[derive(Default)]
struct ShutdownInner {
    notify: Notify,
    flag: AtomicBool,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal shutdown and wake all waiters.
    pub fn shutdown(&self) {
        self.inner.flag.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn is_shutdown(&self) -> bool {
        self.inner.flag.load(Ordering::SeqCst)
    }

    /// Wait until shutdown is signalled. Resolves immediately if it already was.
    pub fn wait(&self) -> impl Future<Output = ()> + Send + 'static {
        let inner = self.inner.clone();
        async move {
            let notified = inner.notify.notified();
            tokio::pin!(notified);
            // register interest before checking the flag, so a signal landing
            // in between is not lost
            notified.as_mut().enable();
            if inner.flag.load(Ordering::SeqCst) {
                return;
            }
            notified.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_wait_after_shutdown_resolves() {
        let shutdown = Shutdown::new();
        shutdown.shutdown();

        shutdown.wait().await;
        assert!(shutdown.is_shutdown());
    }

    #[tokio::test]
    async fn test_wait_wakes_on_signal() {
        let shutdown = Shutdown::new();
        let waiter = tokio::spawn(shutdown.wait());

        shutdown.shutdown();
        waiter.await.unwrap();
    }
}
