//! Request-scoped execution context
//!
//! Owns the background work a request registers through `wait_until`. The
//! host drains it after the response has been handed to the connection, so
//! background tasks never hold up the reply.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::JoinSet;

use crate::logger;

#[derive(Clone, Default)]
pub struct Context {
    tasks: Arc<Mutex<JoinSet<()>>>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `fut` running after the response is sent
    ///
    /// Must be called from within a Tokio runtime.
    pub fn wait_until<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .spawn(fut);
    }

    /// Number of registered tasks that have not been drained yet
    pub fn pending(&self) -> usize {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Wait for every registered task
    ///
    /// Tasks registered while draining are picked up too. A panicking task
    /// is logged and does not stop the others.
    pub async fn drain(&self) {
        loop {
            let mut batch = {
                let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
                std::mem::take(&mut *tasks)
            };
            if batch.is_empty() {
                return;
            }
            while let Some(result) = batch.join_next().await {
                if let Err(e) = result {
                    logger::log_error(&format!("Background task failed: {e}"));
                }
            }
        }
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("pending", &self.pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_drain_waits_for_tasks() {
        let ctx = Context::new();
        let done = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let done = Arc::clone(&done);
            ctx.wait_until(async move {
                tokio::time::sleep(std::time::Duration::from_millis(10)).await;
                done.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(ctx.pending(), 3);

        ctx.drain().await;
        assert_eq!(done.load(Ordering::SeqCst), 3);
        assert_eq!(ctx.pending(), 0);
    }

    #[tokio::test]
    async fn test_drain_survives_panic() {
        let ctx = Context::new();
        let done = Arc::new(AtomicUsize::new(0));

        ctx.wait_until(async { panic!("boom") });
        let counter = Arc::clone(&done);
        ctx.wait_until(async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        ctx.drain().await;
        assert_eq!(done.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_tasks_registered_while_draining() {
        let ctx = Context::new();
        let done = Arc::new(AtomicUsize::new(0));

        let inner_ctx = ctx.clone();
        let counter = Arc::clone(&done);
        ctx.wait_until(async move {
            inner_ctx.wait_until(async move {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        });

        ctx.drain().await;
        assert_eq!(done.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_drain_empty() {
        Context::new().drain().await;
    }
}
