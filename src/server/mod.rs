//! Host server module
//!
//! Accepts HTTP/1.1 connections and runs every request through the worker
//! with a fresh execution context.

pub mod connection;
pub mod dispatch;
pub mod listener;
pub mod signal;

use std::future::Future;
use std::sync::atomic::AtomicUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinSet;

use crate::config::Config;
use crate::logger;
use crate::worker::Env;

pub use listener::create_reusable_listener;
pub use signal::shutdown_signal;

/// State shared by every connection
pub struct AppState {
    pub config: Config,
    pub env: Env,
    pub active_connections: AtomicUsize,
    /// Connection tasks and post-response background work
    tasks: Mutex<JoinSet<()>>,
    shutdown: watch::Sender<bool>,
}

impl AppState {
    pub fn new(config: Config, env: Env) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            config,
            env,
            active_connections: AtomicUsize::new(0),
            tasks: Mutex::new(JoinSet::new()),
            shutdown,
        }
    }

    fn tasks(&self) -> MutexGuard<'_, JoinSet<()>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Spawn a task that shutdown waits for
    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut tasks = self.tasks();
        // Reap finished tasks so the set only holds live ones
        while let Some(result) = tasks.try_join_next() {
            log_task_failure(result);
        }
        tasks.spawn(task);
    }

    /// Number of tracked tasks still running
    pub fn running_tasks(&self) -> usize {
        self.tasks().len()
    }

    /// Resolves once shutdown has started
    pub async fn shutting_down(&self) {
        let mut rx = self.shutdown.subscribe();
        let _ = rx.wait_for(|stopping| *stopping).await;
    }

    /// Ask every connection to finish and wait up to `grace` for tracked
    /// tasks, aborting whatever is left
    ///
    /// Tasks spawned while draining are waited for too.
    pub async fn drain(&self, grace: Duration) {
        self.shutdown.send_replace(true);
        let deadline = tokio::time::Instant::now() + grace;

        loop {
            let mut batch = std::mem::take(&mut *self.tasks());
            if batch.is_empty() {
                return;
            }

            let finished = tokio::time::timeout_at(deadline, async {
                while let Some(result) = batch.join_next().await {
                    log_task_failure(result);
                }
            })
            .await;

            if finished.is_err() {
                let left = batch.len() + self.running_tasks();
                logger::log_warning(&format!(
                    "[Shutdown] Grace period of {}s elapsed, aborting {left} task(s)",
                    grace.as_secs()
                ));
                batch.abort_all();
                self.tasks().abort_all();
                return;
            }
        }
    }
}

fn log_task_failure(result: Result<(), tokio::task::JoinError>) {
    if let Err(e) = result {
        if e.is_panic() {
            logger::log_error(&format!("Server task failed: {e}"));
        }
    }
}

/// Accept connections until `shutdown` resolves, then drain
///
/// Returns once every in-flight connection and its background work has
/// finished, or `performance.shutdown_timeout` has elapsed.
pub async fn run<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F)
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        connection::accept_connection(stream, peer_addr, &state);
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }
            () = &mut shutdown => {
                logger::log_shutdown("Shutdown requested");
                break;
            }
        }
    }

    drop(listener);
    state
        .drain(Duration::from_secs(state.config.performance.shutdown_timeout))
        .await;
    logger::log_info("[Shutdown] All connections closed");
}
