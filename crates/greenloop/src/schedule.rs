//! Cancellable timers for session-driven delays.
//!
//! Hosts drive the game clocks (quiz countdown ticks, the sorting feedback
//! pause, memory pair resolutions) through a [`TaskScheduler`]. Every task
//! races its timer against a shared cancellation token, so dropping the
//! scheduler tears down every outstanding timer and a late callback can
//! never fire against disposed session state.

use futures::future::BoxFuture;
use parking_lot::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Owns a set of scheduled timers that are cancelled together.
///
/// Once cancelled (explicitly or by drop) a scheduler is finished: tasks
/// scheduled afterwards never run.
#[derive(Debug, Default)]
pub struct TaskScheduler {
    cancel: CancellationToken,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl TaskScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `handler` once after `delay`, unless cancelled first.
    pub fn schedule_once(
        &self,
        name: impl Into<String>,
        delay: Duration,
        handler: impl FnOnce() -> BoxFuture<'static, ()> + Send + 'static,
    ) {
        let name = name.into();
        let token = self.cancel.child_token();
        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!(task = %name, "scheduled task cancelled before firing");
                }
                _ = tokio::time::sleep(delay) => {
                    handler().await;
                }
            }
        });
        self.handles.lock().push(handle);
    }

    /// Run `handler` every `period` until cancelled. The first run happens
    /// one full period after scheduling.
    pub fn schedule_repeating(
        &self,
        name: impl Into<String>,
        period: Duration,
        handler: impl Fn() -> BoxFuture<'static, ()> + Send + Sync + 'static,
    ) {
        let name = name.into();
        let token = self.cancel.child_token();
        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        debug!(task = %name, "repeating task cancelled");
                        break;
                    }
                    _ = tokio::time::sleep(period) => {
                        handler().await;
                    }
                }
            }
        });
        self.handles.lock().push(handle);
    }

    /// Cancel every outstanding task. The scheduler is finished afterwards.
    pub fn cancel_all(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Number of scheduled tasks that have not finished.
    pub fn active_count(&self) -> usize {
        self.handles.lock().iter().filter(|h| !h.is_finished()).count()
    }
}

impl Drop for TaskScheduler {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
