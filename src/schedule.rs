//! Delayed work for the presentation layer.
//!
//! A [`ScheduledTask`] runs a future after a fixed delay on the tokio runtime
//! and can be cancelled at any point before it finishes.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::trace;

pub struct ScheduledTask<T> {
    label: &'static str,
    handle: JoinHandle<T>,
}

impl<T: Send + 'static> ScheduledTask<T> {
    /// Spawns `work` to start once `delay` has elapsed.
    pub fn after<F>(label: &'static str, delay: Duration, work: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        trace!(label, ?delay, "scheduled");
        let handle = tokio::spawn(async move {
            if !delay.is_zero() {
                sleep(delay).await;
            }
            work.await
        });
        Self { label, handle }
    }

    /// Stops the task if it has not completed yet.
    pub fn cancel(&self) {
        if !self.handle.is_finished() {
            trace!(label = self.label, "cancelled");
            self.handle.abort();
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the task; `None` when it was cancelled.
    ///
    /// Dropping the returned future leaves the task running and still
    /// cancellable. Do not wait again once this has returned.
    pub async fn join(&mut self) -> Option<T> {
        match (&mut self.handle).await {
            Ok(value) => Some(value),
            Err(e) if e.is_cancelled() => None,
            Err(e) => std::panic::resume_unwind(e.into_panic()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test(start_paused = true)]
    async fn runs_after_delay() {
        let mut task = ScheduledTask::after("answer", Duration::from_millis(1000), async { 42 });
        assert!(!task.is_finished());
        assert_eq!(task.join().await, Some(42));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_task_never_runs() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ran);
        let mut task = ScheduledTask::after("flag", Duration::from_millis(500), async move {
            flag.store(true, Ordering::SeqCst);
        });

        task.cancel();
        assert_eq!(task.join().await, None);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(!ran.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_after_an_abandoned_wait_stops_the_task() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ran);
        let mut task = ScheduledTask::after("slow", Duration::from_secs(1), async move {
            flag.store(true, Ordering::SeqCst);
        });

        let joined = tokio::select! {
            joined = task.join() => Some(joined),
            _ = tokio::time::sleep(Duration::from_millis(200)) => None,
        };
        assert!(joined.is_none());
        assert!(!task.is_finished());

        task.cancel();
        assert_eq!(task.join().await, None);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!ran.load(Ordering::SeqCst));
    }
}
