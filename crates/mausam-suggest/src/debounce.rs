use std::future::Future;
use std::time::Duration;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

/// Runs only the most recently scheduled task, once `delay` has passed
/// without another call to [`Debouncer::schedule`].
///
/// Cancellation only covers the waiting period. A task whose timer already
/// fired runs to completion. A timer that elapsed but was re-armed before its
/// task got polled counts as cancelled.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<CancellationToken>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Cancel any waiting task and arm the timer for `task`.
    pub fn schedule<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        let delay = self.delay;

        {
            let mut pending = self.pending.lock();
            if let Some(previous) = pending.replace(token.clone()) {
                previous.cancel();
            }
        }

        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    if !token.is_cancelled() {
                        task.await;
                    }
                }
            }
        });
    }

    /// Drop the waiting task, if any
    pub fn cancel(&self) {
        if let Some(token) = self.pending.lock().take() {
            token.cancel();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_only_last_task_runs() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let fired = Arc::new(Mutex::new(Vec::new()));

        for i in 0..5 {
            let fired = fired.clone();
            debouncer.schedule(async move { fired.lock().push(i) });
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(*fired.lock(), vec![4]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spaced_calls_all_run() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let count = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let count = count.clone();
            debouncer.schedule(async move {
                count.fetch_add(1, Ordering::SeqCst);
            });
            tokio::time::sleep(Duration::from_millis(400)).await;
        }

        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_before_fire() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let count = Arc::new(AtomicUsize::new(0));

        let c = count.clone();
        debouncer.schedule(async move {
            c.fetch_add(1, Ordering::SeqCst);
        });
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.cancel();
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_at_deadline_drops_elapsed_timer() {
        for _ in 0..64 {
            let debouncer = Debouncer::new(Duration::from_millis(300));
            let fired = Arc::new(Mutex::new(Vec::new()));

            let f = fired.clone();
            debouncer.schedule(async move { f.lock().push("first") });
            tokio::time::advance(Duration::from_millis(300)).await;
            let f = fired.clone();
            debouncer.schedule(async move { f.lock().push("second") });
            tokio::time::sleep(Duration::from_millis(400)).await;

            assert_eq!(*fired.lock(), vec!["second"]);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_does_not_abort_running_task() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let done = Arc::new(AtomicUsize::new(0));

        let d = done.clone();
        debouncer.schedule(async move {
            tokio::time::sleep(Duration::from_millis(1000)).await;
            d.fetch_add(1, Ordering::SeqCst);
        });
        // Timer fired; the task is now inside its own sleep
        tokio::time::sleep(Duration::from_millis(400)).await;
        debouncer.schedule(async {});
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(done.load(Ordering::SeqCst), 1);
    }
}
