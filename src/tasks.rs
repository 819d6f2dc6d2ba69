//! A single-slot task handle: scheduling new work aborts whatever was pending.
//!
//! Each trigger waits for the debounce delay before running. A later trigger
//! arriving during that wait, or while the previous job is still running,
//! aborts it, so a burst of triggers collapses into one run of the newest job.

use std::{
    future::Future,
    sync::{Arc, Mutex},
    time::Duration,
};

use tokio::task::AbortHandle;

#[derive(Clone)]
pub struct SupersedingTask {
    name: &'static str,
    delay: Duration,
    slot: Arc<Mutex<Option<AbortHandle>>>,
}

impl SupersedingTask {
    pub fn new(name: &'static str, delay: Duration) -> Self {
        Self {
            name,
            delay,
            slot: Arc::new(Mutex::new(None)),
        }
    }

    /// Schedule `job` after the debounce delay, cancelling the pending one.
    pub fn trigger<F, Fut>(&self, job: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let name = self.name;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tracing::debug!(task = name, "running debounced task");
            job().await;
        });

        let mut slot = self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(previous) = slot.replace(handle.abort_handle()) {
            if !previous.is_finished() {
                tracing::trace!(task = name, "superseding pending task");
            }
            previous.abort();
        }
    }

    /// Abort the pending task, if any.
    pub fn cancel(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(previous) = slot.take() {
            previous.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        let slot = self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        slot.as_ref().is_some_and(|handle| !handle.is_finished())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn burst_of_triggers_runs_once() {
        let task = SupersedingTask::new("test", Duration::from_millis(100));
        let runs = Arc::new(AtomicUsize::new(0));

        for _ in 0..5 {
            let runs = runs.clone();
            task.trigger(move || async move {
                runs.fetch_add(1, Ordering::SeqCst);
            });
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert!(!task.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn newest_job_wins() {
        let task = SupersedingTask::new("test", Duration::from_millis(50));
        let seen = Arc::new(Mutex::new(Vec::new()));

        for value in [1, 2, 3] {
            let seen = seen.clone();
            task.trigger(move || async move {
                seen.lock().unwrap().push(value);
            });
        }

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(*seen.lock().unwrap(), vec![3]);
    }

    #[tokio::test(start_paused = true)]
    async fn spaced_triggers_each_run() {
        let task = SupersedingTask::new("test", Duration::from_millis(20));
        let runs = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let runs = runs.clone();
            task.trigger(move || async move {
                runs.fetch_add(1, Ordering::SeqCst);
            });
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        assert_eq!(runs.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_pending_job() {
        let task = SupersedingTask::new("test", Duration::from_millis(50));
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        task.trigger(move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        task.cancel();

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }
}
