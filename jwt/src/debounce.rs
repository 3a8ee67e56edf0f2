use std::time::Duration;

use tokio::{runtime::Handle, task::JoinHandle};

/// Single slot for the latest scheduled job of one reactive surface
///
/// Scheduling aborts the job still waiting, so rapid requests coalesce into one run of the last
/// of them, `delay` after it was made. A job which already started always completes.
#[derive(Debug)]
pub struct Debouncer {
    handle: Handle,
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    /// Debouncer spawning its jobs on `handle`
    pub fn new(handle: Handle, delay: Duration) -> Self {
        Self {
            handle,
            delay,
            pending: None,
        }
    }

    /// Replaces the pending job, if any, with `job`
    pub fn schedule<F>(&mut self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            job();
        }));
    }

    /// Drops the pending job without running it
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }

    /// Whether a job is waiting or running
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|p| !p.is_finished())
    }

    /// Quiet period before a job runs
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
