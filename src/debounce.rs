use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Quiet period the search field waits for before sending a request.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Runs a job once its input has been quiet for `delay`.
///
/// Scheduling a new job cancels the pending one. Once the delay has elapsed
/// the job is detached, so a later `schedule` or `cancel` no longer affects a
/// request that is already in flight.
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn schedule<F>(&mut self, job: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(job);
        }));
    }

    /// Drops the pending job, if it has not started yet.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
