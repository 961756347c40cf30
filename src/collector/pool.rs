//! Bounded worker pool
//!
//! A semaphore caps how many tasks run at once; tasks are spawned onto a
//! `JoinSet` only after a permit is free, so at most `size` tasks exist at any
//! moment. Results come back in completion order, not submission order.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// A fixed-size pool of concurrent tasks
#[derive(Debug, Clone)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    size: usize,
}

impl WorkerPool {
    /// Creates a pool running at most `size` tasks at once (minimum 1)
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            permits: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Runs `task` once per input and collects the outputs as they complete
    ///
    /// A task that panics is logged and contributes no output; callers that
    /// need one output per input must account for that themselves.
    pub async fn run<I, F, Fut, R>(&self, inputs: I, task: F) -> Vec<R>
    where
        I: IntoIterator,
        F: Fn(I::Item) -> Fut,
        Fut: Future<Output = R> + Send + 'static,
        R: Send + 'static,
    {
        let mut set = JoinSet::new();
        let mut results = Vec::new();

        for input in inputs {
            // The semaphore is never closed, so this only waits
            let permit = self.permits.clone().acquire_owned().await.ok();
            let work = task(input);
            set.spawn(async move {
                let _permit = permit;
                work.await
            });
        }

        while let Some(joined) = set.join_next().await {
            collect(joined, &mut results);
        }

        results
    }
}

fn collect<R>(joined: Result<R, tokio::task::JoinError>, results: &mut Vec<R>) {
    match joined {
        Ok(result) => results.push(result),
        Err(e) => tracing::error!("Worker task aborted: {}", e),
    }
}
