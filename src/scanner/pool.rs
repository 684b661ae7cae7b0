//! Fixed-size worker pool over a bounded task queue.
//!
//! `workers` tasks share one receiver. Each task loops: dequeue a unit, run
//! the retry policy, record the outcome. A task exits once the producer has
//! closed the queue and it is drained. The bounded queue is the only
//! suspension point between producer and workers, so a slow target stalls
//! only the worker holding it.

use crate::error::ScanError;
use crate::scanner::aggregator::Aggregator;
use crate::scanner::retry::RetryPolicy;
use crate::types::ScanUnit;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tracing::{debug, trace};

/// Default task queue capacity.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// A fixed set of concurrent scan workers.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    workers: usize,
    queue_capacity: usize,
    dial_timeout: Duration,
}

impl WorkerPool {
    /// Create a pool. Zero workers or capacity are raised to one.
    pub fn new(workers: usize, dial_timeout: Duration) -> Self {
        Self {
            workers: workers.max(1),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            dial_timeout,
        }
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    /// Feed every unit through the pool and wait for all workers to exit.
    pub async fn run<I>(
        &self,
        units: I,
        policy: Arc<RetryPolicy>,
        aggregator: Arc<Aggregator>,
    ) -> Result<(), ScanError>
    where
        I: IntoIterator<Item = ScanUnit>,
    {
        let (tx, rx) = mpsc::channel::<ScanUnit>(self.queue_capacity);
        let rx = Arc::new(Mutex::new(rx));

        let mut set = JoinSet::new();
        for id in 0..self.workers {
            set.spawn(worker(
                id,
                Arc::clone(&rx),
                Arc::clone(&policy),
                Arc::clone(&aggregator),
                self.dial_timeout,
            ));
        }
        debug!(workers = self.workers, capacity = self.queue_capacity, "worker pool started");

        for unit in units {
            // Fails only when every worker is gone; the join below reports why.
            if tx.send(unit).await.is_err() {
                break;
            }
        }
        drop(tx);

        while let Some(joined) = set.join_next().await {
            joined?;
        }
        debug!("worker pool drained");

        Ok(())
    }
}

async fn worker(
    id: usize,
    queue: Arc<Mutex<mpsc::Receiver<ScanUnit>>>,
    policy: Arc<RetryPolicy>,
    aggregator: Arc<Aggregator>,
    dial_timeout: Duration,
) {
    loop {
        let next = queue.lock().await.recv().await;
        let Some(unit) = next else {
            break;
        };

        trace!(worker = id, %unit, "picked up unit");
        let outcome = policy.attempt(&unit, dial_timeout).await;
        aggregator.record(outcome).await;
    }
    trace!(worker = id, "queue closed, worker exiting");
}
