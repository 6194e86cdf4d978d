//! Worker pool that delivers batches through a sink.
//!
//! Batches go into an unbounded queue shared by a fixed set of worker loops.
//! Submission never blocks; the cost is unbounded memory growth when the
//! producer outpaces delivery.
//!
//! The first failed delivery is recorded and cancels the pool: workers stop
//! taking new tasks, queued tasks are abandoned, and later `submit` calls
//! return `DispatchError::Halted`. Deliveries already running on other
//! workers are allowed to finish.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::batcher::Batch;
use crate::error_handling::DispatchError;
use crate::sink::Sink;

/// One batch payload waiting for delivery. Attempted exactly once.
#[derive(Debug)]
pub struct DispatchTask {
    pub sequence: usize,
    pub payload: String,
}

/// Task counters shared between the submitter and the workers.
#[derive(Debug, Default)]
pub struct DispatchStats {
    submitted: AtomicUsize,
    in_flight: AtomicUsize,
    completed: AtomicUsize,
    failed: AtomicUsize,
}

impl DispatchStats {
    pub fn submitted(&self) -> usize {
        self.submitted.load(Ordering::SeqCst)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }

    fn snapshot(&self) -> DispatchSummary {
        let submitted = self.submitted();
        let completed = self.completed();
        let failed = self.failed();
        DispatchSummary {
            submitted,
            completed,
            failed,
            abandoned: submitted.saturating_sub(completed + failed),
        }
    }
}

/// Final task counts once every worker has stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSummary {
    pub submitted: usize,
    pub completed: usize,
    pub failed: usize,
    /// Tasks still queued when the pool was cancelled
    pub abandoned: usize,
}

type FailureSlot = Arc<Mutex<Option<DispatchError>>>;

/// Fixed-size pool of delivery workers.
pub struct Dispatcher {
    tx: UnboundedSender<DispatchTask>,
    workers: Vec<JoinHandle<()>>,
    stats: Arc<DispatchStats>,
    cancel: CancellationToken,
    failure: FailureSlot,
}

impl Dispatcher {
    /// Spawns `workers` delivery loops on the current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn start(sink: Arc<dyn Sink>, workers: usize) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let rx = Arc::new(tokio::sync::Mutex::new(rx));
        let stats = Arc::new(DispatchStats::default());
        let cancel = CancellationToken::new();
        let failure: FailureSlot = Arc::new(Mutex::new(None));

        log::debug!("Starting {} {} delivery worker(s)", workers, sink.name());

        let workers = (0..workers)
            .map(|id| {
                tokio::spawn(worker_loop(
                    id,
                    Arc::clone(&rx),
                    Arc::clone(&sink),
                    Arc::clone(&stats),
                    cancel.clone(),
                    Arc::clone(&failure),
                ))
            })
            .collect();

        Self {
            tx,
            workers,
            stats,
            cancel,
            failure,
        }
    }

    /// Queues a batch for delivery and returns its sequence number.
    ///
    /// Never blocks. Callable from synchronous code, including a blocking
    /// producer thread.
    pub fn submit(&self, batch: Batch) -> Result<usize, DispatchError> {
        if self.cancel.is_cancelled() {
            return Err(DispatchError::Halted);
        }

        let sequence = batch.sequence;
        let task = DispatchTask {
            sequence,
            payload: batch.into_payload(),
        };

        // Counted before sending so `completed` can never exceed `submitted`
        self.stats.submitted.fetch_add(1, Ordering::SeqCst);
        if self.tx.send(task).is_err() {
            self.stats.submitted.fetch_sub(1, Ordering::SeqCst);
            return Err(DispatchError::Halted);
        }
        Ok(sequence)
    }

    pub fn stats(&self) -> Arc<DispatchStats> {
        Arc::clone(&self.stats)
    }

    /// Closes the queue and waits for every worker to stop.
    ///
    /// Without a failure, every submitted task has been delivered when this
    /// returns. After a failure, returns the first failed delivery.
    pub async fn drain_and_wait(self) -> Result<DispatchSummary, DispatchError> {
        let Dispatcher {
            tx,
            workers,
            stats,
            failure,
            ..
        } = self;
        drop(tx);

        let join_result = join_all(workers).await;

        if let Some(err) = take_failure(&failure) {
            return Err(err);
        }
        join_result?;
        Ok(stats.snapshot())
    }

    /// Cancels the pool, abandons queued tasks, and waits for running
    /// deliveries to finish.
    pub async fn abort(self) -> DispatchSummary {
        self.cancel.cancel();
        let Dispatcher { tx, workers, stats, .. } = self;
        drop(tx);

        if let Err(e) = join_all(workers).await {
            log::warn!("{}", e);
        }
        stats.snapshot()
    }
}

/// Awaits every handle, returning the first join error.
async fn join_all(workers: Vec<JoinHandle<()>>) -> Result<(), DispatchError> {
    futures::future::join_all(workers)
        .await
        .into_iter()
        .find_map(Result::err)
        .map_or(Ok(()), |e| Err(DispatchError::Worker(e)))
}

fn take_failure(failure: &FailureSlot) -> Option<DispatchError> {
    failure
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .take()
}

/// Keeps only the first failure.
fn record_failure(failure: &FailureSlot, err: DispatchError) {
    let mut slot = failure
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if slot.is_none() {
        *slot = Some(err);
    }
}

async fn worker_loop(
    id: usize,
    rx: Arc<tokio::sync::Mutex<UnboundedReceiver<DispatchTask>>>,
    sink: Arc<dyn Sink>,
    stats: Arc<DispatchStats>,
    cancel: CancellationToken,
    failure: FailureSlot,
) {
    loop {
        let task = {
            let mut rx = rx.lock().await;
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                task = rx.recv() => match task {
                    Some(task) => task,
                    None => break,
                },
            }
        };

        stats.in_flight.fetch_add(1, Ordering::SeqCst);
        let result = sink.deliver(&task.payload).await;
        stats.in_flight.fetch_sub(1, Ordering::SeqCst);

        match result {
            Ok(()) => {
                stats.completed.fetch_add(1, Ordering::SeqCst);
                log::debug!("Worker {} delivered batch {}", id, task.sequence);
            }
            Err(source) => {
                stats.failed.fetch_add(1, Ordering::SeqCst);
                log::debug!("Worker {} failed batch {}: {}", id, task.sequence, source);

                record_failure(
                    &failure,
                    DispatchError::Delivery {
                        sequence: task.sequence,
                        payload: task.payload,
                        source,
                    },
                );
                cancel.cancel();
                break;
            }
        }
    }
    log::debug!("Worker {} stopped", id);
}
