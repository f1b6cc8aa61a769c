//! Dispatch handle and transport errors

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread::{self, ThreadId};

use thiserror::Error;
use txbridge_core::{panics, HostCell};

use crate::worker::{self, Job, Message};

/// Transport-level failure of a cross-thread hand-off.
///
/// These describe the dispatch mechanism itself, never the work it carried;
/// a job's own result travels back through the reply channel untouched.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The worker thread is not running (never started, shut down, or the
    /// handle outlived it).
    #[error("worker thread is not running")]
    WorkerGone,

    /// The worker stopped before the job produced a result.
    #[error("worker stopped before the job completed")]
    Disconnected,

    /// The job panicked on the worker thread. The payload is recovered so
    /// the caller sees the underlying cause rather than an opaque
    /// transport error.
    #[error("job panicked on the worker thread: {0}")]
    JobPanicked(String),
}

/// Counters distinguishing queued hand-offs from reentrant inline runs.
#[derive(Debug, Default)]
pub struct DispatchStats {
    remote: AtomicU64,
    inline: AtomicU64,
}

impl DispatchStats {
    /// Number of dispatches posted to the worker queue.
    pub fn remote(&self) -> u64 {
        self.remote.load(Ordering::Relaxed)
    }

    /// Number of dispatches executed inline on the worker thread.
    pub fn inline(&self) -> u64 {
        self.inline.load(Ordering::Relaxed)
    }
}

/// Handle to an [`AffinityWorker`](crate::AffinityWorker).
///
/// Cloneable and usable from any thread. All clones observe the same worker
/// and the same [`DispatchStats`].
pub struct WorkerHandle<H: 'static> {
    pub(crate) sender: Sender<Message<H>>,
    pub(crate) worker_thread: ThreadId,
    pub(crate) alive: Arc<AtomicBool>,
    pub(crate) stats: Arc<DispatchStats>,
}

impl<H: 'static> Clone for WorkerHandle<H> {
    fn clone(&self) -> Self {
        WorkerHandle {
            sender: self.sender.clone(),
            worker_thread: self.worker_thread,
            alive: Arc::clone(&self.alive),
            stats: Arc::clone(&self.stats),
        }
    }
}

impl<H: 'static> WorkerHandle<H> {
    /// Whether the calling thread is this worker's thread.
    pub fn is_worker_thread(&self) -> bool {
        thread::current().id() == self.worker_thread
    }

    /// Whether the worker is still running.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Dispatch counters for this worker.
    pub fn stats(&self) -> &DispatchStats {
        &self.stats
    }

    /// Run `f` against the worker's host and return its result.
    ///
    /// From any thread other than the worker's, `f` is posted to the queue
    /// and the caller blocks until the worker replies: a synchronous
    /// hand-off, not fire-and-forget. From the worker thread itself, `f`
    /// runs inline — a blocking round-trip to one's own queue would never
    /// drain and deadlock.
    pub fn dispatch<T, F>(&self, f: F) -> Result<T, DispatchError>
    where
        T: Send + 'static,
        F: FnOnce(&HostCell<H>) -> T + Send + 'static,
    {
        if self.is_worker_thread() {
            let cell = worker::current_host::<H>().ok_or(DispatchError::WorkerGone)?;
            self.stats.inline.fetch_add(1, Ordering::Relaxed);
            return Ok(f(&cell));
        }

        if !self.is_alive() {
            return Err(DispatchError::WorkerGone);
        }

        let (reply_tx, reply_rx) = mpsc::sync_channel::<Result<T, String>>(1);
        let job: Job<H> = Box::new(move |cell| {
            let outcome = catch_unwind(AssertUnwindSafe(|| f(cell)));
            let _ = reply_tx.send(outcome.map_err(|payload| panics::message(payload.as_ref())));
        });

        self.sender
            .send(Message::Run(job))
            .map_err(|_| DispatchError::WorkerGone)?;
        self.stats.remote.fetch_add(1, Ordering::Relaxed);

        match reply_rx.recv() {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(panic_message)) => Err(DispatchError::JobPanicked(panic_message)),
            Err(_) => Err(DispatchError::Disconnected),
        }
    }
}
