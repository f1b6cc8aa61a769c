//! Worker thread ownership of the host
//!
//! The worker loop constructs the host, registers it in a thread-local so
//! reentrant dispatches can find it, and drains the job queue until a
//! shutdown message arrives or every sender is gone.

use std::any::Any;
use std::cell::RefCell;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};

use thiserror::Error;
use txbridge_core::{panics, HostCell};

use crate::handle::{DispatchStats, WorkerHandle};

/// A unit of work posted to the worker. Runs against the worker's host cell.
pub(crate) type Job<H> = Box<dyn FnOnce(&HostCell<H>) + Send>;

pub(crate) enum Message<H> {
    Run(Job<H>),
    Shutdown,
}

thread_local! {
    /// Host cell of the worker currently running on this thread, if any.
    /// Type-erased so one slot serves every host type.
    static ACTIVE_HOST: RefCell<Option<Rc<dyn Any>>> = const { RefCell::new(None) };
}

/// Host cell registered on the current thread, if this thread is a worker
/// for host type `H`.
pub(crate) fn current_host<H: 'static>() -> Option<HostCell<H>> {
    ACTIVE_HOST.with(|slot| {
        slot.borrow()
            .as_ref()
            .and_then(|any| Rc::clone(any).downcast::<HostCell<H>>().ok())
            .map(|cell| (*cell).clone())
    })
}

/// Failure to bring up a worker thread.
#[derive(Debug, Error)]
pub enum SpawnError {
    /// The OS refused to spawn the thread.
    #[error("failed to spawn worker thread: {0}")]
    Thread(#[from] std::io::Error),

    /// The host initializer panicked on the worker thread.
    #[error("worker initialization panicked: {0}")]
    InitPanicked(String),
}

/// A dedicated worker thread that owns a host resource of type `H`.
///
/// The host is constructed on the worker by the closure given to
/// [`AffinityWorker::spawn_with`], so `H` itself never crosses a thread
/// boundary and need not be `Send`.
pub struct AffinityWorker<H: 'static> {
    handle: WorkerHandle<H>,
    join: Option<JoinHandle<()>>,
}

// Manual impl: `H` never needs to be `Debug` because no field holds an `H`.
impl<H: 'static> std::fmt::Debug for AffinityWorker<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AffinityWorker").finish_non_exhaustive()
    }
}

impl<H: 'static> AffinityWorker<H> {
    /// Spawn a worker with the default thread name.
    pub fn spawn_with<F>(init: F) -> Result<Self, SpawnError>
    where
        F: FnOnce() -> H + Send + 'static,
    {
        Self::spawn_named("txbridge-worker", init)
    }

    /// Spawn a worker with an explicit thread name.
    pub fn spawn_named<F>(name: impl Into<String>, init: F) -> Result<Self, SpawnError>
    where
        F: FnOnce() -> H + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<Message<H>>();
        let (ready_tx, ready_rx) = mpsc::sync_channel::<Result<ThreadId, String>>(1);
        let alive = Arc::new(AtomicBool::new(true));
        let alive_for_worker = Arc::clone(&alive);

        let join = thread::Builder::new()
            .name(name.into())
            .spawn(move || worker_loop(rx, init, ready_tx, alive_for_worker))?;

        let worker_thread = match ready_rx.recv() {
            Ok(Ok(id)) => id,
            Ok(Err(message)) => return Err(SpawnError::InitPanicked(message)),
            Err(_) => {
                return Err(SpawnError::InitPanicked(
                    "worker exited before reporting readiness".to_string(),
                ))
            }
        };

        Ok(AffinityWorker {
            handle: WorkerHandle {
                sender: tx,
                worker_thread,
                alive,
                stats: Arc::new(DispatchStats::default()),
            },
            join: Some(join),
        })
    }

    /// A cloneable handle for dispatching work to this worker.
    pub fn handle(&self) -> WorkerHandle<H> {
        self.handle.clone()
    }

    /// Stop the worker and wait for it to finish its queued jobs.
    ///
    /// Blocks until the worker thread exits, unless called from the worker
    /// itself, in which case the shutdown is requested without joining.
    pub fn close(mut self) {
        let _ = self.handle.sender.send(Message::Shutdown);
        if let Some(join) = self.join.take() {
            if self.handle.is_worker_thread() {
                return;
            }
            if join.join().is_err() {
                tracing::error!("affinity worker thread panicked during shutdown");
            }
        }
        self.handle.alive.store(false, Ordering::Release);
    }
}

impl<H: 'static> Drop for AffinityWorker<H> {
    fn drop(&mut self) {
        // Best-effort shutdown when dropped without close(); no join, so a
        // drop on any thread cannot deadlock.
        if self.join.is_some() {
            let _ = self.handle.sender.send(Message::Shutdown);
        }
    }
}

/// Clears the thread-local registration and the liveness flag even if the
/// loop unwinds.
struct WorkerGuard {
    alive: Arc<AtomicBool>,
}

impl Drop for WorkerGuard {
    fn drop(&mut self) {
        ACTIVE_HOST.with(|slot| *slot.borrow_mut() = None);
        self.alive.store(false, Ordering::Release);
    }
}

fn worker_loop<H: 'static, F>(
    rx: Receiver<Message<H>>,
    init: F,
    ready: SyncSender<Result<ThreadId, String>>,
    alive: Arc<AtomicBool>,
) where
    F: FnOnce() -> H,
{
    let cell = match catch_unwind(AssertUnwindSafe(init)) {
        Ok(host) => HostCell::new(host),
        Err(payload) => {
            let _ = ready.send(Err(panics::message(payload.as_ref())));
            alive.store(false, Ordering::Release);
            return;
        }
    };

    let _guard = WorkerGuard { alive };
    ACTIVE_HOST.with(|slot| *slot.borrow_mut() = Some(Rc::new(cell.clone()) as Rc<dyn Any>));
    let _ = ready.send(Ok(thread::current().id()));
    tracing::debug!(
        thread = thread::current().name().unwrap_or("<unnamed>"),
        "affinity worker started"
    );

    while let Ok(message) = rx.recv() {
        match message {
            Message::Run(job) => job(&cell),
            Message::Shutdown => break,
        }
    }

    tracing::debug!("affinity worker stopped");
}
