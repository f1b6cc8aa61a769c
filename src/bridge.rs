//! Bridge facade: worker lifecycle and the execute entry point.
//!
//! A [`Bridge`] owns the designated worker thread for one host resource.
//! [`ResourceHandle`]s are cheap clones that any thread can call
//! [`ResourceHandle::execute`] on; the call blocks for the full
//! dispatch + begin + operation + end sequence and resumes with the final
//! outcome.

use parking_lot::Mutex;

use txbridge_core::{HostCell, TxHost};
use txbridge_dispatch::{AffinityWorker, DispatchStats, SpawnError, WorkerHandle};
use txbridge_engine::{boundary, BoxError};

use crate::error::{Error, Result};

/// Builder for a [`Bridge`].
///
/// # Example
///
/// ```ignore
/// let bridge = Bridge::builder()
///     .thread_name("symbol-db")
///     .spawn_with(|| SymbolDb::open())?;
/// ```
pub struct BridgeBuilder {
    thread_name: String,
}

impl Default for BridgeBuilder {
    fn default() -> Self {
        BridgeBuilder {
            thread_name: "txbridge-worker".to_string(),
        }
    }
}

impl BridgeBuilder {
    /// Name the worker thread (visible in panics and debuggers).
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Spawn the worker and construct the host on it.
    ///
    /// The host is built by `init` on the worker thread, so `H` never
    /// crosses a thread boundary and need not be `Send`.
    pub fn spawn_with<H, F>(self, init: F) -> std::result::Result<Bridge<H>, SpawnError>
    where
        H: TxHost + 'static,
        F: FnOnce() -> H + Send + 'static,
    {
        let worker = AffinityWorker::spawn_named(self.thread_name, init)?;
        let handle = ResourceHandle {
            inner: worker.handle(),
        };
        Ok(Bridge {
            worker: Mutex::new(Some(worker)),
            handle,
        })
    }
}

/// Owner of the designated worker thread for one host resource.
pub struct Bridge<H: TxHost + 'static> {
    worker: Mutex<Option<AffinityWorker<H>>>,
    handle: ResourceHandle<H>,
}

impl<H: TxHost + 'static> Bridge<H> {
    /// Spawn a bridge with default settings.
    pub fn spawn_with<F>(init: F) -> std::result::Result<Self, SpawnError>
    where
        F: FnOnce() -> H + Send + 'static,
    {
        Self::builder().spawn_with(init)
    }

    /// Start building a bridge.
    pub fn builder() -> BridgeBuilder {
        BridgeBuilder::default()
    }

    /// A cloneable handle to this bridge's resource.
    pub fn handle(&self) -> ResourceHandle<H> {
        self.handle.clone()
    }

    /// Execute `operation` inside a transaction. See
    /// [`ResourceHandle::execute`].
    pub fn execute<T, F, E>(&self, transaction_name: &str, operation: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&HostCell<H>) -> std::result::Result<T, E> + Send + 'static,
        E: Into<BoxError>,
    {
        self.handle.execute(transaction_name, operation)
    }

    /// Shut the worker down and wait for queued work to finish.
    ///
    /// Outstanding handles detach: later calls on them fail fast with an
    /// [`Error::ResourceDetached`]. Closing an already-closed bridge is a
    /// no-op.
    pub fn close(&self) {
        // The lock must be released before joining: a close issued from the
        // worker thread itself has to be able to take it.
        let worker = self.worker.lock().take();
        if let Some(worker) = worker {
            worker.close();
        }
    }
}

impl<H: TxHost + 'static> Drop for Bridge<H> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Cloneable, thread-safe handle to a bridge's host resource.
pub struct ResourceHandle<H: 'static> {
    inner: WorkerHandle<H>,
}

impl<H: 'static> Clone for ResourceHandle<H> {
    fn clone(&self) -> Self {
        ResourceHandle {
            inner: self.inner.clone(),
        }
    }
}

impl<H: 'static> ResourceHandle<H> {
    /// Whether this handle still points at a live worker.
    pub fn is_attached(&self) -> bool {
        self.inner.is_alive()
    }

    /// Whether the calling thread is the designated worker thread.
    pub fn is_worker_thread(&self) -> bool {
        self.inner.is_worker_thread()
    }

    /// Counters of queued vs. inline dispatches for this worker.
    pub fn stats(&self) -> &DispatchStats {
        self.inner.stats()
    }
}

impl<H: TxHost + 'static> ResourceHandle<H> {
    /// Execute `operation` inside a transaction named `transaction_name`.
    ///
    /// Callable from any thread; the call blocks until the operation has
    /// run on the worker thread bracketed by the host's begin/end calls,
    /// and returns the operation's value or the first root-cause failure.
    /// When called from the worker thread itself the operation runs
    /// inline — no hand-off, no self-deadlock.
    ///
    /// `transaction_name` is an opaque diagnostic label passed to the
    /// host's begin call unchanged.
    pub fn execute<T, F, E>(&self, transaction_name: &str, operation: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&HostCell<H>) -> std::result::Result<T, E> + Send + 'static,
        E: Into<BoxError>,
    {
        if !self.is_attached() {
            return Err(Error::ResourceDetached);
        }

        let name = transaction_name.to_string();
        let outcome = self
            .inner
            .dispatch(move |cell| boundary::run(cell, &name, operation))?;

        outcome.result.map_err(Error::from)
    }
}
