//! Thread-affinity dispatch for single-owner host resources
//!
//! This crate implements the designated-thread model: one worker thread
//! owns the host resource outright, and every other thread reaches it
//! through a synchronous message-passing hand-off.
//!
//! - [`AffinityWorker`]: spawns the worker and constructs the host on it,
//!   so the host type never needs to be `Send`
//! - [`WorkerHandle`]: cloneable, thread-safe handle; [`WorkerHandle::dispatch`]
//!   runs a closure against the host and blocks until it completes
//! - Reentrancy: a dispatch issued from the worker thread itself runs
//!   inline instead of round-tripping through the queue, which would
//!   deadlock a single-threaded executor
//!
//! The worker's single-threaded nature is the sole serialization mechanism;
//! no lock guards the host. There is no cancellation or timeout support:
//! once dispatched, a job runs to completion or reports a failure.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod handle;
mod worker;

pub use handle::{DispatchError, DispatchStats, WorkerHandle};
pub use worker::{AffinityWorker, SpawnError};
