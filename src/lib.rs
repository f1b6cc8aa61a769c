//! # txbridge
//!
//! Thread-affine transactional execution bridge for single-writer host
//! resources.
//!
//! A host resource (a symbol database, a document model) is shared but not
//! thread-safe: one designated thread owns all mutating access, and every
//! mutation must happen inside the host's begin/end transaction bracket.
//! txbridge takes a unit of work from any thread, marshals it onto the
//! designated thread, brackets it with a transaction, and hands back the
//! result or a single diagnosable failure.
//!
//! ## Quick Start
//!
//! ```ignore
//! use txbridge::prelude::*;
//!
//! // Spawn the worker; the host is constructed on it and never leaves it.
//! let bridge = Bridge::spawn_with(|| SymbolDb::open("./program"))?;
//! let resource = bridge.handle();
//!
//! // From any thread: blocks until the rename has run transactionally.
//! let renamed = execute(&resource, "rename-symbol", |host| {
//!     host.with(|db| db.rename_symbol("foo", "bar"))
//! })?;
//! assert_eq!(renamed, "bar");
//!
//! bridge.close();
//! ```
//!
//! ## Guarantees
//!
//! - Exactly one begin and one end call per executed operation, with
//!   `commit = true` only if the operation completed without failure —
//!   even if the operation panics.
//! - Callers always receive either the operation's value or exactly one
//!   normalized [`Error`] describing the first root cause; secondary
//!   failures (an end call failing after the outcome is already decided)
//!   are logged, never returned.
//! - Calls from the worker thread itself run inline instead of
//!   deadlocking on a round-trip to their own queue.
//!
//! ## Host version tolerance
//!
//! The shape of the host's end-transaction call varies across versions.
//! [`TxHost`] exposes every known signature with capability-miss defaults,
//! and the engine probes them in a fixed order at call time — see
//! [`EndVariant`] for the resolved descriptor.

#![warn(missing_docs)]

mod bridge;
mod error;

pub mod prelude;

// Re-export main entry points
pub use bridge::{Bridge, BridgeBuilder, ResourceHandle};
pub use error::{Error, ErrorKind, Result};

// Re-export the host contract and dispatch surface
pub use txbridge_core::{CellBusy, EndVariant, HostCell, HostError, TxHost, TxId};
pub use txbridge_dispatch::{DispatchError, DispatchStats, SpawnError};
pub use txbridge_engine::BoxError;

/// Execute `operation` inside a transaction on `resource`.
///
/// Free-function form of [`ResourceHandle::execute`], callable from any
/// thread. Fails fast with [`Error::ResourceDetached`] — before any
/// dispatch or transaction attempt — if the handle no longer points at a
/// live worker.
pub fn execute<H, T, F, E>(
    resource: &ResourceHandle<H>,
    transaction_name: &str,
    operation: F,
) -> Result<T>
where
    H: TxHost + 'static,
    T: Send + 'static,
    F: FnOnce(&HostCell<H>) -> std::result::Result<T, E> + Send + 'static,
    E: Into<BoxError>,
{
    resource.execute(transaction_name, operation)
}
