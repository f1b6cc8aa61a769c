//! Unified error type for txbridge.
//!
//! Every failure path — argument validation, dispatch transport, the
//! transaction boundary — normalizes to one [`Error`] carrying a
//! phase-prefixed message, a stable [`ErrorKind`] name, and the original
//! cause reachable through `source()` chaining.

use thiserror::Error;
use txbridge_core::HostError;
use txbridge_dispatch::DispatchError;
use txbridge_engine::{BoundaryError, BoxError};

pub use txbridge_core::ErrorKind;

/// All txbridge failures.
///
/// This is the canonical error type returned by [`execute`](crate::execute)
/// and the bridge methods. Callers receive exactly one of these per call,
/// describing the first root cause; secondary failures (an end call failing
/// after the operation already failed) are logged, never returned.
#[derive(Debug, Error)]
pub enum Error {
    /// The resource handle is no longer attached to a live worker.
    /// Checked before any dispatch or transaction attempt.
    #[error("resource handle is detached; transactions require a live worker")]
    ResourceDetached,

    /// The host refused to open the transaction, or no compatible begin
    /// signature exists on this host version.
    #[error("failed to start transaction `{name}`: {source}")]
    TransactionStart {
        /// Diagnostic label of the rejected transaction.
        name: String,
        /// The host's refusal or capability miss.
        #[source]
        source: HostError,
    },

    /// A reentrant call asked for the host while an enclosing operation on
    /// the worker thread still held it borrowed.
    #[error("cannot start transaction `{name}`: host is borrowed by an enclosing operation")]
    ReentrantStart {
        /// Diagnostic label of the rejected transaction.
        name: String,
    },

    /// The operation body failed or panicked.
    #[error("operation failed in transaction `{name}`: {source}")]
    Operation {
        /// Diagnostic label the transaction ran under.
        name: String,
        /// The operation's own error, or the recovered panic message.
        #[source]
        source: BoxError,
    },

    /// The hand-off to the worker thread failed. The transport wrapping is
    /// already unwrapped to the underlying cause (panic payload, closed
    /// queue, dead worker).
    #[error("worker dispatch failed: {0}")]
    Dispatch(#[from] DispatchError),
}

impl Error {
    /// The taxonomy kind of this failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ResourceDetached => ErrorKind::InvalidArgument,
            Error::TransactionStart { .. } | Error::ReentrantStart { .. } => {
                ErrorKind::TransactionStartFailure
            }
            Error::Operation { .. } => ErrorKind::OperationFailure,
            Error::Dispatch(_) => ErrorKind::ThreadDispatchFailure,
        }
    }

    /// Whether the failure was argument validation (nothing was attempted).
    pub fn is_invalid_argument(&self) -> bool {
        self.kind() == ErrorKind::InvalidArgument
    }

    /// Whether the transaction never opened.
    pub fn is_start_failure(&self) -> bool {
        self.kind() == ErrorKind::TransactionStartFailure
    }

    /// Whether the operation body itself failed.
    pub fn is_operation_failure(&self) -> bool {
        self.kind() == ErrorKind::OperationFailure
    }

    /// Whether the cross-thread hand-off failed.
    pub fn is_dispatch_failure(&self) -> bool {
        self.kind() == ErrorKind::ThreadDispatchFailure
    }
}

// Convert from the engine's boundary errors
impl From<BoundaryError> for Error {
    fn from(e: BoundaryError) -> Self {
        match e {
            BoundaryError::Start { name, source } => Error::TransactionStart { name, source },
            BoundaryError::ReentrantBusy { name } => Error::ReentrantStart { name },
            BoundaryError::Operation { name, source } => Error::Operation { name, source },
        }
    }
}

/// Result type for txbridge operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
