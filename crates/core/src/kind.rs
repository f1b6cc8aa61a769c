//! Stable failure-kind taxonomy
//!
//! One name per failure phase, shared by the bridge's error type and the
//! structured logs so returned errors and diagnostics agree on vocabulary.

use std::fmt;

/// Stable failure-kind names, one per phase of the taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The resource handle was absent or detached; nothing was attempted.
    InvalidArgument,
    /// No compatible begin signature, or begin itself failed; no end call
    /// was made.
    TransactionStartFailure,
    /// The operation body failed; the transaction was ended with
    /// `commit = false`.
    OperationFailure,
    /// The end call failed after a successful begin. Secondary only: it is
    /// logged and recorded on the outcome, and never returned as the
    /// primary error.
    TransactionEndFailure,
    /// The hand-off to the worker thread failed at the transport level.
    ThreadDispatchFailure,
}

impl ErrorKind {
    /// The kind's stable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "InvalidArgument",
            ErrorKind::TransactionStartFailure => "TransactionStartFailure",
            ErrorKind::OperationFailure => "OperationFailure",
            ErrorKind::TransactionEndFailure => "TransactionEndFailure",
            ErrorKind::ThreadDispatchFailure => "ThreadDispatchFailure",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
