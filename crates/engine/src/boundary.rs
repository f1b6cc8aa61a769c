//! Transaction boundary
//!
//! [`run`] brackets one operation with begin/end calls on the host:
//!
//! ```text
//! 1. begin — failure returns immediately; no handle exists, end is
//!    never attempted
//! 2. operation, exactly once, under catch_unwind — a panicking
//!    operation is a failure, not a skipped end call
//! 3. end, exactly once, with commit = (operation succeeded)
//! ```
//!
//! An end failure after a successful begin is secondary: it is logged and
//! recorded on the outcome, but never replaces the operation's own result.
//! A transaction that committed noisily is distinguishable from one whose
//! operation failed.

use std::panic::{catch_unwind, AssertUnwindSafe};

use thiserror::Error;
use txbridge_core::{panics, EndVariant, ErrorKind, HostCell, HostError, TxHost};

use crate::shim;

/// Boxed error type operations may fail with.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Primary failure of a bracketed transaction run.
#[derive(Debug, Error)]
pub enum BoundaryError {
    /// The host refused to open the transaction, or no compatible begin
    /// signature exists. No end call was made.
    #[error("failed to start transaction `{name}`: {source}")]
    Start {
        /// Diagnostic label the transaction was opened under.
        name: String,
        /// The host's refusal or capability miss.
        #[source]
        source: HostError,
    },

    /// A reentrant run was requested while an enclosing scope on the same
    /// thread still held the host borrowed. Nothing was begun.
    #[error("cannot start transaction `{name}`: host is borrowed by an enclosing operation")]
    ReentrantBusy {
        /// Diagnostic label of the rejected transaction.
        name: String,
    },

    /// The operation body failed (or panicked). The transaction was ended
    /// with `commit = false`.
    #[error("operation failed in transaction `{name}`: {source}")]
    Operation {
        /// Diagnostic label the transaction ran under.
        name: String,
        /// The operation's own error, or the recovered panic message.
        #[source]
        source: BoxError,
    },
}

/// Outcome of one bracketed run: the primary result plus secondary
/// diagnostics. Immutable once produced.
#[derive(Debug)]
pub struct TxOutcome<T> {
    /// The operation's value, or the first root-cause failure.
    pub result: Result<T, BoundaryError>,
    /// Failure of the end call, if any. Never masks `result`.
    pub end_error: Option<HostError>,
    /// Which end signature was resolved, when the end call succeeded.
    pub end_variant: Option<EndVariant>,
}

impl<T> TxOutcome<T> {
    fn unstarted(error: BoundaryError) -> Self {
        TxOutcome {
            result: Err(error),
            end_error: None,
            end_variant: None,
        }
    }
}

/// Run `operation` inside a transaction named `name` on the host in `cell`.
///
/// The operation receives the cell rather than a raw `&mut H`, so its body
/// takes the host in scoped borrows ([`HostCell::with`]) and reentrant
/// bridge calls made from inside it can take the host in turn.
pub fn run<H, T, F, E>(cell: &HostCell<H>, name: &str, operation: F) -> TxOutcome<T>
where
    H: TxHost,
    F: FnOnce(&HostCell<H>) -> Result<T, E>,
    E: Into<BoxError>,
{
    let id = match cell.try_with(|host| shim::begin(host, name)) {
        Ok(Ok(id)) => id,
        Ok(Err(source)) => {
            return TxOutcome::unstarted(BoundaryError::Start {
                name: name.to_string(),
                source,
            })
        }
        Err(_busy) => {
            return TxOutcome::unstarted(BoundaryError::ReentrantBusy {
                name: name.to_string(),
            })
        }
    };

    let op_result: Result<T, BoxError> = match catch_unwind(AssertUnwindSafe(|| operation(cell))) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(error)) => Err(error.into()),
        Err(payload) => Err(format!("operation panicked: {}", panics::message(payload.as_ref())).into()),
    };
    let success = op_result.is_ok();

    if let Err(error) = &op_result {
        tracing::error!(transaction = name, %error, "transaction operation failed");
    }

    let (end_error, end_variant) = match cell.with(|host| shim::end(host, id, success)) {
        Ok(variant) => (None, Some(variant)),
        Err(error) => {
            tracing::error!(
                transaction = name,
                %error,
                kind = ErrorKind::TransactionEndFailure.as_str(),
                "failed to end transaction; primary outcome preserved"
            );
            (Some(error), None)
        }
    };

    TxOutcome {
        result: op_result.map_err(|source| BoundaryError::Operation {
            name: name.to_string(),
            source,
        }),
        end_error,
        end_variant,
    }
}
