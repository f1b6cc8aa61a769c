//! Host resource contract
//!
//! A host resource is a shared, not-thread-safe structure (a symbol database,
//! a document model) that guards mutations behind begin/end transaction
//! calls. The exact shape of the end call varies across host versions, so
//! the trait exposes every known signature and a host implements the ones
//! its version actually has; the rest report [`HostError::Unsupported`],
//! which the engine treats as a capability miss rather than a domain error.

use std::fmt;

use thiserror::Error;

/// Opaque identifier for an open transaction.
///
/// Returned by [`TxHost::begin_transaction`] and consumed exactly once by
/// the end call. Never reused by the bridge.
///
/// # Examples
///
/// ```
/// use txbridge_core::TxId;
///
/// let id = TxId::new(7);
/// assert_eq!(id.as_u64(), 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TxId(u64);

impl TxId {
    /// Create a transaction id from the host's raw token.
    pub fn new(raw: u64) -> Self {
        TxId(raw)
    }

    /// Raw token value, for diagnostics and host bookkeeping.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tx#{}", self.0)
    }
}

/// Failure of a host transaction call.
#[derive(Debug, Error)]
pub enum HostError {
    /// The host version does not expose this method.
    ///
    /// This is the missing-method condition: it signals a capability miss
    /// and makes the engine probe the next known signature. It is distinct
    /// from a host-side domain failure, which stops probing immediately.
    #[error("host does not support `{method}`")]
    Unsupported {
        /// Name of the method the host version lacks.
        method: &'static str,
    },

    /// The host rejected or failed the call.
    #[error("host transaction call failed: {0}")]
    Failed(String),
}

impl HostError {
    /// Shorthand for the missing-method condition.
    pub fn unsupported(method: &'static str) -> Self {
        HostError::Unsupported { method }
    }

    /// Whether this is a capability miss rather than a domain failure.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, HostError::Unsupported { .. })
    }
}

/// Transaction surface of a host resource.
///
/// `begin_transaction` is mandatory. The two end signatures cover the known
/// shapes across host versions; each defaults to [`HostError::Unsupported`]
/// so a host implements only what its version provides. The engine probes
/// them in a fixed order (two-argument first, then the notify variant) and
/// preserves the original capability miss when neither is available.
///
/// Nested transactions are permitted if the host supports them: each begin
/// returns a fresh [`TxId`] and ends pair innermost-first.
pub trait TxHost {
    /// Open a transaction named `name` (an opaque diagnostic label).
    fn begin_transaction(&mut self, name: &str) -> Result<TxId, HostError>;

    /// Close transaction `id`, committing if `commit` is true and rolling
    /// back otherwise. Canonical two-argument signature.
    fn end_transaction(&mut self, id: TxId, commit: bool) -> Result<(), HostError> {
        let _ = (id, commit);
        Err(HostError::unsupported("end_transaction"))
    }

    /// Close transaction `id` with an explicit listener-notification flag.
    /// Present on some host versions instead of the two-argument form.
    fn end_transaction_notify(
        &mut self,
        id: TxId,
        commit: bool,
        notify: bool,
    ) -> Result<(), HostError> {
        let _ = (id, commit, notify);
        Err(HostError::unsupported("end_transaction_notify"))
    }
}
