//! Typed capability descriptor for end-transaction resolution
//!
//! Resolution is stateless per call: the engine re-probes every time and
//! never assumes a previously successful variant is still valid, so hosts
//! of different versions can coexist within one process.

use std::fmt;

/// Which end-transaction signature was invocable for a given call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndVariant {
    /// Canonical `end_transaction(id, commit)`.
    Commit,
    /// Fallback `end_transaction_notify(id, commit, notify)` with the
    /// notification flag fixed to `true`.
    CommitNotify,
}

impl EndVariant {
    /// Name of the host method this variant invokes.
    pub fn method_name(&self) -> &'static str {
        match self {
            EndVariant::Commit => "end_transaction",
            EndVariant::CommitNotify => "end_transaction_notify",
        }
    }

    /// Human-readable description of the resolved signature.
    pub fn description(&self) -> &'static str {
        match self {
            EndVariant::Commit => "two-argument end (commit flag)",
            EndVariant::CommitNotify => "three-argument end (commit flag, notify fixed to true)",
        }
    }
}

impl fmt::Display for EndVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method_name())
    }
}
