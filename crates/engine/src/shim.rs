//! Capability-probed transaction calls
//!
//! Host versions disagree on the shape of the end-transaction call. The
//! shim tries each known signature in a fixed priority order and reports
//! which one worked via [`EndVariant`]. Probing is stateless per call: no
//! variant cache, so hosts of different versions within one process each
//! resolve correctly.

use txbridge_core::{EndVariant, HostError, TxHost, TxId};

/// Open a transaction on the host.
///
/// A [`HostError::Unsupported`] here means no compatible begin signature
/// exists on this host version; it propagates unchanged.
pub fn begin<H: TxHost>(host: &mut H, name: &str) -> Result<TxId, HostError> {
    host.begin_transaction(name)
}

/// Close a transaction, probing end signatures in priority order.
///
/// 1. Canonical `end_transaction(id, commit)`.
/// 2. `end_transaction_notify(id, commit, true)` — the success flag is
///    passed as the commit flag and the notification flag is fixed to
///    `true`. Whether that matches the two-argument variant's notification
///    behavior on every host version is an assumption carried from the
///    hosts observed so far, not a verified equivalence.
///
/// If both signatures are missing, the original miss from step 1 is
/// returned unchanged so the caller sees the true root cause. A
/// non-capability failure from either signature stops probing immediately.
pub fn end<H: TxHost>(host: &mut H, id: TxId, commit: bool) -> Result<EndVariant, HostError> {
    let original = match host.end_transaction(id, commit) {
        Ok(()) => return Ok(EndVariant::Commit),
        Err(e) if e.is_unsupported() => e,
        Err(e) => return Err(e),
    };

    match host.end_transaction_notify(id, commit, true) {
        Ok(()) => {
            tracing::debug!(
                tx = %id,
                variant = %EndVariant::CommitNotify,
                "resolved end-transaction via notify fallback"
            );
            Ok(EndVariant::CommitNotify)
        }
        Err(e) if e.is_unsupported() => Err(original),
        Err(e) => Err(e),
    }
}
