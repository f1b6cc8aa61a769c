//! Panic payload recovery
//!
//! The dispatcher and the transaction boundary both capture panics so a
//! failing operation cannot take down the worker thread or skip the end
//! call. This module recovers a readable message from the opaque payload
//! `catch_unwind` returns.

use std::any::Any;

/// Best-effort extraction of a panic message from a `catch_unwind` payload.
///
/// `panic!` with a string literal or a formatted message covers almost all
/// payloads in practice; anything else is reported by type opacity rather
/// than dropped.
pub fn message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
