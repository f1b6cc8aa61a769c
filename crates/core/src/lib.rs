//! Core types for txbridge
//!
//! This crate defines the fundamental contract between the bridge and the
//! host resource it transacts against:
//! - [`TxHost`]: the transaction surface a host resource must expose
//! - [`TxId`]: opaque transaction identifier returned by `begin_transaction`
//! - [`HostError`]: failures of host transaction calls, including the
//!   missing-method condition used for capability probing
//! - [`EndVariant`]: the typed descriptor of which end-transaction signature
//!   was resolved for a call
//! - [`ErrorKind`]: the stable failure-kind taxonomy shared by errors and
//!   structured logs
//! - [`HostCell`]: single-threaded interior-mutable ownership of a host

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cell;
pub mod compat;
pub mod host;
pub mod kind;
pub mod panics;

pub use cell::{CellBusy, HostCell};
pub use compat::EndVariant;
pub use host::{HostError, TxHost, TxId};
pub use kind::ErrorKind;
