//! Transaction engine for txbridge
//!
//! Two layers, leaf to root:
//! - [`shim`]: capability-probed invocation of the host's begin/end calls,
//!   tolerating the signature variance across host versions
//! - [`boundary`]: the begin/operate/end bracket with exactly-once end
//!   pairing, panic capture, and secondary-failure diagnostics

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod boundary;
pub mod shim;

pub use boundary::{BoundaryError, BoxError, TxOutcome};
