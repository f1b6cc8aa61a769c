//! Convenience re-exports for typical txbridge usage.
//!
//! ```ignore
//! use txbridge::prelude::*;
//! ```

pub use crate::bridge::{Bridge, BridgeBuilder, ResourceHandle};
pub use crate::error::{Error, ErrorKind, Result};
pub use crate::execute;
pub use txbridge_core::{EndVariant, HostCell, HostError, TxHost, TxId};
