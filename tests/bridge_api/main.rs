//! End-to-end tests for the bridge facade.
//!
//! Organized by concern:
//! - `scenarios`: the execute entry point against a mock symbol database
//! - `reentrancy`: calls issued from the worker thread itself
//! - `compat`: end-signature probing observed through the public API

use static_assertions::assert_impl_all;
use txbridge::{Bridge, ResourceHandle};

mod common;
mod compat;
mod scenarios;

use common::MockProgram;

assert_impl_all!(ResourceHandle<MockProgram>: Send, Sync);
assert_impl_all!(Bridge<MockProgram>: Send, Sync);
