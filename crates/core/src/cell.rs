//! Single-threaded host ownership cell
//!
//! A [`HostCell`] holds the host resource on the one thread allowed to
//! mutate it. Access is scoped: [`HostCell::with`] hands out `&mut H` for
//! the duration of a closure and releases it on return, so independent
//! pieces of worker-thread code (an operation body, a reentrant call made
//! from inside it) can each take the host in turn without aliasing.
//!
//! The cell is deliberately `!Send`: it is created on the worker thread and
//! never leaves it.

use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;

/// The host is already mutably borrowed by an enclosing scope.
///
/// Raised by [`HostCell::try_with`] when a reentrant caller asks for the
/// host while a `with` closure higher up the same stack still holds it.
#[derive(Debug, Error)]
#[error("host is borrowed by an enclosing operation")]
pub struct CellBusy;

/// Shared, single-threaded ownership of a host resource.
pub struct HostCell<H> {
    inner: Rc<RefCell<H>>,
}

impl<H> HostCell<H> {
    /// Wrap a host. Call on the thread that will own it.
    pub fn new(host: H) -> Self {
        HostCell {
            inner: Rc::new(RefCell::new(host)),
        }
    }

    /// Run `f` with exclusive access to the host.
    ///
    /// # Panics
    ///
    /// Panics if the host is already borrowed by an enclosing `with` on the
    /// same thread. Use [`HostCell::try_with`] where that is a reachable
    /// condition.
    pub fn with<R>(&self, f: impl FnOnce(&mut H) -> R) -> R {
        f(&mut self.inner.borrow_mut())
    }

    /// Run `f` with exclusive access to the host, or report [`CellBusy`]
    /// if an enclosing scope already holds it.
    pub fn try_with<R>(&self, f: impl FnOnce(&mut H) -> R) -> Result<R, CellBusy> {
        let mut guard = self.inner.try_borrow_mut().map_err(|_| CellBusy)?;
        Ok(f(&mut guard))
    }
}

impl<H> Clone for HostCell<H> {
    fn clone(&self) -> Self {
        HostCell {
            inner: Rc::clone(&self.inner),
        }
    }
}
