//! Debug-only non-reentrancy check for table operations.
//!
//! Every table operation assumes exclusive, run-to-completion access; there
//! is no locking and no support for nested entry while an operation is in
//! flight. In debug builds the tracker panics on nested entry so misuse
//! surfaces immediately; in release builds it compiles down to nothing.

use core::cell::Cell;
use core::marker::PhantomData;

/// Per-table operation tracker. Table methods open their body with
/// `let _op = self.guard.enter();` and hold the returned guard for the
/// duration of the operation.
#[derive(Debug)]
pub(crate) struct DebugNonReentrant {
    #[cfg(debug_assertions)]
    in_op: Cell<bool>,
    // The table is single-threaded; keep the tracker !Send + !Sync too.
    _nosend: PhantomData<*mut ()>,
}

impl DebugNonReentrant {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            in_op: Cell::new(false),
            _nosend: PhantomData,
        }
    }

    /// Mark an operation as in flight. Panics in debug builds if another
    /// operation on the same table has not finished yet.
    #[inline]
    pub(crate) fn enter(&self) -> OpGuard<'_> {
        #[cfg(debug_assertions)]
        {
            assert!(
                !self.in_op.get(),
                "table operation started while another operation is in flight"
            );
            self.in_op.set(true);
            return OpGuard { owner: self };
        }

        #[cfg(not(debug_assertions))]
        {
            return OpGuard { _z: PhantomData };
        }
    }
}

/// RAII marker for an in-flight table operation.
pub(crate) struct OpGuard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a DebugNonReentrant,
    #[cfg(not(debug_assertions))]
    _z: PhantomData<&'a ()>,
}

impl<'a> Drop for OpGuard<'a> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            debug_assert!(self.owner.in_op.get());
            self.owner.in_op.set(false);
        }
    }
}
