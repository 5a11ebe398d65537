//! Stand-in for the VM layer collaborator.
//!
//! Spec.md scopes the virtual memory layer out of this subsystem entirely:
//! this subsystem only ever asks it for a fresh page directory at creation
//! and holds the handle until reap. This module implements exactly that one
//! entry point so the crate is self-testing; an embedding kernel replaces it
//! with its real page-table constructor.

use core::sync::atomic::{AtomicU64, Ordering};

/// Opaque handle to a process's page directory.
///
/// Required to remain valid until the owning process is reaped (spec.md
/// §3, invariant 3). This subsystem never dereferences it.
#[derive(Debug)]
pub struct PageDirectory {
    id: u64,
}

impl PageDirectory {
    /// Returns an opaque identifier, useful only for logging/debugging.
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Requests a fresh page directory from the VM layer.
///
/// Stand-in implementation: hands out a unique, monotonically increasing
/// identifier. A real VM layer would allocate and populate an actual page
/// table here.
pub fn pagetable_create() -> PageDirectory {
    static NEXT_ID: AtomicU64 = AtomicU64::new(1);
    PageDirectory {
        id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let a = pagetable_create();
        let b = pagetable_create();
        assert_ne!(a.id(), b.id());
    }
}
