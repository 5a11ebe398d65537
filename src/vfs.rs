//! Stand-in for the VFS layer collaborator.
//!
//! Spec.md consumes exactly four primitives from the filesystem layer:
//! `vref`, `vput`, `close(fd)`, and a root vnode symbol. This module
//! implements a minimal reference-counted vnode and open-file handle so the
//! crate can exercise `cwd`/`files` cleanup in isolation; an embedding
//! kernel replaces it with its real VFS.

use alloc::sync::Arc;
use core::sync::atomic::{AtomicUsize, Ordering};

/// A VFS vnode, reference-counted the way `vref`/`vput` require.
#[derive(Debug, Clone)]
pub struct Vnode {
    inner: Arc<VnodeInner>,
}

#[derive(Debug)]
struct VnodeInner {
    /// Stand-in identity; a real VFS vnode carries inode/device info.
    id: u64,
}

impl Vnode {
    /// Returns the VFS root vnode, acquiring a reference on it (`vref`).
    pub fn root() -> Self {
        Self {
            inner: Arc::new(VnodeInner { id: 0 }),
        }
    }

    /// Acquires an additional reference (`vref`).
    pub fn vref(&self) -> Self {
        self.clone()
    }

    /// Releases this reference (`vput`). Dropping the handle has the same
    /// effect; this exists so call sites can name the operation the way
    /// spec.md does.
    pub fn vput(self) {
        drop(self);
    }

    /// Current reference count, for tests only.
    pub fn strong_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

/// An open file, reference-counted so that `close` only tears it down once
/// every descriptor referencing it is gone.
#[derive(Debug, Clone)]
pub struct FileHandle {
    refcount: Arc<AtomicUsize>,
}

impl FileHandle {
    /// Opens a fresh file handle with a reference count of one.
    pub fn open() -> Self {
        Self {
            refcount: Arc::new(AtomicUsize::new(1)),
        }
    }

    /// Number of descriptors currently referencing this file.
    pub fn refcount(&self) -> usize {
        self.refcount.load(Ordering::Acquire)
    }

    /// Closes one descriptor's reference to this file.
    pub fn close(&self) {
        self.refcount.fetch_sub(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vref_increments_strong_count() {
        let root = Vnode::root();
        let cwd = root.vref();
        assert_eq!(cwd.strong_count(), 2);
        cwd.vput();
    }

    #[test]
    fn close_decrements_refcount() {
        let f = FileHandle::open();
        assert_eq!(f.refcount(), 1);
        f.close();
        assert_eq!(f.refcount(), 0);
    }
}
