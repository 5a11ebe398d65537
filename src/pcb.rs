//! Process Control Block.
//!
//! `Process` is the core data structure this crate manages: per-process
//! state, parent/child relationships, and the resource handles owned by a
//! process (threads, open files, cwd, page directory). See spec.md §3 for
//! the full data model this mirrors.

use alloc::vec::Vec;
use core::sync::atomic::{AtomicI32, AtomicU8, AtomicUsize, Ordering};
use spin::Mutex;

use crate::config::{NFILES, PROC_NAME_LEN};
use crate::sched::WaitQueue;
use crate::thread::Thread;
use crate::vfs::{FileHandle, Vnode};
use crate::vm::PageDirectory;

/// Process identifier, unique among all live (including zombie) processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pid(pub u32);

impl core::fmt::Display for Pid {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Process lifecycle state (spec.md §3: `{RUNNING, DEAD}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    Running,
    Dead,
}

const RUNNING: u8 = 0;
const DEAD: u8 = 1;

/// Bounded, NUL-terminated process name.
#[derive(Clone, Copy)]
pub struct ProcName {
    buf: [u8; PROC_NAME_LEN],
}

impl ProcName {
    /// Copies `name`, truncating to `PROC_NAME_LEN - 1` bytes and always
    /// NUL-terminating, matching the original `strncpy` + truncation
    /// behavior byte for byte.
    pub fn new(name: &str) -> Self {
        let mut buf = [0u8; PROC_NAME_LEN];
        let bytes = name.as_bytes();
        let copy_len = bytes.len().min(PROC_NAME_LEN - 1);
        buf[..copy_len].copy_from_slice(&bytes[..copy_len]);
        Self { buf }
    }

    /// The name as a `&str`, stopping at the NUL terminator.
    pub fn as_str(&self) -> &str {
        let end = self.buf.iter().position(|&b| b == 0).unwrap_or(self.buf.len());
        core::str::from_utf8(&self.buf[..end]).unwrap_or("")
    }
}

impl core::fmt::Debug for ProcName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

/// Per-process state: attributes, relationships, and resource handles.
///
/// Owned by the process table for storage (an `Arc<Process>` lives in
/// `table::ProcessTable`); logically owned by its parent for reaping —
/// only the parent may remove it from the table (spec.md §5 "Ownership").
#[derive(Debug)]
pub struct Process {
    pub pid: Pid,
    pub comm: ProcName,

    state: AtomicU8,
    status: AtomicI32,

    /// Weak back-reference to the creating process. `None` only for the
    /// idle process. Mutable because reparenting rewrites a child's parent
    /// when its parent dies (spec.md §4.F step 2).
    parent: Mutex<Option<Pid>>,

    /// Owning-by-parent sequence of child PIDs (spec.md §3 invariant 2).
    pub(crate) children: Mutex<Vec<Pid>>,

    /// Owned kernel threads belonging to this process.
    pub(crate) threads: Mutex<Vec<Thread>>,

    /// Scheduler wait queue this process's reaper sleeps on.
    pub wait_queue: WaitQueue,

    /// VM handle; required to remain valid until reap.
    page_directory: PageDirectory,

    pub(crate) files: Mutex<[Option<FileHandle>; NFILES]>,
    pub(crate) cwd: Mutex<Option<Vnode>>,

    /// User-space break markers, opaque to this subsystem (populated by a
    /// loader that is out of scope).
    pub start_brk: AtomicUsize,
    pub brk: AtomicUsize,
}

impl Process {
    /// Constructs a process object directly. Callers outside `creation`
    /// should prefer `creation::proc_create`, which also registers the
    /// process in the table and links it into its parent.
    pub(crate) fn new(
        pid: Pid,
        comm: ProcName,
        parent: Option<Pid>,
        page_directory: PageDirectory,
        cwd: Option<Vnode>,
    ) -> Self {
        const NO_FILE: Option<FileHandle> = None;
        Self {
            pid,
            comm,
            state: AtomicU8::new(RUNNING),
            status: AtomicI32::new(0),
            parent: Mutex::new(parent),
            children: Mutex::new(Vec::new()),
            threads: Mutex::new(Vec::new()),
            wait_queue: WaitQueue::new(),
            page_directory,
            files: Mutex::new([NO_FILE; NFILES]),
            cwd: Mutex::new(cwd),
            start_brk: AtomicUsize::new(0),
            brk: AtomicUsize::new(0),
        }
    }

    pub fn state(&self) -> ProcessState {
        if self.state.load(Ordering::Acquire) == DEAD {
            ProcessState::Dead
        } else {
            ProcessState::Running
        }
    }

    pub fn is_dead(&self) -> bool {
        matches!(self.state(), ProcessState::Dead)
    }

    /// Transitions `Running -> Dead`. Idempotent guard: returns `false` (and
    /// leaves state untouched) if already `Dead`, so cleanup can never run
    /// twice for the same process (spec.md §8 property 3).
    pub(crate) fn mark_dead(&self, status: i32) -> bool {
        let prior = self.state.swap(DEAD, Ordering::AcqRel);
        if prior == DEAD {
            self.state.store(DEAD, Ordering::Release);
            return false;
        }
        self.status.store(status, Ordering::Release);
        true
    }

    pub fn status(&self) -> i32 {
        self.status.load(Ordering::Acquire)
    }

    pub fn parent(&self) -> Option<Pid> {
        *self.parent.lock()
    }

    pub(crate) fn set_parent(&self, new_parent: Pid) {
        *self.parent.lock() = Some(new_parent);
    }

    pub fn page_directory(&self) -> &PageDirectory {
        &self.page_directory
    }

    /// Snapshot of the current children list.
    pub fn children(&self) -> Vec<Pid> {
        self.children.lock().clone()
    }

    pub fn thread_count(&self) -> usize {
        self.threads.lock().len()
    }

    /// Registers a newly created kernel thread as belonging to this
    /// process. Called by the (out-of-scope) threading layer once it has
    /// constructed a thread for this process; this subsystem only ever
    /// consumes threads' cancel/destroy contract afterward.
    pub fn attach_thread(&self, thread: Thread) {
        self.threads.lock().push(thread);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proc_name_truncates_and_nul_terminates() {
        let long = "a".repeat(PROC_NAME_LEN + 10);
        let name = ProcName::new(&long);
        assert_eq!(name.as_str().len(), PROC_NAME_LEN - 1);
    }

    #[test]
    fn proc_name_short_round_trips() {
        let name = ProcName::new("init");
        assert_eq!(name.as_str(), "init");
    }

    #[test]
    fn mark_dead_is_single_shot() {
        let p = Process::new(
            Pid(1),
            ProcName::new("x"),
            None,
            crate::vm::pagetable_create(),
            None,
        );
        assert_eq!(p.state(), ProcessState::Running);
        assert!(p.mark_dead(5));
        assert_eq!(p.state(), ProcessState::Dead);
        assert_eq!(p.status(), 5);
        // Second call must not re-fire and must not clobber the status.
        assert!(!p.mark_dead(99));
        assert_eq!(p.status(), 5);
    }
}
