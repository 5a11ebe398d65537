//! Global process table.
//!
//! The process table is the actual owner of process storage: it holds an
//! `Arc<Process>` per live (including zombie) process, keyed by PID, and
//! hands out clones of that `Arc` on lookup. `Process.children` holds only
//! PIDs — the table is where a PID resolves to the shared process object.

use alloc::collections::BTreeMap;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicUsize, Ordering};
use spin::Mutex;

use crate::pcb::{Pid, Process, ProcessState};

/// Global registry enabling lookup and enumeration of every process.
pub struct ProcessTable {
    entries: Mutex<BTreeMap<Pid, Arc<Process>>>,
    /// Captured at the creation of `PID_INIT`; the reparenting target for
    /// this table's orphans (spec.md §3 "Global state").
    init_process: Mutex<Option<Arc<Process>>>,
    /// Next-candidate cursor for `pid::next_id`, persistent for this
    /// table's lifetime (spec.md §4.A) so PIDs are not immediately
    /// recycled. Lives on the table, not as a process-wide global, so that
    /// independently constructed tables (as used by tests) allocate PIDs
    /// independently of one another.
    pid_cursor: AtomicUsize,
}

impl ProcessTable {
    pub const fn new() -> Self {
        Self {
            entries: Mutex::new(BTreeMap::new()),
            init_process: Mutex::new(None),
            pid_cursor: AtomicUsize::new(0),
        }
    }

    /// The PID-allocation cursor, for `pid::next_id` to load/advance.
    pub(crate) fn pid_cursor(&self) -> &AtomicUsize {
        &self.pid_cursor
    }

    pub(crate) fn set_init_process(&self, process: Arc<Process>) {
        *self.init_process.lock() = Some(process);
    }

    /// The process captured when this table's `PID_INIT` was created, if
    /// any.
    pub fn init_process(&self) -> Option<Arc<Process>> {
        self.init_process.lock().clone()
    }

    /// Registers `process`, failing if its PID is already present.
    pub fn register(&self, process: Arc<Process>) -> Result<(), Arc<Process>> {
        let mut entries = self.entries.lock();
        if entries.contains_key(&process.pid) {
            return Err(process);
        }
        entries.insert(process.pid, process);
        Ok(())
    }

    /// Removes and returns the process with the given PID, if present.
    pub fn unregister(&self, pid: Pid) -> Option<Arc<Process>> {
        self.entries.lock().remove(&pid)
    }

    /// Looks up a process by PID.
    pub fn lookup(&self, pid: Pid) -> Option<Arc<Process>> {
        self.entries.lock().get(&pid).cloned()
    }

    pub fn exists(&self, pid: Pid) -> bool {
        self.entries.lock().contains_key(&pid)
    }

    pub fn count(&self) -> usize {
        self.entries.lock().len()
    }

    /// Ordered enumeration of every registered process, for administrative
    /// reporting and `kill_all`.
    pub fn iterate(&self) -> Vec<Arc<Process>> {
        self.entries.lock().values().cloned().collect()
    }

    /// PIDs of every process currently in state `Dead` and parented to
    /// `parent`. Used by `wait` when scanning for a reapable child.
    pub(crate) fn children_in_state(
        &self,
        children: &[Pid],
        state: ProcessState,
    ) -> Vec<Pid> {
        let entries = self.entries.lock();
        children
            .iter()
            .filter(|pid| {
                entries
                    .get(pid)
                    .is_some_and(|p| p.state() == state)
            })
            .copied()
            .collect()
    }
}

impl Default for ProcessTable {
    fn default() -> Self {
        Self::new()
    }
}

/// The global process table instance.
pub static PROCESS_TABLE: ProcessTable = ProcessTable::new();

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pcb::ProcName;

    fn make_process(pid: u32) -> Arc<Process> {
        Arc::new(Process::new(
            Pid(pid),
            ProcName::new("t"),
            None,
            crate::vm::pagetable_create(),
            None,
        ))
    }

    #[test]
    fn register_lookup_unregister_round_trip() {
        let table = ProcessTable::new();
        let p = make_process(10);
        table.register(p).unwrap();
        assert!(table.exists(Pid(10)));
        assert_eq!(table.count(), 1);

        let found = table.lookup(Pid(10)).unwrap();
        assert_eq!(found.pid, Pid(10));

        let removed = table.unregister(Pid(10)).unwrap();
        assert_eq!(removed.pid, Pid(10));
        assert!(!table.exists(Pid(10)));
        assert_eq!(table.count(), 0);
    }

    #[test]
    fn register_rejects_duplicate_pid() {
        let table = ProcessTable::new();
        table.register(make_process(1)).unwrap();
        let dup = make_process(1);
        assert!(table.register(dup).is_err());
        assert_eq!(table.count(), 1);
    }

    #[test]
    fn iterate_enumerates_all() {
        let table = ProcessTable::new();
        table.register(make_process(1)).unwrap();
        table.register(make_process(2)).unwrap();
        let pids: Vec<_> = table.iterate().iter().map(|p| p.pid).collect();
        assert_eq!(pids.len(), 2);
        assert!(pids.contains(&Pid(1)));
        assert!(pids.contains(&Pid(2)));
    }
}
