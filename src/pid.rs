//! PID allocator.
//!
//! Hands out unique PIDs in `[0, PROC_MAX_COUNT)`. The next-candidate
//! cursor is persistent for the lifetime of its `ProcessTable` (spec.md
//! §4.A) so PIDs already in use are not immediately recycled: amortized
//! O(n) when PIDs have never wrapped, worst case O(n^2). The cursor lives
//! on the table rather than as a process-wide global so that independently
//! constructed tables allocate PIDs independently.

use core::sync::atomic::Ordering;

use crate::config::PROC_MAX_COUNT;
use crate::error::ProcError;
use crate::pcb::Pid;
use crate::table::ProcessTable;

/// Returns the next unused PID, or `ProcError::PidExhausted` if every value
/// in `[0, PROC_MAX_COUNT)` is occupied.
pub fn next_id(table: &ProcessTable) -> Result<Pid, ProcError> {
    let cursor = table.pid_cursor();
    let start = cursor.load(Ordering::Relaxed) % PROC_MAX_COUNT;
    let mut candidate = start;
    loop {
        if !table.exists(Pid(candidate as u32)) {
            cursor.store((candidate + 1) % PROC_MAX_COUNT, Ordering::Relaxed);
            return Ok(Pid(candidate as u32));
        }
        candidate = (candidate + 1) % PROC_MAX_COUNT;
        if candidate == start {
            return Err(ProcError::PidExhausted);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pcb::{Process, ProcName};
    use alloc::sync::Arc;

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
    fn hands_out_increasing_ids_without_immediate_reuse() {
        let table = ProcessTable::new();
        let a = next_id(&table).unwrap();
        table.register(make_process(a.0)).unwrap();
        let b = next_id(&table).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn skips_occupied_ids() {
        let table = ProcessTable::new();
        let a = next_id(&table).unwrap();
        table.register(make_process(a.0)).unwrap();
        let b = next_id(&table).unwrap();
        assert!(!table.exists(b));
        assert_ne!(a, b);
    }

    #[test]
    fn exhaustion_is_reported_not_panicked() {
        let table = ProcessTable::new();
        for pid in 0..PROC_MAX_COUNT as u32 {
            table.register(make_process(pid)).unwrap();
        }
        assert_eq!(next_id(&table), Err(ProcError::PidExhausted));
    }
}
