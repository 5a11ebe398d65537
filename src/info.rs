//! Human-facing `/proc`-style reporters (spec.md §6, the two text
//! formatters "for human inspection").

use alloc::string::String;
use alloc::sync::Arc;
use core::fmt::Write;

use crate::pcb::{Process, ProcessState};
use crate::table::ProcessTable;

/// Renders a single process as one line: pid, name, state, parent, status.
pub fn format_process(process: &Arc<Process>) -> String {
    let mut out = String::new();
    let state = match process.state() {
        ProcessState::Running => "RUNNING",
        ProcessState::Dead => "DEAD",
    };
    let parent = process
        .parent()
        .map(|p| p.0 as i64)
        .unwrap_or(-1);
    let _ = write!(
        out,
        "{:>5} {:<width$} {:<7} ppid={:<5} status={:<5} threads={}",
        process.pid,
        process.comm.as_str(),
        state,
        parent,
        process.status(),
        process.thread_count(),
        width = crate::config::PROC_NAME_LEN - 1,
    );
    out
}

/// Renders every process currently in `table`, one per line, PID-ordered
/// (the order `ProcessTable::iterate` already returns).
pub fn format_table(table: &ProcessTable) -> String {
    let mut out = String::new();
    for process in table.iterate() {
        out.push_str(&format_process(&process));
        out.push('\n');
    }
    out
}
