//! Thread-exit coordination and cleanup (spec.md §4.E, §4.F).

use alloc::sync::Arc;

use crate::pcb::Process;
use crate::proc_assert;
use crate::table::{ProcessTable, PROCESS_TABLE};

/// Invoked by the threading layer when any thread of `current` terminates.
///
/// Scans `current`'s threads; if any is still running, more threads must
/// drain first and this is a no-op. Once every thread has exited, drives
/// [`cleanup`] with `retval` reinterpreted as the exit status. This makes
/// the single-thread case equivalent to "thread exit implies process exit"
/// without special-casing it.
pub fn thread_exited(current: &Arc<Process>, retval: i32) {
    thread_exited_in(&PROCESS_TABLE, current, retval)
}

pub fn thread_exited_in(table: &ProcessTable, current: &Arc<Process>, retval: i32) {
    let all_exited = current.threads.lock().iter().all(|t| t.is_exited());
    if !all_exited {
        return;
    }
    cleanup_in(table, current, retval);
}

/// Transitions `process` to `DEAD`, reparents its children to the init
/// process, wakes its parent's wait queue, and releases the resources a
/// dying thread can safely drop on its own (cwd, open files).
///
/// The page directory and thread objects are *not* freed here — they
/// remain owned by `process` until its parent reaps it (spec.md §4.F step
/// 6): the dying thread still needs its page directory and kernel stack to
/// unwind back out of this call.
pub fn cleanup(process: &Arc<Process>, status: i32) {
    cleanup_in(&PROCESS_TABLE, process, status)
}

pub fn cleanup_in(table: &ProcessTable, process: &Arc<Process>, status: i32) {
    proc_assert!(
        table.init_process().is_some(),
        "cleanup requires init_process to exist"
    );
    proc_assert!(process.pid.0 >= 1, "idle process must never clean up");
    let parent_pid = process.parent();
    proc_assert!(parent_pid.is_some(), "cleanup requires a parent");

    if !process.mark_dead(status) {
        // Already cleaned up; spec.md §8 property 3 forbids running twice.
        return;
    }

    reparent_children(table, process);

    if let Some(parent_pid) = parent_pid {
        if let Some(parent) = table.lookup(parent_pid) {
            if !parent.wait_queue.queue_empty() {
                parent.wait_queue.broadcast_on();
            }
        }
    }

    if let Some(cwd) = process.cwd.lock().take() {
        cwd.vput();
    }

    for slot in process.files.lock().iter() {
        if let Some(file) = slot {
            if file.refcount() > 0 {
                file.close();
            }
        }
    }

    log::info!("process {} ({}) exited with status {}", process.pid, process.comm.as_str(), status);
}

/// Reparents every child of `process` to the init process, consuming
/// `process.children` in the transfer (spec.md §4.F step 2).
fn reparent_children(table: &ProcessTable, process: &Arc<Process>) {
    let children = core::mem::take(&mut *process.children.lock());
    if children.is_empty() {
        return;
    }

    let Some(init) = table.init_process() else {
        return;
    };

    for child_pid in children {
        if let Some(child) = table.lookup(child_pid) {
            child.set_parent(init.pid);
        }
        init.children.lock().push(child_pid);
    }
}
