//! Exit, kill, and kill-all (spec.md §4.H).

use alloc::sync::Arc;

use crate::config::{PID_DAEMON, PID_IDLE, PID_INIT};
use crate::lifecycle::thread_exited_in;
use crate::pcb::{Pid, Process};
use crate::table::{ProcessTable, PROCESS_TABLE};

/// Cancels every thread of `current` with `status`, then drives the
/// thread-exit coordinator. There is no real scheduler here to switch away
/// from the calling thread, so unlike a kernel's `do_exit` this returns to
/// its caller once cleanup has run, rather than diverging.
pub fn do_exit(current: &Arc<Process>, status: i32) {
    do_exit_in(&PROCESS_TABLE, current, status)
}

pub fn do_exit_in(table: &ProcessTable, current: &Arc<Process>, status: i32) {
    cancel_all_threads(current, status);
    thread_exited_in(table, current, status);
}

/// Cancels every thread of `target` with `status`.
///
/// If `target` is the current process, this delegates to [`do_exit`];
/// otherwise the target's threads are cancelled but its cleanup runs only
/// once each cancelled thread is next "scheduled" — in this crate, as soon
/// as cancellation completes, since there is no real scheduler to defer to.
pub fn kill(current: &Arc<Process>, target: &Arc<Process>, status: i32) {
    kill_in(&PROCESS_TABLE, current, target, status)
}

pub fn kill_in(table: &ProcessTable, current: &Arc<Process>, target: &Arc<Process>, status: i32) {
    if Arc::ptr_eq(current, target) {
        do_exit_in(table, current, status);
        return;
    }
    cancel_all_threads(target, status);
    thread_exited_in(table, target, status);
}

fn cancel_all_threads(process: &Arc<Process>, status: i32) {
    for thread in process.threads.lock().iter() {
        thread.cancel(status);
    }
}

/// Kills every process except `{current.pid, PID_IDLE, PID_INIT,
/// PID_DAEMON}`, then kills `current` itself unless it is one of those
/// protected PIDs.
///
/// The final self-kill reads `current` directly rather than any leftover
/// loop variable — the original algorithm's "kill self last" step reused a
/// stale reference from the iteration, which could kill the wrong process.
pub fn kill_all(table: &ProcessTable, current: &Arc<Process>) {
    let protected = |pid: Pid| {
        pid == current.pid || pid.0 == PID_IDLE || pid.0 == PID_INIT || pid.0 == PID_DAEMON
    };

    for process in table.iterate() {
        if protected(process.pid) {
            continue;
        }
        kill_in(table, current, &process, process.status());
    }

    if !protected(current.pid) {
        kill_in(table, current, current, current.status());
    }
}
