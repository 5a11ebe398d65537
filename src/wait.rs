//! Wait / reaper (spec.md §4.G).

use alloc::sync::Arc;

use crate::error::ProcError;
use crate::pcb::{Pid, Process, ProcessState};
use crate::table::{ProcessTable, PROCESS_TABLE};

/// Waits for a child to die and reaps it, returning its PID and exit status.
///
/// `target` is `-1` for "any child" or a positive PID for a specific child.
/// `options` must be `0`.
///
/// The specific-PID branch checks the target's state *before* sleeping on
/// every iteration, exactly like the any-child branch — the original
/// algorithm slept unconditionally first, which could miss a child that
/// had already died by the time `waitpid` was called.
pub fn waitpid(current: &Arc<Process>, target: i64, options: u32) -> Result<(Pid, i32), ProcError> {
    waitpid_in(&PROCESS_TABLE, current, target, options)
}

pub fn waitpid_in(
    table: &ProcessTable,
    current: &Arc<Process>,
    target: i64,
    options: u32,
) -> Result<(Pid, i32), ProcError> {
    if options != 0 {
        return Err(ProcError::InvalidArgument("waitpid options must be 0"));
    }

    if current.children().is_empty() {
        return Err(ProcError::NoSuchChild);
    }

    if target == -1 {
        loop {
            let children = current.children();
            let dead = table.children_in_state(&children, ProcessState::Dead);
            if let Some(&pid) = dead.first() {
                return reap(table, current, pid);
            }
            current.wait_queue.sleep_on();
        }
    } else if target > 0 {
        let target_pid = Pid(target as u32);
        if !current.children().contains(&target_pid) {
            return Err(ProcError::NoSuchChild);
        }
        loop {
            let is_dead = table
                .lookup(target_pid)
                .is_some_and(|p| p.state() == ProcessState::Dead);
            if is_dead {
                return reap(table, current, target_pid);
            }
            current.wait_queue.sleep_on();
        }
    } else {
        Err(ProcError::InvalidArgument("waitpid target must be -1 or positive"))
    }
}

/// Reaps a dead child: copies its status, destroys its exited threads, and
/// removes it from the parent's children and from the process table.
fn reap(table: &ProcessTable, current: &Arc<Process>, pid: Pid) -> Result<(Pid, i32), ProcError> {
    let child = table.lookup(pid).ok_or(ProcError::NoSuchChild)?;
    let status = child.status();

    for thread in child.threads.lock().iter() {
        thread.destroy();
    }
    child.threads.lock().clear();

    current.children.lock().retain(|&c| c != pid);
    table.unregister(pid);

    log::info!("reaped process {} (status {})", pid, status);

    Ok((pid, status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creation::proc_create_in;
    use crate::lifecycle::cleanup;
    use crate::sched;

    #[test]
    fn no_children_is_echild() {
        let table = ProcessTable::new();
        let idle = proc_create_in(&table, "idle").unwrap();
        assert_eq!(
            waitpid_in(&table, &idle, -1, 0),
            Err(ProcError::NoSuchChild)
        );
    }

    #[test]
    fn nonmatching_pid_is_echild() {
        let table = ProcessTable::new();
        let idle = proc_create_in(&table, "idle").unwrap();
        sched::set_current(Some(idle.clone()));
        let _a = proc_create_in(&table, "a").unwrap();
        sched::set_current(None);
        assert_eq!(
            waitpid_in(&table, &idle, 99, 0),
            Err(ProcError::NoSuchChild)
        );
    }

    #[test]
    fn nonzero_options_rejected() {
        let table = ProcessTable::new();
        let idle = proc_create_in(&table, "idle").unwrap();
        assert_eq!(
            waitpid_in(&table, &idle, -1, 1),
            Err(ProcError::InvalidArgument("waitpid options must be 0"))
        );
    }

    #[test]
    fn reaps_already_dead_child_without_sleeping() {
        let table = ProcessTable::new();
        let idle = proc_create_in(&table, "idle").unwrap();
        sched::set_current(Some(idle.clone()));
        let a = proc_create_in(&table, "a").unwrap();
        sched::set_current(None);

        cleanup(&a, 7);

        let (pid, status) = waitpid_in(&table, &idle, -1, 0).unwrap();
        assert_eq!(pid, a.pid);
        assert_eq!(status, 7);
        assert!(!table.exists(a.pid));
    }

    #[test]
    fn waitpid_blocks_until_child_dies() {
        let table = ProcessTable::new();
        let idle = proc_create_in(&table, "idle").unwrap();
        sched::set_current(Some(idle.clone()));
        let a = proc_create_in(&table, "a").unwrap();
        sched::set_current(None);

        let a2 = a.clone();
        let handle = std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(20));
            cleanup(&a2, 4);
        });

        let (pid, status) = waitpid_in(&table, &idle, -1, 0).unwrap();
        assert_eq!(pid, a.pid);
        assert_eq!(status, 4);
        handle.join().unwrap();
    }
}
