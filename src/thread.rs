//! Kernel thread handle.
//!
//! Spec.md scopes the thread implementation itself out of this subsystem:
//! "only its cancel/destroy contract is consumed." This module models just
//! that contract — a thread's identity, its `Running`/`Exited` state, and
//! the `cancel`/`destroy` operations — cooperatively: a thread observes its
//! cancellation and transitions to `Exited` the next time it reaches a
//! cancellation point. Since the real scheduler that decides when a thread
//! next runs is out of scope, `cancel` here transitions the state directly;
//! see SPEC_FULL.md's note on 4.E/4.F for how an embedding kernel with a
//! real scheduler would instead defer that transition.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::proc_assert;

/// Unique identifier for a kernel thread within its process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ThreadId(pub u32);

impl core::fmt::Display for ThreadId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a kernel thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadState {
    /// The thread is runnable or running.
    Running,
    /// The thread has reached its cancellation point and exited with the
    /// given payload (the status passed to `do_exit`/`kill`).
    Exited(i32),
}

const RUNNING: u32 = 0;
const EXITED: u32 = 1;

/// A single kernel thread belonging to a process.
#[derive(Debug)]
pub struct Thread {
    pub id: ThreadId,
    state: AtomicU32,
    exit_code: AtomicU32,
}

impl Thread {
    /// Creates a new thread in the `Running` state.
    pub fn new(id: ThreadId) -> Self {
        Self {
            id,
            state: AtomicU32::new(RUNNING),
            exit_code: AtomicU32::new(0),
        }
    }

    /// Current state of this thread.
    pub fn state(&self) -> ThreadState {
        if self.state.load(Ordering::Acquire) == EXITED {
            ThreadState::Exited(self.exit_code.load(Ordering::Acquire) as i32)
        } else {
            ThreadState::Running
        }
    }

    pub fn is_exited(&self) -> bool {
        matches!(self.state(), ThreadState::Exited(_))
    }

    /// Cancels this thread with the given payload.
    ///
    /// Cooperative: the thread is considered to have reached its
    /// cancellation point immediately, since this crate does not implement
    /// a scheduler capable of deferring the transition.
    pub fn cancel(&self, payload: i32) {
        self.exit_code.store(payload as u32, Ordering::Release);
        self.state.store(EXITED, Ordering::Release);
    }

    /// Destroys this thread: the thread layer drops its kernel stack and
    /// any other resources held by it. Only valid once the thread has
    /// reached `Exited` — called by the reaping parent (spec.md §4.G step
    /// 3), never by the thread on itself.
    pub fn destroy(&self) {
        proc_assert!(self.is_exited(), "destroy called on thread {} that has not exited", self.id);
        log::debug!("destroying thread {}", self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_running() {
        let t = Thread::new(ThreadId(1));
        assert_eq!(t.state(), ThreadState::Running);
        assert!(!t.is_exited());
    }

    #[test]
    fn cancel_transitions_to_exited_with_payload() {
        let t = Thread::new(ThreadId(1));
        t.cancel(7);
        assert_eq!(t.state(), ThreadState::Exited(7));
        assert!(t.is_exited());
    }

    #[test]
    fn destroy_succeeds_after_cancel() {
        let t = Thread::new(ThreadId(1));
        t.cancel(0);
        t.destroy();
    }

    #[test]
    #[should_panic(expected = "has not exited")]
    fn destroy_panics_on_running_thread() {
        let t = Thread::new(ThreadId(1));
        t.destroy();
    }
}
