//! Stand-in for the scheduler collaborator.
//!
//! Spec.md consumes three primitives from the scheduler — `sleep_on(q)`,
//! `broadcast_on(q)`, `queue_empty(q)` — plus a per-CPU `current` slot that
//! the scheduler (not this subsystem) writes. This module owns that slot's
//! storage and implements the wait-queue contract; nothing in `creation`,
//! `lifecycle`, `wait`, or `exit` ever calls [`set_current`] itself — only
//! the scheduler (here, test harnesses standing in for it) does.

use crate::pcb::Process;
use alloc::sync::Arc;

#[cfg(feature = "std")]
mod queue_impl {
    use std::sync::{Condvar, Mutex};

    /// A scheduler wait queue: a list of sleepers and a size, per spec.md
    /// §6. Backed by a `Condvar` so `waitpid`'s blocking path is exercised
    /// with genuine concurrency in tests rather than faked sequentially.
    pub struct WaitQueue {
        state: Mutex<State>,
        cv: Condvar,
    }

    struct State {
        sleepers: usize,
        generation: u64,
    }

    impl WaitQueue {
        pub const fn new() -> Self {
            Self {
                state: Mutex::new(State {
                    sleepers: 0,
                    generation: 0,
                }),
                cv: Condvar::new(),
            }
        }

        /// Sleeps until the next `broadcast_on` call.
        pub fn sleep_on(&self) {
            let mut state = self.state.lock().unwrap();
            let start_gen = state.generation;
            state.sleepers += 1;
            while state.generation == start_gen {
                state = self.cv.wait(state).unwrap();
            }
            state.sleepers -= 1;
        }

        /// Wakes every sleeper currently on this queue.
        pub fn broadcast_on(&self) {
            let mut state = self.state.lock().unwrap();
            state.generation = state.generation.wrapping_add(1);
            self.cv.notify_all();
        }

        /// True if nobody is sleeping on this queue.
        pub fn queue_empty(&self) -> bool {
            self.state.lock().unwrap().sleepers == 0
        }
    }
}

#[cfg(not(feature = "std"))]
mod queue_impl {
    use core::sync::atomic::{AtomicUsize, Ordering};

    /// No-scheduler fallback: records sleeper count only. An embedding
    /// kernel built without the `std` feature must supply its own
    /// scheduler implementing this same sleep/broadcast contract; this
    /// type is not meant to block anything on its own.
    pub struct WaitQueue {
        sleepers: AtomicUsize,
    }

    impl WaitQueue {
        pub const fn new() -> Self {
            Self {
                sleepers: AtomicUsize::new(0),
            }
        }

        pub fn sleep_on(&self) {
            self.sleepers.fetch_add(1, Ordering::SeqCst);
        }

        pub fn broadcast_on(&self) {
            self.sleepers.store(0, Ordering::SeqCst);
        }

        pub fn queue_empty(&self) -> bool {
            self.sleepers.load(Ordering::SeqCst) == 0
        }
    }
}

pub use queue_impl::WaitQueue;

impl Default for WaitQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
std::thread_local! {
    static CURRENT: core::cell::RefCell<Option<Arc<Process>>> = const { core::cell::RefCell::new(None) };
}

/// Returns the process whose thread is executing on this CPU.
///
/// Single-CPU in spec.md's model; this crate uses one thread-local slot per
/// host OS thread so tests can drive genuinely concurrent "kernel threads".
#[cfg(feature = "std")]
pub fn current() -> Option<Arc<Process>> {
    CURRENT.with(|c| c.borrow().clone())
}

/// Sets the process running on this CPU.
///
/// Called by the scheduler when it switches a CPU to a different process.
/// Nothing in this crate's own process-management logic calls this —
/// only the scheduler (or, in tests, code standing in for it) does.
#[cfg(feature = "std")]
pub fn set_current(process: Option<Arc<Process>>) {
    CURRENT.with(|c| *c.borrow_mut() = process);
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use std::sync::{Arc as StdArc, Barrier};
    use std::thread;

    #[test]
    fn sleep_on_wakes_on_broadcast() {
        let q = StdArc::new(WaitQueue::new());
        let barrier = StdArc::new(Barrier::new(2));

        let q2 = q.clone();
        let barrier2 = barrier.clone();
        let handle = thread::spawn(move || {
            barrier2.wait();
            // Give the sleeper a moment to register before waking it.
            std::thread::sleep(std::time::Duration::from_millis(20));
            q2.broadcast_on();
        });

        barrier.wait();
        q.sleep_on();
        handle.join().unwrap();
        assert!(q.queue_empty());
    }
}
