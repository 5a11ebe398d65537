//! Process management core for a small teaching operating-system kernel:
//! the process table, PID allocation, creation, termination (cleanup and
//! reaping), thread-exit coordination, reparenting orphans to `init`, mass
//! kill, and the `wait` rendezvous.
//!
//! The scheduler, VM, and VFS layers this subsystem sits between are out of
//! scope; [`sched`], [`vm`], and [`vfs`] give each of them a minimal
//! stand-in implementing exactly the contract this crate consumes, so the
//! process graph and its invariants can be exercised with ordinary tests. A
//! kernel embedding this crate replaces those three modules with its real
//! subsystems; nothing else here changes.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod config;
pub mod creation;
pub mod error;
pub mod exit;
pub mod info;
pub mod lifecycle;
pub mod pcb;
pub mod pid;
pub mod sched;
pub mod table;
pub mod thread;
pub mod vfs;
pub mod vm;
pub mod wait;

pub use creation::{init_process, proc_create, proc_init};
pub use error::ProcError;
pub use pcb::{Pid, Process, ProcessState};
pub use table::PROCESS_TABLE;
