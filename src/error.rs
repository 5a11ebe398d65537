//! Error types for the process management core.
//!
//! Mirrors the teacher crate's `KernelError`: a plain `core::fmt`-based enum
//! rather than `std::error::Error`, so it stays usable from a `no_std`
//! embedding kernel. Invariant violations are not represented here — those
//! are asserted via [`proc_assert`] and panic, per the spec's error-handling
//! design.

use core::fmt;

/// Failure modes a caller of this crate's public API can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProcError {
    /// `waitpid` found no reapable child: either the caller has no children
    /// at all, or (for a positive target) the target is not one of them.
    NoSuchChild,
    /// The PID namespace is fully occupied.
    PidExhausted,
    /// A caller-supplied argument was invalid (e.g. `waitpid` options != 0,
    /// or a `pid` argument that is neither `-1` nor positive).
    InvalidArgument(&'static str),
    /// The target process has already transitioned to `Dead`.
    AlreadyExited,
    /// The operation requires a current process, but none is set.
    NoCurrentProcess,
}

impl fmt::Display for ProcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSuchChild => write!(f, "-ECHILD: no reapable child"),
            Self::PidExhausted => write!(f, "PID namespace exhausted"),
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Self::AlreadyExited => write!(f, "process has already exited"),
            Self::NoCurrentProcess => write!(f, "no current process"),
        }
    }
}

/// Logs a formatted message via `log::error!` and panics if `cond` is false.
///
/// Stands in for spec.md's "Debug/print: formatted assertion logger"
/// collaborator: process-graph invariant violations (not caller-input
/// errors) go through here rather than `Result`, per the spec's error
/// handling design.
#[macro_export]
macro_rules! proc_assert {
    ($cond:expr, $($arg:tt)+) => {
        if !($cond) {
            log::error!($($arg)+);
            panic!($($arg)+);
        }
    };
}
