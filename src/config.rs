//! Compile-time limits for the process management core.

/// Size of the PID namespace; PIDs are drawn from `[0, PROC_MAX_COUNT)`.
pub const PROC_MAX_COUNT: usize = 512;

/// Maximum length of a process name (`comm`), including the NUL terminator.
pub const PROC_NAME_LEN: usize = 32;

/// Number of file-descriptor slots per process.
pub const NFILES: usize = 32;

/// The bootstrap process. Never exits; may create only [`PID_INIT`].
pub const PID_IDLE: u32 = 0;

/// Adopts orphaned children; may not itself be reaped.
pub const PID_INIT: u32 = 1;

/// Reserved by `kill_all` policy: never targeted by mass kill.
pub const PID_DAEMON: u32 = 2;
