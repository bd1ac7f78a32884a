//! Supervised execution of a single child process.
//!
//! [`Supervisor`] forks, execs and waits for exactly one child, optionally
//! killing it when a wall-clock deadline passes, and returns an
//! [`ExecutionResult`] once the child has been reaped.
//!
//! Resource counters for reaped children accumulate per parent process, so
//! callers that query them (`getrusage(RUSAGE_CHILDREN)`) must do so after
//! [`Supervisor::run`] returns and before reaping any other child.

mod command;
pub mod deadline;
mod disposition;
mod error;
mod io_counters;
mod launcher;
mod supervise;
mod wait;

pub use command::CommandSpec;
pub use disposition::ExitDisposition;
pub use error::{Result, SupervisorError};
pub use io_counters::ProcessIOCounters;
pub use launcher::{EXIT_EXEC_FAILED, ForkExec, Launcher};
pub use nix::errno::Errno;
pub use nix::unistd::Pid;
pub use supervise::{ExecutionResult, Outcome, Supervisor, supervise};
