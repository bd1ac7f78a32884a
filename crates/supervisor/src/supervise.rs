use std::time::{Duration, Instant};

use nix::unistd::Pid;
use tracing::{debug, info, warn};

use crate::command::CommandSpec;
use crate::deadline::{self, DeadlineTimer};
use crate::disposition::ExitDisposition;
use crate::error::Result;
use crate::io_counters::ProcessIOCounters;
use crate::launcher::{ForkExec, Launcher};
use crate::wait;

/// Produced once the child is confirmed reaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Monotonic wall-clock time from launch to reap, truncated to microseconds.
    pub elapsed: Duration,
    pub disposition: ExitDisposition,
    /// The deadline timer fired. `disposition` stays the authoritative cause:
    /// the child may have exited on its own just before the kill.
    pub deadline_expired: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub result: ExecutionResult,
    /// Present only when requested and `/proc/<pid>/io` was readable.
    pub io: Option<ProcessIOCounters>,
}

/// Runs one child to completion, optionally under a wall-clock deadline.
#[derive(Debug, Clone)]
pub struct Supervisor<L = ForkExec> {
    launcher: L,
    deadline: Option<Duration>,
    verbose: bool,
    capture_io: bool,
}

impl Supervisor<ForkExec> {
    pub fn new() -> Self {
        Self {
            launcher: ForkExec,
            deadline: None,
            verbose: false,
            capture_io: false,
        }
    }
}

impl Default for Supervisor<ForkExec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Launcher> Supervisor<L> {
    pub fn with_launcher<M: Launcher>(self, launcher: M) -> Supervisor<M> {
        Supervisor {
            launcher,
            deadline: self.deadline,
            verbose: self.verbose,
            capture_io: self.capture_io,
        }
    }

    /// A zero deadline is the same as none.
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline::normalize(deadline);
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Read `/proc/<pid>/io` after the child terminates and before it is reaped.
    pub fn capture_io(mut self, capture: bool) -> Self {
        self.capture_io = capture;
        self
    }

    pub fn run(&self, cmd: &CommandSpec) -> Result<Outcome> {
        if self.verbose {
            announce(cmd);
        }

        let start = Instant::now();
        let pid = self.launcher.launch(cmd)?;
        debug!(pid = pid.as_raw(), command = %cmd, "child started");

        let timer = self.deadline.map(|d| DeadlineTimer::arm(pid, d));

        // Termination is observed without reaping: the timer may still hold
        // the PID, and /proc/<pid>/io is only readable until the reap.
        let observed = wait::observe_exit(pid);
        let io = match observed {
            Ok(()) if self.capture_io => read_io_counters(pid),
            _ => None,
        };
        let deadline_expired = timer.is_some_and(DeadlineTimer::disarm);
        observed?;

        let disposition = wait::reap(pid)?;
        let elapsed = truncate_to_micros(start.elapsed());

        if self.verbose {
            info!(pid = pid.as_raw(), "command {disposition}");
        } else {
            debug!(pid = pid.as_raw(), "command {disposition}");
        }

        Ok(Outcome {
            result: ExecutionResult {
                elapsed,
                disposition,
                deadline_expired,
            },
            io,
        })
    }
}

/// Run `cmd` with the default launcher and no I/O counters.
pub fn supervise(
    cmd: &CommandSpec,
    deadline: Option<Duration>,
    verbose: bool,
) -> Result<ExecutionResult> {
    Supervisor::new()
        .with_deadline(deadline)
        .verbose(verbose)
        .run(cmd)
        .map(|outcome| outcome.result)
}

fn announce(cmd: &CommandSpec) {
    match which::which(cmd.program()) {
        Ok(path) => info!(command = %cmd, resolved = %path.display(), "executing command"),
        Err(_) => info!(command = %cmd, "executing command"),
    }
}

fn read_io_counters(pid: Pid) -> Option<ProcessIOCounters> {
    match ProcessIOCounters::read(pid) {
        Ok(io) => {
            debug!(pid = pid.as_raw(), ?io, "read process io counters");
            Some(io)
        }
        Err(e) => {
            warn!(pid = pid.as_raw(), error = %e, "process io counters unavailable");
            None
        }
    }
}

fn truncate_to_micros(d: Duration) -> Duration {
    Duration::from_micros(u64::try_from(d.as_micros()).unwrap_or(u64::MAX))
}
