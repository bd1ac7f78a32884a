//! Wall-clock deadline enforcement.
//!
//! One auxiliary thread sleeps for the deadline and then sends `SIGKILL` to
//! the child. The supervisor disarms (and joins) the timer before it reaps
//! the child, so the PID the timer holds can never belong to a recycled,
//! unrelated process.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use nix::errno::Errno;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use tracing::{debug, warn};

/// Convert a millisecond budget from the command line. Zero or negative
/// values mean "run to natural completion".
pub fn from_millis(ms: i64) -> Option<Duration> {
    u64::try_from(ms)
        .ok()
        .filter(|&ms| ms > 0)
        .map(Duration::from_millis)
}

/// Drop zero-length deadlines.
pub(crate) fn normalize(deadline: Option<Duration>) -> Option<Duration> {
    deadline.filter(|d| !d.is_zero())
}

pub(crate) struct DeadlineTimer {
    disarm: mpsc::Sender<()>,
    handle: JoinHandle<bool>,
}

impl DeadlineTimer {
    pub(crate) fn arm(pid: Pid, deadline: Duration) -> Self {
        let (tx, rx) = mpsc::channel::<()>();
        let handle = thread::spawn(move || match rx.recv_timeout(deadline) {
            Err(RecvTimeoutError::Timeout) => {
                warn!(
                    pid = pid.as_raw(),
                    deadline_ms = deadline.as_millis() as u64,
                    "deadline exceeded, killing child"
                );
                kill_child(pid);
                true
            }
            Ok(()) | Err(RecvTimeoutError::Disconnected) => false,
        });
        Self { disarm: tx, handle }
    }

    /// Stop the timer and wait for its thread. Returns `true` if it fired.
    pub(crate) fn disarm(self) -> bool {
        // The thread may already have fired and dropped its receiver.
        let _ = self.disarm.send(());
        self.handle.join().unwrap_or(false)
    }
}

/// Send `SIGKILL`; a child that is already gone is not an error.
fn kill_child(pid: Pid) {
    match signal::kill(pid, Signal::SIGKILL) {
        Ok(()) => {}
        Err(Errno::ESRCH) => debug!(pid = pid.as_raw(), "child already gone"),
        Err(e) => warn!(pid = pid.as_raw(), error = %e, "failed to kill child"),
    }
}
