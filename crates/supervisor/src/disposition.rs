use std::fmt;

use nix::sys::signal::Signal;
use nix::sys::wait::WaitStatus;

/// How the supervised child ended, decoded once from its raw wait status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitDisposition {
    Exited(i32),
    Signaled(i32),
    Stopped(i32),
}

impl ExitDisposition {
    /// Decode a terminal wait status. Returns `None` for statuses that do not
    /// describe a termination or stop (still alive, continued, ptrace events).
    pub fn from_wait_status(status: WaitStatus) -> Option<Self> {
        match status {
            WaitStatus::Exited(_, code) => Some(Self::Exited(code)),
            WaitStatus::Signaled(_, sig, _) => Some(Self::Signaled(sig as i32)),
            WaitStatus::Stopped(_, sig) => Some(Self::Stopped(sig as i32)),
            _ => None,
        }
    }

    pub fn success(&self) -> bool {
        matches!(self, Self::Exited(0))
    }
}

impl fmt::Display for ExitDisposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exited(code) => write!(f, "exited with status {code}"),
            Self::Signaled(sig) => write!(f, "terminated by signal {}", signal_name(*sig)),
            Self::Stopped(sig) => write!(f, "stopped by signal {}", signal_name(*sig)),
        }
    }
}

fn signal_name(sig: i32) -> String {
    match Signal::try_from(sig) {
        Ok(s) => s.as_str().to_string(),
        Err(_) => sig.to_string(),
    }
}
