use nix::errno::Errno;
use nix::sys::wait::{self, Id, WaitPidFlag};
use nix::unistd::Pid;

use crate::disposition::ExitDisposition;
use crate::error::{Result, SupervisorError};

/// Block until the child has terminated without reaping it, so its PID and
/// `/proc` entry stay valid.
pub(crate) fn observe_exit(pid: Pid) -> Result<()> {
    loop {
        match wait::waitid(Id::Pid(pid), WaitPidFlag::WEXITED | WaitPidFlag::WNOWAIT) {
            Ok(_) => return Ok(()),
            Err(Errno::EINTR) => {}
            Err(errno) => return Err(wait_error(pid, errno)),
        }
    }
}

/// Reap the child and decode its status. After this returns the PID may be
/// reused by the system.
pub(crate) fn reap(pid: Pid) -> Result<ExitDisposition> {
    loop {
        match wait::waitpid(pid, None) {
            Ok(status) => {
                if let Some(disposition) = ExitDisposition::from_wait_status(status) {
                    return Ok(disposition);
                }
            }
            Err(Errno::EINTR) => {}
            Err(errno) => return Err(wait_error(pid, errno)),
        }
    }
}

fn wait_error(pid: Pid, errno: Errno) -> SupervisorError {
    SupervisorError::Wait {
        pid: pid.as_raw(),
        errno,
    }
}
