use std::ffi::CString;
use std::io::Read;
use std::os::fd::{AsRawFd, RawFd};

use nix::errno::Errno;
use nix::unistd::{self, ForkResult, Pid};
use tracing::{debug, warn};

use crate::command::CommandSpec;
use crate::error::{Result, SupervisorError};
use crate::wait;

/// Status the child exits with when its image cannot be replaced.
pub const EXIT_EXEC_FAILED: i32 = 127;

/// Creates the child process for a command.
pub trait Launcher {
    /// Start `cmd` and return the child's PID once its image is running.
    fn launch(&self, cmd: &CommandSpec) -> Result<Pid>;
}

/// `fork()` + `execvp()` with a close-on-exec status pipe.
///
/// The pipe's write end disappears on a successful exec, so the parent reads
/// EOF. On failure the child writes its errno first, which lets the parent
/// report [`SupervisorError::ExecFailed`] instead of a plain exit status of
/// [`EXIT_EXEC_FAILED`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ForkExec;

impl Launcher for ForkExec {
    fn launch(&self, cmd: &CommandSpec) -> Result<Pid> {
        // Everything the child touches is allocated before fork(): between
        // fork and exec only async-signal-safe calls are allowed.
        let argv = cmd.to_c_argv()?;
        let Some(program) = argv.first() else {
            return Err(SupervisorError::InvalidCommand("no command specified".into()));
        };
        let mut argv_ptrs: Vec<*const libc::c_char> = argv.iter().map(|a| a.as_ptr()).collect();
        argv_ptrs.push(std::ptr::null());
        let notice = format!("failed to execute {}\n", cmd.program());

        let (mut reader, writer) = std::io::pipe()?;

        // SAFETY: the child branch only calls execvp, write and _exit, all
        // async-signal-safe, on memory prepared above.
        match unsafe { unistd::fork() } {
            Err(errno) => Err(SupervisorError::ForkFailed(errno)),
            Ok(ForkResult::Child) => {
                exec_child(program, &argv_ptrs, notice.as_bytes(), writer.as_raw_fd())
            }
            Ok(ForkResult::Parent { child }) => {
                drop(writer);
                match read_exec_errno(&mut reader) {
                    None => {
                        debug!(pid = child.as_raw(), program = cmd.program(), "exec succeeded");
                        Ok(child)
                    }
                    Some(errno) => {
                        if let Err(e) = wait::reap(child) {
                            warn!(pid = child.as_raw(), error = %e, "failed to reap child after exec failure");
                        }
                        Err(SupervisorError::ExecFailed {
                            program: cmd.program().to_string(),
                            errno,
                        })
                    }
                }
            }
        }
    }
}

fn exec_child(
    program: &CString,
    argv: &[*const libc::c_char],
    notice: &[u8],
    status_fd: RawFd,
) -> ! {
    // SAFETY: program and argv point into CStrings owned by the caller and
    // argv is null-terminated. execvp only returns on failure.
    unsafe {
        libc::execvp(program.as_ptr(), argv.as_ptr());
    }
    let errno = (Errno::last() as i32).to_ne_bytes();
    // SAFETY: write(2) and _exit(2) are async-signal-safe and both buffers
    // are live for the duration of the calls.
    unsafe {
        libc::write(status_fd, errno.as_ptr().cast(), errno.len());
        libc::write(libc::STDERR_FILENO, notice.as_ptr().cast(), notice.len());
        libc::_exit(EXIT_EXEC_FAILED)
    }
}

/// `None` means the pipe hit EOF without data, i.e. exec succeeded.
fn read_exec_errno<R: Read>(reader: &mut R) -> Option<Errno> {
    let mut buf = Vec::with_capacity(4);
    if let Err(e) = reader.read_to_end(&mut buf) {
        warn!(error = %e, "failed to read exec status pipe, assuming exec succeeded");
        return None;
    }
    if buf.is_empty() {
        return None;
    }
    let raw = <[u8; 4]>::try_from(buf.as_slice())
        .map(i32::from_ne_bytes)
        .unwrap_or(0);
    Some(Errno::from_raw(raw))
}
