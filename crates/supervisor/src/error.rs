use nix::errno::Errno;

#[derive(Debug, thiserror::Error)]
pub enum SupervisorError {
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    #[error("failed to fork a new process: {0}")]
    ForkFailed(Errno),

    /// The child was created but could not replace its image. Reported through
    /// the close-on-exec pipe, so it is never confused with a program that
    /// legitimately exits with the reserved status.
    #[error("failed to execute {program}: {errno}")]
    ExecFailed { program: String, errno: Errno },

    #[error("failed to wait for child {pid}: {errno}")]
    Wait { pid: i32, errno: Errno },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SupervisorError>;
