use nix::errno::Errno;

/// `getrusage` failures. All of them are fatal: counters are never partially
/// available.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ReporterError {
    #[error("cannot measure resources: counter buffer is not accessible")]
    InaccessibleMemory,

    #[error("cannot measure resources: invalid usage scope")]
    InvalidScope,

    #[error("unknown error while measuring resources: {0}")]
    Unknown(Errno),
}

impl From<Errno> for ReporterError {
    fn from(errno: Errno) -> Self {
        match errno {
            Errno::EFAULT => Self::InaccessibleMemory,
            Errno::EINVAL => Self::InvalidScope,
            other => Self::Unknown(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReporterError>;
