use std::path::PathBuf;

use supervisor::{Errno, SupervisorError};
use usage_report::ReporterError;

#[derive(Debug, thiserror::Error)]
pub enum TimezError {
    #[error(transparent)]
    Supervisor(#[from] SupervisorError),

    #[error(transparent)]
    Report(#[from] ReporterError),

    #[error("config error: {0}")]
    Config(String),

    #[error("cannot open output file {}: {source}", path.display())]
    OutputSink {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write report: {0}")]
    Write(#[source] std::io::Error),
}

impl TimezError {
    /// Status timez itself exits with. Follows the shell convention for
    /// commands that cannot be run; everything else is a plain failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Supervisor(SupervisorError::ExecFailed {
                errno: Errno::ENOENT,
                ..
            }) => 127,
            Self::Supervisor(SupervisorError::ExecFailed { .. }) => 126,
            _ => 1,
        }
    }
}

pub type TimezResult<T> = Result<T, TimezError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn exec_failed(errno: Errno) -> TimezError {
        TimezError::Supervisor(SupervisorError::ExecFailed {
            program: "nope".into(),
            errno,
        })
    }

    #[test]
    fn exec_failures_map_to_shell_codes() {
        assert_eq!(exec_failed(Errno::ENOENT).exit_code(), 127);
        assert_eq!(exec_failed(Errno::EACCES).exit_code(), 126);
    }

    #[test]
    fn other_failures_are_one() {
        let fork = TimezError::Supervisor(SupervisorError::ForkFailed(Errno::EAGAIN));
        assert_eq!(fork.exit_code(), 1);
        assert_eq!(TimezError::Report(ReporterError::InvalidScope).exit_code(), 1);
        assert_eq!(TimezError::Config("bad".into()).exit_code(), 1);
    }

    #[test]
    fn sink_error_names_path() {
        let err = TimezError::OutputSink {
            path: PathBuf::from("/nope/report.txt"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.to_string().contains("/nope/report.txt"), "got: {err}");
    }
}
