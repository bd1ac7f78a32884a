use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use tracing::debug;
use usage_report::Report;

use crate::error::{TimezError, TimezResult};

/// Where the report goes. Opened before the child starts so that a bad path
/// fails the invocation without running anything.
#[derive(Debug)]
pub enum ReportSink {
    Terminal,
    File { path: PathBuf, file: File },
}

impl ReportSink {
    /// `None` selects stdout. A file is created or truncated.
    pub fn open(path: Option<&Path>) -> TimezResult<Self> {
        let Some(path) = path else {
            return Ok(Self::Terminal);
        };
        let file = File::create(path).map_err(|source| TimezError::OutputSink {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "opened report file");
        Ok(Self::File {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn write(self, report: &Report) -> TimezResult<()> {
        match self {
            Self::Terminal => report
                .write_to(&mut io::stdout().lock())
                .map_err(TimezError::Write),
            Self::File { path, file } => {
                report
                    .write_to(&mut BufWriter::new(file))
                    .map_err(TimezError::Write)?;
                debug!(path = %path.display(), "report written");
                Ok(())
            }
        }
    }
}
