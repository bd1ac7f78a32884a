use std::path::PathBuf;

use nix::unistd::Pid;

/// Per-process I/O accounting from `/proc/<pid>/io`.
///
/// Only readable while the PID still names the child, i.e. before it is
/// reaped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessIOCounters {
    /// `rchar`: bytes passed to read-like syscalls, cache hits included.
    pub bytes_read_total: u64,
    /// `read_bytes`: bytes actually fetched from the storage layer.
    pub bytes_read_from_storage: u64,
    /// `wchar`: bytes passed to write-like syscalls.
    pub bytes_written_total: u64,
    /// `write_bytes`: bytes sent to the storage layer.
    pub bytes_written_to_storage: u64,
    /// `cancelled_write_bytes`: storage writes undone by truncation.
    pub bytes_written_cancelled: u64,
}

impl ProcessIOCounters {
    pub fn read(pid: Pid) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(proc_io_path(pid))?;
        Self::parse(&content).ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("unexpected /proc/{pid}/io layout"),
            )
        })
    }

    /// Parse the `key: value` table. Unknown keys (`syscr`, `syscw`) are
    /// ignored; all five counters above must be present.
    pub fn parse(content: &str) -> Option<Self> {
        let mut rchar = None;
        let mut read_bytes = None;
        let mut wchar = None;
        let mut write_bytes = None;
        let mut cancelled = None;

        for line in content.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let Ok(value) = value.trim().parse::<u64>() else {
                continue;
            };
            match key.trim() {
                "rchar" => rchar = Some(value),
                "read_bytes" => read_bytes = Some(value),
                "wchar" => wchar = Some(value),
                "write_bytes" => write_bytes = Some(value),
                "cancelled_write_bytes" => cancelled = Some(value),
                _ => {}
            }
        }

        Some(Self {
            bytes_read_total: rchar?,
            bytes_read_from_storage: read_bytes?,
            bytes_written_total: wchar?,
            bytes_written_to_storage: write_bytes?,
            bytes_written_cancelled: cancelled?,
        })
    }
}

fn proc_io_path(pid: Pid) -> PathBuf {
    PathBuf::from(format!("/proc/{pid}/io"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
rchar: 323934931
wchar: 323929600
syscr: 632687
syscw: 632675
read_bytes: 4096
write_bytes: 323932160
cancelled_write_bytes: 12
";

    #[test]
    fn parse_full_table() {
        let io = ProcessIOCounters::parse(SAMPLE).unwrap();
        assert_eq!(
            io,
            ProcessIOCounters {
                bytes_read_total: 323_934_931,
                bytes_read_from_storage: 4096,
                bytes_written_total: 323_929_600,
                bytes_written_to_storage: 323_932_160,
                bytes_written_cancelled: 12,
            }
        );
    }

    #[test]
    fn parse_missing_key_is_none() {
        let truncated = SAMPLE.replace("cancelled_write_bytes: 12\n", "");
        assert!(ProcessIOCounters::parse(&truncated).is_none());
    }

    #[test]
    fn parse_skips_garbage_lines() {
        let noisy = format!("garbage\nrchar: not-a-number\n{SAMPLE}");
        let io = ProcessIOCounters::parse(&noisy).unwrap();
        assert_eq!(io.bytes_read_total, 323_934_931);
    }

    #[test]
    fn read_self_when_available() {
        let pid = nix::unistd::getpid();
        if !proc_io_path(pid).exists() {
            // Kernel built without task I/O accounting.
            return;
        }
        ProcessIOCounters::read(pid).unwrap();
    }

    #[test]
    fn read_missing_pid_fails() {
        // PID numbers above pid_max are never assigned.
        let err = ProcessIOCounters::read(Pid::from_raw(i32::MAX)).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }
}
