use std::fmt;
use std::io::{self, Write};

use supervisor::{ExecutionResult, ProcessIOCounters};

use crate::units::{format_duration, format_memory};
use crate::usage::ResourceUsage;

const LABEL_WIDTH: usize = 32;

/// Rendered report. The text is the same whatever sink it is written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    lines: Vec<String>,
}

impl Report {
    /// One entry per informational line, without the line terminator.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{self}")?;
        out.flush()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Blank line separates the report from whatever the child printed.
        writeln!(f)?;
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Build the report. Pure: identical inputs give identical text.
///
/// Non-verbose reports carry memory and runtime only. Verbose reports add
/// CPU times, faults, block I/O and context switches, plus the byte counters
/// when `io` is present.
pub fn format(
    result: &ExecutionResult,
    usage: &ResourceUsage,
    io: Option<&ProcessIOCounters>,
    verbose: bool,
) -> Report {
    let mut lines = vec![
        line("Memory used", format_memory(usage.max_rss_kb)),
        line("Runtime", format_duration(result.elapsed)),
    ];

    if verbose {
        lines.extend([
            line("CPU time used in user mode", format_duration(usage.user_time)),
            line("CPU time used in system mode", format_duration(usage.system_time)),
            line("Page reclaims (soft page faults)", usage.minor_faults),
            line("Page faults (hard page faults)", usage.major_faults),
            line("Number of input blocks", usage.block_inputs),
            line("Number of output blocks", usage.block_outputs),
            line("Voluntary context switches", usage.voluntary_switches),
            line("Involuntary context switches", usage.involuntary_switches),
        ]);

        if let Some(io) = io {
            lines.extend([
                line("Bytes read", io.bytes_read_total),
                line("Bytes read from storage", io.bytes_read_from_storage),
                line("Bytes written", io.bytes_written_total),
                line("Bytes written to storage", io.bytes_written_to_storage),
            ]);
        }
    }

    Report { lines }
}

fn line(label: &str, value: impl fmt::Display) -> String {
    format!("{label:<LABEL_WIDTH$} --> {value}")
}
