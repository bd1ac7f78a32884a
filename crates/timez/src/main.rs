mod app;
mod cli;
mod config;
mod error;
mod sink;

use std::fmt;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use supervisor::ForkExec;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

use crate::cli::Cli;
use crate::error::TimezResult;

struct Elapsed(Instant);

impl FormatTime for Elapsed {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> fmt::Result {
        let d = self.0.elapsed();
        let total_secs = d.as_secs();
        let mins = total_secs / 60;
        let secs = total_secs % 60;
        let millis = d.subsec_millis();
        write!(w, "[{mins:02}:{secs:02}:{millis:03}]")
    }
}

/// Logs go to stderr: stdout belongs to the child and to the report.
fn init_tracing(start: Instant, verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_env("TIMEZ_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_timer(Elapsed(start))
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn run(cli: Cli, start: Instant) -> TimezResult<()> {
    let settings = cli.into_settings()?;
    init_tracing(start, settings.verbose);
    app::run(&settings, ForkExec)
}

fn main() -> ExitCode {
    let start = Instant::now();
    let cli = Cli::parse();

    match run(cli, start) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}
