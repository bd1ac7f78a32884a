use supervisor::{Launcher, Supervisor};
use tracing::{info, warn};
use usage_report::UsageScope;

use crate::cli::Settings;
use crate::error::TimezResult;
use crate::sink::ReportSink;

/// Open the sink, supervise the command, then collect and write the report.
///
/// The child's own exit status only shows up in logs: a command that fails
/// still produces a report and a successful return.
pub fn run<L: Launcher>(settings: &Settings, launcher: L) -> TimezResult<()> {
    if settings.io_counters && !settings.verbose {
        warn!("--io has no effect without --verbose");
    }

    let sink = ReportSink::open(settings.output.as_deref())?;

    let outcome = Supervisor::new()
        .with_launcher(launcher)
        .with_deadline(settings.deadline)
        .verbose(settings.verbose)
        .capture_io(settings.io_counters && settings.verbose)
        .run(&settings.command)?;

    if outcome.result.deadline_expired {
        info!(
            disposition = %outcome.result.disposition,
            "command did not finish before the deadline"
        );
    }

    let usage = usage_report::collect(UsageScope::Children)?;
    let report = usage_report::format(
        &outcome.result,
        &usage,
        outcome.io.as_ref(),
        settings.verbose,
    );
    sink.write(&report)
}
