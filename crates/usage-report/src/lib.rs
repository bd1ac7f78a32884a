//! Post-exit resource accounting and the textual report.
//!
//! [`collect`] snapshots `getrusage` counters once the supervised child has
//! been reaped; [`format`] turns them, together with the
//! [`supervisor::ExecutionResult`], into a unit-scaled [`Report`].

mod error;
mod report;
pub mod units;
mod usage;

pub use error::{ReporterError, Result};
pub use report::{Report, format};
pub use usage::{ResourceUsage, UsageScope, collect};
