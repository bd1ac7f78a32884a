use std::time::Duration;

use nix::sys::resource::{self, Usage, UsageWho};
use nix::sys::time::{TimeVal, TimeValLike};
use tracing::debug;

use crate::error::Result;

/// Whose counters `getrusage` returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageScope {
    /// All terminated and reaped children of this process, accumulated.
    Children,
    /// This process itself.
    Process,
}

impl From<UsageScope> for UsageWho {
    fn from(scope: UsageScope) -> Self {
        match scope {
            UsageScope::Children => UsageWho::RUSAGE_CHILDREN,
            UsageScope::Process => UsageWho::RUSAGE_SELF,
        }
    }
}

/// One snapshot of kernel resource counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceUsage {
    /// Peak resident set size in kilobytes. For [`UsageScope::Children`] this
    /// is the largest child, not a sum.
    pub max_rss_kb: u64,
    pub user_time: Duration,
    pub system_time: Duration,
    pub minor_faults: u64,
    pub major_faults: u64,
    pub block_inputs: u64,
    pub block_outputs: u64,
    pub voluntary_switches: u64,
    pub involuntary_switches: u64,
}

impl From<Usage> for ResourceUsage {
    fn from(usage: Usage) -> Self {
        Self {
            max_rss_kb: counter(usage.max_rss()),
            user_time: timeval_to_duration(usage.user_time()),
            system_time: timeval_to_duration(usage.system_time()),
            minor_faults: counter(usage.minor_page_faults()),
            major_faults: counter(usage.major_page_faults()),
            block_inputs: counter(usage.block_reads()),
            block_outputs: counter(usage.block_writes()),
            voluntary_switches: counter(usage.voluntary_context_switches()),
            involuntary_switches: counter(usage.involuntary_context_switches()),
        }
    }
}

/// Retrieve the counters for `scope` once.
///
/// With [`UsageScope::Children`], call this only after the supervised child
/// has been reaped and before any other child is: the kernel folds every
/// reaped child into the same totals.
pub fn collect(scope: UsageScope) -> Result<ResourceUsage> {
    let usage = ResourceUsage::from(resource::getrusage(scope.into())?);
    debug!(?scope, ?usage, "collected resource usage");
    Ok(usage)
}

fn counter(value: nix::libc::c_long) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

/// Seconds and microseconds of the `timeval` together.
fn timeval_to_duration(tv: TimeVal) -> Duration {
    Duration::from_micros(u64::try_from(tv.num_microseconds()).unwrap_or(0))
}
