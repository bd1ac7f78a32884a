use std::time::Duration;

const KB_PER_MB: u64 = 1024;
const US_PER_MS: u64 = 1_000;
const US_PER_S: u64 = 1_000_000;

/// `ru_maxrss` is reported in kilobytes; values above 1024 KB switch to MB.
pub fn format_memory(kb: u64) -> String {
    if kb <= KB_PER_MB {
        return format!("{kb} KB");
    }
    format!("{:.2} MB", kb as f64 / KB_PER_MB as f64)
}

/// Single-unit rendering: `us` below a millisecond, `ms` below a second,
/// `s` otherwise.
pub fn format_micros(us: u64) -> String {
    if us >= US_PER_S {
        return format!("{:.3} s", us as f64 / US_PER_S as f64);
    }
    if us >= US_PER_MS {
        return format!("{:.3} ms", us as f64 / US_PER_MS as f64);
    }
    format!("{us} us")
}

pub fn format_duration(d: Duration) -> String {
    format_micros(u64::try_from(d.as_micros()).unwrap_or(u64::MAX))
}
