use std::time::Duration;

pub const TICKS_PER_SECOND: u64 = 10_000_000;

/// Converts fractional seconds to 100 ns ticks. Negative and NaN inputs map to zero.
pub fn seconds_to_ticks(seconds: f64) -> u64 {
    if seconds.is_nan() || seconds <= 0.0 {
        return 0;
    }
    (seconds * TICKS_PER_SECOND as f64) as u64
}

pub fn ticks_to_duration(ticks: u64) -> Duration {
    Duration::new(
        ticks / TICKS_PER_SECOND,
        ((ticks % TICKS_PER_SECOND) * 100) as u32,
    )
}

/// `HH:MM:SS` with total hours; sub-second precision is dropped.
pub fn format_hms(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}
