use std::fmt;
use std::time::Duration;

use crate::error::FileScanError;
use crate::model::StreamFile;
use crate::result::ScanResult;
use crate::scan_set::ScanSet;
use crate::state::ScanSnapshot;
use crate::timefmt::format_hms;

/// Trait for reporting scan progress.
///
/// `on_progress` is called from the observer thread, every other method from
/// the thread running the scan. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_prepare(&self, _scan_set: &ScanSet) {}
    fn on_scan_start(&self, _total_files: usize, _total_bytes: u64) {}
    fn on_file_start(&self, _file: &StreamFile, _index: usize, _total_files: usize) {}
    fn on_progress(&self, _update: &ProgressUpdate) {}
    fn on_file_complete(&self, _file: &StreamFile, _error: Option<&FileScanError>) {}
    fn on_scan_complete(&self, _result: &ScanResult) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}

/// One observer tick.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    pub ratio: f64,
    pub percent: u8,
    pub current_file: Option<String>,
    pub elapsed: Duration,
    pub remaining: Duration,
}

impl ProgressUpdate {
    /// The bytes of the file being scanned are counted as finished, so the
    /// estimate runs one file ahead.
    pub fn from_snapshot(snapshot: &ScanSnapshot) -> Self {
        let finished = snapshot.finished_bytes + snapshot.current_size;
        let ratio = if snapshot.total_bytes == 0 {
            0.0
        } else {
            (finished as f64 / snapshot.total_bytes as f64).clamp(0.0, 1.0)
        };

        let remaining = if ratio > 0.0 && ratio < 1.0 {
            let secs = snapshot.elapsed.as_secs_f64() * (1.0 / ratio - 1.0);
            Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
        } else {
            Duration::ZERO
        };

        Self {
            ratio,
            percent: (ratio * 100.0).round() as u8,
            current_file: snapshot
                .current_file
                .as_ref()
                .map(|f| f.display_name.clone()),
            elapsed: snapshot.elapsed,
            remaining,
        }
    }
}

impl fmt::Display for ProgressUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let elapsed = format_hms(self.elapsed);
        let remaining = format_hms(self.remaining);
        match &self.current_file {
            Some(name) => write!(
                f,
                "Scanning {:>3}% - {:>10} {:>12}  |  {}",
                self.percent, name, elapsed, remaining
            ),
            None => write!(
                f,
                "Scanning {:>3}% - \t{:>10}  |  {}...",
                self.percent, elapsed, remaining
            ),
        }
    }
}
