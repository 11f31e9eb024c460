use std::sync::{Arc, Mutex};

use bdscan_core::{ProgressReporter, ProgressUpdate, ScanResult, ScanSet};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// The status bar currently drawn on stderr, if any.
///
/// Shared with the console log writer so log lines are printed with the bar
/// suspended instead of being mixed into it.
#[derive(Clone, Default)]
pub struct SharedBar(Arc<Mutex<Option<ProgressBar>>>);

impl SharedBar {
    pub fn current(&self) -> Option<ProgressBar> {
        self.0.lock().ok().and_then(|guard| guard.clone())
    }

    fn replace(&self, pb: ProgressBar) {
        if let Ok(mut guard) = self.0.lock() {
            if let Some(old) = guard.replace(pb) {
                old.finish_and_clear();
            }
        }
    }

    fn finish(&self) {
        let pb = self.0.lock().ok().and_then(|mut guard| guard.take());
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }
    }
}

/// CLI progress reporter.
///
/// Prints the scan plan, then keeps one status line on stderr that the
/// engine's observer refreshes once per tick. Per-file failures reach the
/// terminal through the log writer.
#[derive(Default)]
pub struct CliReporter {
    bar: SharedBar,
}

impl CliReporter {
    pub fn new(bar: SharedBar) -> Self {
        Self { bar }
    }
}

impl ProgressReporter for CliReporter {
    fn on_prepare(&self, scan_set: &ScanSet) {
        eprintln!("Preparing to analyze the following:");
        for planned in &scan_set.plan {
            eprintln!("{}", planned.describe());
        }
    }

    fn on_scan_start(&self, _total_files: usize, _total_bytes: u64) {
        eprintln!("\n{:16}{:<15}{:<13}{}", "", "File", "Elapsed", "Remaining");

        let pb = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
        if let Ok(style) = ProgressStyle::with_template("{msg}") {
            pb.set_style(style);
        }
        self.bar.replace(pb);
    }

    fn on_progress(&self, update: &ProgressUpdate) {
        if let Some(pb) = self.bar.current() {
            pb.set_message(update.to_string());
        }
    }

    fn on_scan_complete(&self, _result: &ScanResult) {
        self.bar.finish();
        eprintln!();
    }
}
