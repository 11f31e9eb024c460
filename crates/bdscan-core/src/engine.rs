use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, trace, warn};

use crate::config::AppConfig;
use crate::error::{FileScanError, ScanError};
use crate::model::{Playlist, StreamFile};
use crate::progress::{ProgressReporter, ProgressUpdate};
use crate::result::{ScanPhase, ScanResult};
use crate::scan_set::ScanSet;
use crate::scanner::StreamScanner;
use crate::state::ScanState;

/// Drives a sequential scan of a [`ScanSet`].
///
/// Files are scanned one at a time on a worker thread while an observer
/// thread reports progress every `progress_interval`. A failing file is
/// recorded in the result and the run moves on to the next one.
pub struct ScanEngine<S: StreamScanner> {
    config: AppConfig,
    scanner: S,
}

impl<S: StreamScanner> ScanEngine<S> {
    pub fn new(config: AppConfig, scanner: S) -> Self {
        Self { config, scanner }
    }

    pub fn scanner(&self) -> &S {
        &self.scanner
    }

    /// Runs the full scan: probe sizes, then scan every file in order.
    pub fn run(&self, scan_set: &ScanSet, reporter: &dyn ProgressReporter) -> ScanResult {
        let started = Instant::now();
        let mut result = ScanResult::new();
        result.begin();

        info!("Preparing to analyze {} stream files", scan_set.len());
        for planned in &scan_set.plan {
            debug!("{}", planned.describe());
        }
        reporter.on_prepare(scan_set);

        let state = match self.prepare(scan_set) {
            Ok(state) => state,
            Err(err) => {
                error!("Scan setup failed: {}", err);
                result.fail(err);
                result.duration = started.elapsed();
                reporter.on_scan_complete(&result);
                return result;
            }
        };

        result.phase = ScanPhase::Running;
        result.total_bytes = state.total_bytes();
        debug!(
            "Scanning {} files, {} bytes total",
            state.files().len(),
            state.total_bytes()
        );
        reporter.on_scan_start(state.files().len(), state.total_bytes());

        thread::scope(|scope| {
            let (stop_tx, stop_rx) = mpsc::channel::<()>();
            let interval = self.config.progress_interval();
            let state_ref = &state;
            let observer = thread::Builder::new()
                .name("scan-progress".to_string())
                .spawn_scoped(scope, move || observe(state_ref, reporter, stop_rx, interval));
            if let Err(err) = &observer {
                warn!("Unable to start progress observer: {}", err);
            }

            let total_files = state.files().len();
            for (index, file) in state.files().iter().enumerate() {
                state.set_current(Some(index));
                reporter.on_file_start(file, index, total_files);

                let outcome = self.scan_file(file, scan_set.dependents(&file.name));

                state.finish_file(index);
                result.files_scanned += 1;
                match outcome {
                    Ok(()) => {
                        trace!("Scanned {}", file.name);
                        reporter.on_file_complete(file, None);
                    }
                    Err(err) => {
                        warn!("Error scanning {}: {}", file.name, err);
                        reporter.on_file_complete(file, Some(&err));
                        result.record_file_error(&file.name, err);
                    }
                }
            }
            state.set_current(None);

            drop(stop_tx);
            if let Ok(observer) = observer {
                let _ = observer.join();
            }
        });

        result.finished_bytes = state.finished_bytes();
        result.duration = started.elapsed();
        result.complete();

        info!(
            "Scan finished in {:.2}s with {} file errors",
            result.duration.as_secs_f64(),
            result.file_errors.len()
        );
        reporter.on_scan_complete(&result);
        result
    }

    fn prepare(&self, scan_set: &ScanSet) -> Result<ScanState, ScanError> {
        if scan_set.is_empty() {
            return Err(ScanError::EmptyScanSet);
        }

        let sizes = scan_set
            .files
            .iter()
            .map(|file| self.scanner.probe_size(file, self.config.enable_ssif))
            .collect::<Result<Vec<u64>, ScanError>>()?;

        Ok(ScanState::new(scan_set.files.clone(), sizes))
    }

    /// Scans one file on its own thread, waiting in bounded slices so a stuck
    /// worker still shows up in the trace log.
    fn scan_file(
        &self,
        file: &StreamFile,
        dependents: &[Arc<Playlist>],
    ) -> Result<(), FileScanError> {
        let (tx, rx) = mpsc::channel();
        let poll = self.config.poll_interval();

        thread::scope(|scope| {
            let worker = thread::Builder::new()
                .name(format!("scan-{}", file.name))
                .spawn_scoped(scope, move || {
                    let _ = tx.send(self.scanner.scan(file, dependents));
                })?;

            loop {
                match rx.recv_timeout(poll) {
                    Ok(outcome) => {
                        let _ = worker.join();
                        return outcome;
                    }
                    Err(RecvTimeoutError::Timeout) => {
                        trace!("Still scanning {}", file.name);
                    }
                    Err(RecvTimeoutError::Disconnected) => {
                        let message = match worker.join() {
                            Err(payload) => panic_message(&*payload),
                            Ok(()) => "worker exited without a result".to_string(),
                        };
                        return Err(FileScanError::WorkerPanicked(message));
                    }
                }
            }
        })
    }
}

fn observe(
    state: &ScanState,
    reporter: &dyn ProgressReporter,
    stop: Receiver<()>,
    interval: Duration,
) {
    while let Err(RecvTimeoutError::Timeout) = stop.recv_timeout(interval) {
        let tick = || {
            let update = ProgressUpdate::from_snapshot(&state.snapshot());
            reporter.on_progress(&update);
        };
        // A failed tick is dropped, the next one still runs.
        if panic::catch_unwind(AssertUnwindSafe(tick)).is_err() {
            debug!("Progress tick panicked, update dropped");
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
