use std::time::Duration;

use crate::error::{Error, FileScanError, ScanError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    Idle,
    Preparing,
    Running,
    Succeeded,
    Failed,
}

impl ScanPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, ScanPhase::Succeeded | ScanPhase::Failed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The global error is set: nothing in the result can be trusted.
    Incomplete,
    Success,
    /// Ran to completion but some files failed. A warning, not an error.
    PartialSuccess,
}

#[derive(Debug)]
pub struct FileFailure {
    pub file: String,
    pub error: FileScanError,
}

/// Aggregate of one scan attempt.
///
/// A fresh result carries the `NotRun` sentinel as its global error, and
/// `StillRunning` while the engine works, so an empty failure list alone
/// never means success.
#[derive(Debug)]
pub struct ScanResult {
    pub phase: ScanPhase,
    pub scan_error: Option<ScanError>,
    /// In file-processing order.
    pub file_errors: Vec<FileFailure>,
    pub total_bytes: u64,
    pub finished_bytes: u64,
    pub files_scanned: usize,
    pub duration: Duration,
}

impl Default for ScanResult {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanResult {
    pub fn new() -> Self {
        Self {
            phase: ScanPhase::Idle,
            scan_error: Some(ScanError::NotRun),
            file_errors: Vec::new(),
            total_bytes: 0,
            finished_bytes: 0,
            files_scanned: 0,
            duration: Duration::ZERO,
        }
    }

    pub(crate) fn begin(&mut self) {
        self.phase = ScanPhase::Preparing;
        self.scan_error = Some(ScanError::StillRunning);
        self.file_errors.clear();
    }

    pub(crate) fn fail(&mut self, error: ScanError) {
        self.phase = ScanPhase::Failed;
        self.scan_error = Some(error);
    }

    pub(crate) fn record_file_error(&mut self, file: &str, error: FileScanError) {
        self.file_errors.push(FileFailure {
            file: file.to_string(),
            error,
        });
    }

    pub(crate) fn complete(&mut self) {
        self.scan_error = None;
        self.phase = ScanPhase::Succeeded;
    }

    pub fn outcome(&self) -> ScanOutcome {
        if self.scan_error.is_some() {
            ScanOutcome::Incomplete
        } else if self.file_errors.is_empty() {
            ScanOutcome::Success
        } else {
            ScanOutcome::PartialSuccess
        }
    }

    pub fn file_error(&self, file: &str) -> Option<&FileScanError> {
        self.file_errors
            .iter()
            .find(|f| f.file == file)
            .map(|f| &f.error)
    }

    /// Converts the global error into a `Result` for callers that only
    /// proceed on a completed run.
    pub fn into_completed(self) -> Result<Self, Error> {
        match self.scan_error {
            Some(error) => Err(error.into()),
            None => Ok(self),
        }
    }
}
