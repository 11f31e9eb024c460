use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::model::StreamFile;

const NO_FILE: usize = usize::MAX;

/// Counters for one scan run.
///
/// The engine thread is the only writer. The progress observer reads through
/// [`ScanState::snapshot`] and must accept slightly stale values.
#[derive(Debug)]
pub struct ScanState {
    files: Vec<Arc<StreamFile>>,
    sizes: Vec<u64>,
    total_bytes: u64,
    finished_bytes: AtomicU64,
    current: AtomicUsize,
    started: Instant,
}

/// A point-in-time copy of [`ScanState`].
#[derive(Debug, Clone)]
pub struct ScanSnapshot {
    pub total_bytes: u64,
    pub finished_bytes: u64,
    pub current_file: Option<Arc<StreamFile>>,
    pub current_size: u64,
    pub elapsed: Duration,
}

impl ScanState {
    /// `sizes[i]` is the effective size of `files[i]`.
    pub fn new(files: Vec<Arc<StreamFile>>, sizes: Vec<u64>) -> Self {
        debug_assert_eq!(files.len(), sizes.len());
        let total_bytes = sizes.iter().sum();
        Self {
            files,
            sizes,
            total_bytes,
            finished_bytes: AtomicU64::new(0),
            current: AtomicUsize::new(NO_FILE),
            started: Instant::now(),
        }
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    pub fn finished_bytes(&self) -> u64 {
        self.finished_bytes.load(Ordering::Relaxed)
    }

    pub fn files(&self) -> &[Arc<StreamFile>] {
        &self.files
    }

    pub fn size_of(&self, index: usize) -> u64 {
        self.sizes.get(index).copied().unwrap_or(0)
    }

    pub(crate) fn set_current(&self, index: Option<usize>) {
        self.current
            .store(index.unwrap_or(NO_FILE), Ordering::Release);
    }

    pub(crate) fn finish_file(&self, index: usize) {
        self.finished_bytes
            .fetch_add(self.size_of(index), Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ScanSnapshot {
        self.snapshot_at(Instant::now())
    }

    pub fn snapshot_at(&self, now: Instant) -> ScanSnapshot {
        let current = self.current.load(Ordering::Acquire);
        let current_file = self.files.get(current).cloned();
        ScanSnapshot {
            total_bytes: self.total_bytes,
            finished_bytes: self.finished_bytes(),
            current_size: if current_file.is_some() {
                self.size_of(current)
            } else {
                0
            },
            current_file,
            elapsed: now.saturating_duration_since(self.started),
        }
    }
}
