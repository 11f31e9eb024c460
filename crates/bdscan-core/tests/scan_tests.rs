use std::collections::HashSet;
use std::io;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use bdscan_core::{
    build_scan_set, AppConfig, DiscInventory, FileScanError, NullScanner, Playlist,
    ProgressReporter, ProgressUpdate, ScanEngine, ScanError, ScanOutcome, ScanPhase, ScanResult,
    SilentReporter, StreamClip, StreamFile, StreamScanner,
};

fn clips(files: &[&Arc<StreamFile>]) -> Vec<StreamClip> {
    files.iter().map(|f| StreamClip::new(Arc::clone(f))).collect()
}

fn test_config() -> AppConfig {
    AppConfig {
        enable_ssif: true,
        progress_interval_ms: 10,
        poll_interval_ms: 5,
    }
}

/// Records every call; fails or panics on the configured files.
#[derive(Default)]
struct RecordingScanner {
    fail: HashSet<String>,
    panic_on: HashSet<String>,
    probe_fail: HashSet<String>,
    delay: Duration,
    calls: Mutex<Vec<(String, usize)>>,
}

impl RecordingScanner {
    fn calls(&self) -> Vec<(String, usize)> {
        self.calls.lock().unwrap().clone()
    }
}

impl StreamScanner for RecordingScanner {
    fn probe_size(&self, file: &StreamFile, enable_ssif: bool) -> Result<u64, ScanError> {
        if self.probe_fail.contains(&file.name) {
            return Err(ScanError::SizeProbe {
                file: file.name.clone(),
                source: io::Error::new(io::ErrorKind::NotFound, "missing"),
            });
        }
        Ok(file.effective_size(enable_ssif))
    }

    fn scan(&self, file: &StreamFile, dependents: &[Arc<Playlist>]) -> Result<(), FileScanError> {
        self.calls
            .lock()
            .unwrap()
            .push((file.name.clone(), dependents.len()));
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        if self.panic_on.contains(&file.name) {
            panic!("demuxer blew up on {}", file.name);
        }
        if self.fail.contains(&file.name) {
            return Err(FileScanError::Format(format!("bad sync byte in {}", file.name)));
        }
        for playlist in dependents {
            playlist.record_scan(file.size, file.size / 192);
        }
        Ok(())
    }
}

#[derive(Default)]
struct CollectingReporter {
    updates: Mutex<Vec<ProgressUpdate>>,
    started: Mutex<Vec<String>>,
    completed: Mutex<Vec<(String, bool)>>,
}

impl ProgressReporter for CollectingReporter {
    fn on_file_start(&self, file: &StreamFile, _index: usize, _total_files: usize) {
        self.started.lock().unwrap().push(file.name.clone());
    }

    fn on_progress(&self, update: &ProgressUpdate) {
        self.updates.lock().unwrap().push(update.clone());
    }

    fn on_file_complete(&self, file: &StreamFile, error: Option<&FileScanError>) {
        self.completed
            .lock()
            .unwrap()
            .push((file.name.clone(), error.is_none()));
    }
}

struct PanickingReporter;

impl ProgressReporter for PanickingReporter {
    fn on_progress(&self, _update: &ProgressUpdate) {
        panic!("terminal went away");
    }
}

/// A: 00001, 00002, 00003; B: 00001, 00002; C (not selected): 00002.
fn build_disc() -> (DiscInventory, Vec<Arc<Playlist>>) {
    let f1 = Arc::new(StreamFile::new("00001.M2TS", 1_000));
    let f2 = Arc::new(StreamFile::new("00002.M2TS", 2_000).with_interleaved("00002.SSIF", 2_500));
    let f3 = Arc::new(StreamFile::new("00003.M2TS", 3_000));

    let mut inventory = DiscInventory::new();
    let a = inventory.insert(Playlist::new("A", clips(&[&f1, &f2, &f3])));
    let b = inventory.insert(Playlist::new("B", clips(&[&f2, &f1])));
    inventory.insert(Playlist::new("C", clips(&[&f2])));
    (inventory, vec![a, b])
}

fn names(files: &[Arc<StreamFile>]) -> Vec<&str> {
    files.iter().map(|f| f.name.as_str()).collect()
}

#[test]
fn test_scan_set_first_encountered_order() {
    let (inventory, selected) = build_disc();
    let scan_set = build_scan_set(&selected, &inventory);
    assert_eq!(
        names(&scan_set.files),
        vec!["00001.M2TS", "00002.M2TS", "00003.M2TS"]
    );
}

#[test]
fn test_scan_set_dedup_across_many_playlists() {
    let files: Vec<Arc<StreamFile>> = (1..=4)
        .map(|i| Arc::new(StreamFile::new(format!("0000{}.M2TS", i), i * 10)))
        .collect();
    let mut inventory = DiscInventory::new();
    let selected: Vec<Arc<Playlist>> = (0..6)
        .map(|i| {
            let refs: Vec<&Arc<StreamFile>> = files.iter().cycle().skip(i).take(5).collect();
            inventory.insert(Playlist::new(format!("{:05}.MPLS", i), clips(&refs)))
        })
        .collect();

    let scan_set = build_scan_set(&selected, &inventory);
    let unique: HashSet<&str> = names(&scan_set.files).into_iter().collect();
    assert_eq!(unique.len(), scan_set.files.len());
    assert_eq!(scan_set.files.len(), 4);
}

#[test]
fn test_full_scan_byte_accounting() {
    let (inventory, selected) = build_disc();
    let scan_set = build_scan_set(&selected, &inventory);
    let engine = ScanEngine::new(test_config(), RecordingScanner::default());

    let result = engine.run(&scan_set, &SilentReporter);

    assert_eq!(result.outcome(), ScanOutcome::Success);
    assert_eq!(result.phase, ScanPhase::Succeeded);
    assert!(result.scan_error.is_none());
    // 00002 is weighted by its interleaved companion.
    assert_eq!(result.total_bytes, 1_000 + 2_500 + 3_000);
    assert_eq!(result.total_bytes, scan_set.total_bytes(true));
    assert_eq!(result.finished_bytes, result.total_bytes);
    assert_eq!(result.files_scanned, 3);
}

#[test]
fn test_files_scanned_sequentially_with_all_dependents() {
    let (inventory, selected) = build_disc();
    let scan_set = build_scan_set(&selected, &inventory);
    let engine = ScanEngine::new(test_config(), RecordingScanner::default());
    let reporter = CollectingReporter::default();

    engine.run(&scan_set, &reporter);

    // 00002 is shared by A, B and the unselected C.
    assert_eq!(
        engine.scanner().calls(),
        vec![
            ("00001.M2TS".to_string(), 2),
            ("00002.M2TS".to_string(), 3),
            ("00003.M2TS".to_string(), 1),
        ]
    );
    assert_eq!(
        *reporter.started.lock().unwrap(),
        vec!["00001.M2TS", "00002.M2TS", "00003.M2TS"]
    );

    let c = inventory.get("C").unwrap();
    assert_eq!(c.tally().measured_bytes, 2_000);
    assert_eq!(inventory.get("A").unwrap().tally().files_scanned, 3);
}

#[test]
fn test_partial_failure_continues_batch() {
    let (inventory, selected) = build_disc();
    let scan_set = build_scan_set(&selected, &inventory);
    let scanner = RecordingScanner {
        fail: HashSet::from(["00002.M2TS".to_string()]),
        ..Default::default()
    };
    let engine = ScanEngine::new(test_config(), scanner);
    let reporter = CollectingReporter::default();

    let result = engine.run(&scan_set, &reporter);

    assert_eq!(result.outcome(), ScanOutcome::PartialSuccess);
    assert!(result.scan_error.is_none());
    assert_eq!(result.file_errors.len(), 1);
    assert_eq!(result.file_errors[0].file, "00002.M2TS");
    assert!(matches!(
        result.file_error("00002.M2TS"),
        Some(FileScanError::Format(_))
    ));
    assert!(result.file_error("00003.M2TS").is_none());
    assert_eq!(result.finished_bytes, result.total_bytes);
    assert_eq!(engine.scanner().calls().len(), 3);
    assert_eq!(
        *reporter.completed.lock().unwrap(),
        vec![
            ("00001.M2TS".to_string(), true),
            ("00002.M2TS".to_string(), false),
            ("00003.M2TS".to_string(), true),
        ]
    );
}

#[test]
fn test_worker_panic_is_recorded_per_file() {
    let (inventory, selected) = build_disc();
    let scan_set = build_scan_set(&selected, &inventory);
    let scanner = RecordingScanner {
        panic_on: HashSet::from(["00001.M2TS".to_string()]),
        ..Default::default()
    };
    let engine = ScanEngine::new(test_config(), scanner);

    let result = engine.run(&scan_set, &SilentReporter);

    assert_eq!(result.outcome(), ScanOutcome::PartialSuccess);
    match result.file_error("00001.M2TS") {
        Some(FileScanError::WorkerPanicked(message)) => {
            assert!(message.contains("demuxer blew up"))
        }
        other => panic!("expected worker panic, got {:?}", other),
    }
    assert_eq!(engine.scanner().calls().len(), 3);
}

#[test]
fn test_setup_failure_scans_nothing() {
    let (inventory, selected) = build_disc();
    let scan_set = build_scan_set(&selected, &inventory);
    let scanner = RecordingScanner {
        probe_fail: HashSet::from(["00003.M2TS".to_string()]),
        ..Default::default()
    };
    let engine = ScanEngine::new(test_config(), scanner);

    let result = engine.run(&scan_set, &SilentReporter);

    assert_eq!(result.phase, ScanPhase::Failed);
    assert_eq!(result.outcome(), ScanOutcome::Incomplete);
    assert!(matches!(result.scan_error, Some(ScanError::SizeProbe { .. })));
    assert!(result.file_errors.is_empty());
    assert!(engine.scanner().calls().is_empty());
    assert!(result.into_completed().is_err());
}

#[test]
fn test_empty_scan_set_is_setup_failure() {
    let inventory = DiscInventory::new();
    let scan_set = build_scan_set(&[], &inventory);
    let engine = ScanEngine::new(test_config(), NullScanner);

    let result = engine.run(&scan_set, &SilentReporter);
    assert!(matches!(result.scan_error, Some(ScanError::EmptyScanSet)));
}

#[test]
fn test_fresh_result_sentinel() {
    let result = ScanResult::new();
    assert!(matches!(result.scan_error, Some(ScanError::NotRun)));
    assert!(result.file_errors.is_empty());
}

#[test]
fn test_progress_observer_reports_while_scanning() {
    let (inventory, selected) = build_disc();
    let scan_set = build_scan_set(&selected, &inventory);
    let scanner = RecordingScanner {
        delay: Duration::from_millis(60),
        ..Default::default()
    };
    let engine = ScanEngine::new(test_config(), scanner);
    let reporter = CollectingReporter::default();

    let result = engine.run(&scan_set, &reporter);
    assert_eq!(result.outcome(), ScanOutcome::Success);

    let updates = reporter.updates.lock().unwrap();
    assert!(!updates.is_empty());
    for update in updates.iter() {
        assert!((0.0..=1.0).contains(&update.ratio));
        assert!(update.percent <= 100);
        assert!(update.to_string().starts_with("Scanning "));
    }
    assert!(updates.iter().any(|u| u.current_file.is_some()));
}

#[test]
fn test_panicking_reporter_does_not_abort_scan() {
    let (inventory, selected) = build_disc();
    let scan_set = build_scan_set(&selected, &inventory);
    let scanner = RecordingScanner {
        delay: Duration::from_millis(30),
        ..Default::default()
    };
    let engine = ScanEngine::new(test_config(), scanner);

    let result = engine.run(&scan_set, &PanickingReporter);
    assert_eq!(result.outcome(), ScanOutcome::Success);
    assert_eq!(result.finished_bytes, result.total_bytes);
}

#[test]
fn test_rescan_starts_from_cleared_bitrates() {
    let (inventory, selected) = build_disc();
    let engine = ScanEngine::new(test_config(), NullScanner);

    let first = build_scan_set(&selected, &inventory);
    engine.run(&first, &SilentReporter);
    let after_first = inventory.get("A").unwrap().tally();

    let second = build_scan_set(&selected, &inventory);
    engine.run(&second, &SilentReporter);
    assert_eq!(inventory.get("A").unwrap().tally(), after_first);
    assert_eq!(after_first.measured_bytes, 6_000);
}

#[test]
fn test_invalid_playlist_is_never_credited() {
    let (mut inventory, selected) = build_disc();
    let shared = Arc::clone(&selected[0].stream_clips[0].stream_file);
    let mut broken = Playlist::new("D", clips(&[&shared]));
    broken.is_valid = false;
    let broken = inventory.insert(broken);

    let scan_set = build_scan_set(&selected, &inventory);
    let engine = ScanEngine::new(test_config(), RecordingScanner::default());
    engine.run(&scan_set, &SilentReporter);

    assert_eq!(broken.tally().files_scanned, 0);
    assert_eq!(broken.tally().measured_bytes, 0);
    assert_eq!(engine.scanner().calls()[0], ("00001.M2TS".to_string(), 2));
}
