use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;

use crate::timefmt;

/// Size of one BDAV source packet (4-byte header + 188-byte TS packet).
pub const SOURCE_PACKET_SIZE: u64 = 192;

/// Companion file carrying alternate-angle / 3D content for a stream file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterleavedFile {
    pub name: String,
    pub size: u64,
}

/// A physical stream file (`BDMV/STREAM/*.M2TS`). One instance per name,
/// shared by every clip that references it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamFile {
    pub name: String,
    pub display_name: String,
    pub size: u64,
    pub interleaved_file: Option<InterleavedFile>,
}

impl StreamFile {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            size,
            interleaved_file: None,
        }
    }

    pub fn with_interleaved(mut self, name: impl Into<String>, size: u64) -> Self {
        self.interleaved_file = Some(InterleavedFile {
            name: name.into(),
            size,
        });
        self
    }

    /// Bytes a scan of this file is weighted by.
    pub fn effective_size(&self, enable_ssif: bool) -> u64 {
        match &self.interleaved_file {
            Some(ssif) if enable_ssif => ssif.size,
            _ => self.size,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StreamClip {
    pub name: String,
    pub stream_file: Arc<StreamFile>,
}

impl StreamClip {
    pub fn new(stream_file: Arc<StreamFile>) -> Self {
        Self {
            name: stream_file.name.clone(),
            stream_file,
        }
    }
}

/// Measurements accumulated by stream scans on behalf of a playlist.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BitrateTally {
    pub measured_bytes: u64,
    pub packet_count: u64,
    pub files_scanned: usize,
}

#[derive(Debug)]
pub struct Playlist {
    pub name: String,
    pub stream_clips: Vec<StreamClip>,
    pub is_valid: bool,
    /// Total length in seconds.
    pub total_length: f64,
    pub file_size: u64,
    pub interleaved_file_size: u64,
    pub total_angle_size: u64,
    pub has_hidden_tracks: bool,
    tally: Mutex<BitrateTally>,
}

impl Playlist {
    pub fn new(name: impl Into<String>, stream_clips: Vec<StreamClip>) -> Self {
        Self {
            name: name.into(),
            stream_clips,
            is_valid: true,
            total_length: 0.0,
            file_size: 0,
            interleaved_file_size: 0,
            total_angle_size: 0,
            has_hidden_tracks: false,
            tally: Mutex::new(BitrateTally::default()),
        }
    }

    pub fn length(&self) -> Duration {
        timefmt::ticks_to_duration(timefmt::seconds_to_ticks(self.total_length))
    }

    pub fn references_stream(&self, stream_name: &str) -> bool {
        self.stream_clips.iter().any(|clip| clip.name == stream_name)
    }

    /// Distinct stream files in clip order.
    pub fn stream_files(&self) -> Vec<Arc<StreamFile>> {
        let mut files: Vec<Arc<StreamFile>> = Vec::new();
        for clip in &self.stream_clips {
            if !files.iter().any(|f| f.name == clip.stream_file.name) {
                files.push(Arc::clone(&clip.stream_file));
            }
        }
        files
    }

    pub fn tally(&self) -> BitrateTally {
        *self.lock_tally()
    }

    /// Adds the result of scanning one stream file.
    pub fn record_scan(&self, bytes: u64, packets: u64) {
        let mut tally = self.lock_tally();
        tally.measured_bytes += bytes;
        tally.packet_count += packets;
        tally.files_scanned += 1;
    }

    /// Resets computed measurements. Idempotent.
    pub fn clear_bitrates(&self) {
        *self.lock_tally() = BitrateTally::default();
    }

    fn lock_tally(&self) -> MutexGuard<'_, BitrateTally> {
        // Poisoning is ignored, the tally is plain counters.
        self.tally.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
