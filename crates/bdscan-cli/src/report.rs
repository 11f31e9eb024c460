use std::fmt;
use std::sync::Arc;

use bdscan_core::listing::reported_size;
use bdscan_core::timefmt::format_hms;
use bdscan_core::{Playlist, ScanResult};
use chrono::{DateTime, Local};
use indicatif::HumanCount;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct PlaylistReport {
    pub name: String,
    pub length: String,
    pub size: Option<u64>,
    pub measured_bytes: u64,
    pub packet_count: u64,
    /// Bits per second over the playlist length.
    pub bitrate: u64,
    pub stream_files: Vec<String>,
}

fn bitrate(measured_bytes: u64, length_secs: f64) -> u64 {
    if length_secs > 0.0 {
        (measured_bytes as f64 * 8.0 / length_secs).round() as u64
    } else {
        0
    }
}

#[derive(Debug, Serialize)]
pub struct FileErrorReport {
    pub file: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct ScanReport {
    pub generated: DateTime<Local>,
    pub scan_seconds: f64,
    pub total_bytes: u64,
    pub playlists: Vec<PlaylistReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub file_errors: Vec<FileErrorReport>,
}

impl ScanReport {
    pub fn generate(playlists: &[Arc<Playlist>], result: &ScanResult, enable_ssif: bool) -> Self {
        Self {
            generated: Local::now(),
            scan_seconds: result.duration.as_secs_f64(),
            total_bytes: result.total_bytes,
            playlists: playlists
                .iter()
                .map(|playlist| {
                    let tally = playlist.tally();
                    PlaylistReport {
                        name: playlist.name.clone(),
                        length: format_hms(playlist.length()),
                        size: reported_size(playlist, enable_ssif),
                        measured_bytes: tally.measured_bytes,
                        packet_count: tally.packet_count,
                        bitrate: bitrate(tally.measured_bytes, playlist.total_length),
                        stream_files: playlist
                            .stream_files()
                            .iter()
                            .map(|f| f.name.clone())
                            .collect(),
                    }
                })
                .collect(),
            file_errors: result
                .file_errors
                .iter()
                .map(|failure| FileErrorReport {
                    file: failure.file.clone(),
                    error: failure.error.to_string(),
                })
                .collect(),
        }
    }
}

impl fmt::Display for ScanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Report Generated: {}", self.generated.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(f, "Scan Time: {:.2}s", self.scan_seconds)?;
        writeln!(f, "Scanned Bytes: {}", HumanCount(self.total_bytes))?;

        for playlist in &self.playlists {
            writeln!(f)?;
            writeln!(f, "Playlist: {}", playlist.name)?;
            match playlist.size {
                Some(size) => writeln!(f, "Size: {} bytes", HumanCount(size))?,
                None => writeln!(f, "Size: -")?,
            }
            writeln!(f, "Length: {}", playlist.length)?;
            writeln!(f, "Measured: {} bytes", HumanCount(playlist.measured_bytes))?;
            writeln!(
                f,
                "Total Bitrate: {:.2} Mbps",
                playlist.bitrate as f64 / 1_000_000.0
            )?;
            writeln!(f, "Stream Files: {}", playlist.stream_files.join(" + "))?;
        }

        if !self.file_errors.is_empty() {
            writeln!(f)?;
            writeln!(f, "Errors:")?;
            for failure in &self.file_errors {
                writeln!(f, "{}: {}", failure.file, failure.error)?;
            }
        }
        Ok(())
    }
}
