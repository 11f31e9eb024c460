use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bdscan_core::model::SOURCE_PACKET_SIZE;
use bdscan_core::{FileScanError, Playlist, ScanError, StreamFile, StreamScanner};
use tracing::debug;

const READ_BUFFER_SIZE: usize = 192 * 5 * 1024;

/// Reads stream files from an extracted BDMV tree.
///
/// The scan walks each file in source-packet sized chunks and credits every
/// dependent playlist with the bytes and packets it read. Codec analysis is
/// left to a real demuxer.
pub struct FsStreamScanner {
    stream_dir: PathBuf,
    ssif_dir: PathBuf,
}

impl FsStreamScanner {
    pub fn new(bd_path: &Path) -> Self {
        let stream_dir = bd_path.join("BDMV").join("STREAM");
        Self {
            ssif_dir: stream_dir.join("SSIF"),
            stream_dir,
        }
    }

    fn stream_path(&self, file: &StreamFile) -> PathBuf {
        self.stream_dir.join(&file.name)
    }

    fn ssif_path(&self, name: &str) -> PathBuf {
        self.ssif_dir.join(name)
    }
}

fn probe(path: &Path) -> Result<u64, ScanError> {
    fs::metadata(path)
        .map(|m| m.len())
        .map_err(|source| ScanError::SizeProbe {
            file: path.display().to_string(),
            source,
        })
}

impl StreamScanner for FsStreamScanner {
    fn probe_size(&self, file: &StreamFile, enable_ssif: bool) -> Result<u64, ScanError> {
        match &file.interleaved_file {
            Some(ssif) if enable_ssif => probe(&self.ssif_path(&ssif.name)),
            _ => probe(&self.stream_path(file)),
        }
    }

    fn scan(&self, file: &StreamFile, dependents: &[Arc<Playlist>]) -> Result<(), FileScanError> {
        let path = self.stream_path(file);
        let (bytes, packets) = count_source_packets(&path)?;
        if bytes % SOURCE_PACKET_SIZE != 0 {
            return Err(FileScanError::Format(format!(
                "{} is not a whole number of {}-byte source packets ({} bytes)",
                file.name, SOURCE_PACKET_SIZE, bytes
            )));
        }

        debug!("{}: {} bytes, {} packets", file.name, bytes, packets);
        for playlist in dependents {
            playlist.record_scan(bytes, packets);
        }
        Ok(())
    }
}

fn count_source_packets(path: &Path) -> io::Result<(u64, u64)> {
    let mut f = File::open(path)?;
    let mut buffer = vec![0u8; READ_BUFFER_SIZE];
    let mut total: u64 = 0;
    loop {
        let n = f.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        total += n as u64;
    }
    Ok((total, total / SOURCE_PACKET_SIZE))
}
