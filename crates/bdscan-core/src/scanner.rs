use std::sync::Arc;

use crate::error::{FileScanError, ScanError};
use crate::model::{Playlist, StreamFile};

/// The per-file stream analysis the engine drives.
///
/// `scan` is called once per stream file, one file at a time, on a worker
/// thread. It reports measurements by updating the dependent playlists.
pub trait StreamScanner: Send + Sync {
    /// Bytes the scan of `file` is weighted by. The default trusts the sizes
    /// recorded in the inventory.
    fn probe_size(&self, file: &StreamFile, enable_ssif: bool) -> Result<u64, ScanError> {
        Ok(file.effective_size(enable_ssif))
    }

    fn scan(&self, file: &StreamFile, dependents: &[Arc<Playlist>]) -> Result<(), FileScanError>;
}

/// Credits each dependent with the recorded size of the file without reading it.
pub struct NullScanner;

impl StreamScanner for NullScanner {
    fn scan(&self, file: &StreamFile, dependents: &[Arc<Playlist>]) -> Result<(), FileScanError> {
        let packets = file.size / crate::model::SOURCE_PACKET_SIZE;
        for playlist in dependents {
            playlist.record_scan(file.size, packets);
        }
        Ok(())
    }
}
