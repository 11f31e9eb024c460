use std::sync::Arc;

use ahash::{AHashMap, AHashSet};
use tracing::debug;

use crate::inventory::DiscInventory;
use crate::model::{Playlist, StreamFile};

/// Stream files first contributed by one selected playlist.
#[derive(Debug, Clone)]
pub struct PlannedPlaylist {
    pub name: String,
    pub new_files: Vec<String>,
}

impl PlannedPlaylist {
    /// `00800.MPLS --> 00001.M2TS + 00002.M2TS`
    pub fn describe(&self) -> String {
        format!("{} --> {}", self.name, self.new_files.join(" + "))
    }
}

/// The distinct stream files to read for a selection, plus every valid
/// playlist on the disc that depends on each of them.
#[derive(Debug, Default)]
pub struct ScanSet {
    pub files: Vec<Arc<StreamFile>>,
    pub plan: Vec<PlannedPlaylist>,
    dependents: AHashMap<String, Vec<Arc<Playlist>>>,
}

impl ScanSet {
    pub fn dependents(&self, file_name: &str) -> &[Arc<Playlist>] {
        self.dependents
            .get(file_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Sum of effective sizes of the recorded file sizes.
    pub fn total_bytes(&self, enable_ssif: bool) -> u64 {
        self.files.iter().map(|f| f.effective_size(enable_ssif)).sum()
    }
}

/// Builds the scan set for `selected`.
///
/// Bitrates of every inventory playlist are cleared first so a new pass never
/// inherits numbers from an earlier one. Files are deduplicated by name in
/// first-encountered order.
pub fn build_scan_set(selected: &[Arc<Playlist>], inventory: &DiscInventory) -> ScanSet {
    inventory.clear_bitrates();
    for playlist in selected {
        playlist.clear_bitrates();
    }

    let mut seen: AHashSet<String> = AHashSet::new();
    let mut scan_set = ScanSet::default();

    for playlist in selected.iter().filter(|p| p.is_valid) {
        let mut new_files = Vec::new();
        for clip in &playlist.stream_clips {
            let file = &clip.stream_file;
            if seen.insert(file.name.clone()) {
                new_files.push(file.name.clone());
                scan_set.files.push(Arc::clone(file));
            }
        }
        scan_set.plan.push(PlannedPlaylist {
            name: playlist.name.clone(),
            new_files,
        });
    }

    for file in &scan_set.files {
        let mut dependents: Vec<Arc<Playlist>> = Vec::new();
        let candidates = inventory.playlists().chain(selected.iter());
        for playlist in candidates {
            if playlist.is_valid
                && playlist.references_stream(&file.name)
                && !dependents.iter().any(|d| Arc::ptr_eq(d, playlist))
            {
                dependents.push(Arc::clone(playlist));
            }
        }
        scan_set.dependents.insert(file.name.clone(), dependents);
    }

    debug!(
        "Scan set: {} stream files for {} playlists",
        scan_set.files.len(),
        scan_set.plan.len()
    );

    scan_set
}
