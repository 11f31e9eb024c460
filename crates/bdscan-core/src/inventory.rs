use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use ahash::AHashMap;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, InventoryError};
use crate::model::{Playlist, StreamClip, StreamFile};

/// Every playlist found on a disc, keyed by upper-case name.
#[derive(Debug, Default)]
pub struct DiscInventory {
    playlists: BTreeMap<String, Arc<Playlist>>,
}

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    streams: Vec<StreamEntry>,
    #[serde(default)]
    playlists: Vec<PlaylistEntry>,
}

#[derive(Debug, Deserialize)]
struct StreamEntry {
    name: String,
    size: u64,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    interleaved: Option<InterleavedEntry>,
}

#[derive(Debug, Deserialize)]
struct InterleavedEntry {
    name: String,
    size: u64,
}

#[derive(Debug, Deserialize)]
struct PlaylistEntry {
    name: String,
    #[serde(default = "default_valid")]
    valid: bool,
    #[serde(default)]
    length_secs: f64,
    #[serde(default)]
    file_size: u64,
    #[serde(default)]
    interleaved_file_size: u64,
    #[serde(default)]
    total_angle_size: u64,
    #[serde(default)]
    hidden_tracks: bool,
    clips: Vec<String>,
}

fn default_valid() -> bool {
    true
}

impl DiscInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_playlists(playlists: impl IntoIterator<Item = Playlist>) -> Self {
        let mut inventory = Self::new();
        for playlist in playlists {
            inventory.insert(playlist);
        }
        inventory
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path).map_err(|source| InventoryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let inventory = Self::from_json(&text)?;
        debug!(
            "Loaded {} playlists from {}",
            inventory.len(),
            path.display()
        );
        Ok(inventory)
    }

    /// Builds the inventory from a JSON manifest, linking every clip to the
    /// single shared [`StreamFile`] of the same name.
    pub fn from_json(text: &str) -> Result<Self, InventoryError> {
        let manifest: Manifest = serde_json::from_str(text)?;

        let mut streams: AHashMap<String, Arc<StreamFile>> = AHashMap::new();
        for entry in manifest.streams {
            let key = entry.name.to_uppercase();
            let mut file = StreamFile::new(key.clone(), entry.size);
            if let Some(display_name) = entry.display_name {
                file.display_name = display_name;
            }
            if let Some(ssif) = entry.interleaved {
                file = file.with_interleaved(ssif.name.to_uppercase(), ssif.size);
            }
            if streams.insert(key.clone(), Arc::new(file)).is_some() {
                return Err(InventoryError::Duplicate {
                    kind: "stream",
                    name: key,
                });
            }
        }

        let mut inventory = Self::new();
        for entry in manifest.playlists {
            let name = entry.name.to_uppercase();
            let clips = entry
                .clips
                .iter()
                .map(|clip| {
                    streams
                        .get(&clip.to_uppercase())
                        .map(|file| StreamClip::new(Arc::clone(file)))
                        .ok_or_else(|| InventoryError::UnknownStream {
                            playlist: name.clone(),
                            stream: clip.clone(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;

            let mut playlist = Playlist::new(name.clone(), clips);
            playlist.is_valid = entry.valid;
            playlist.total_length = entry.length_secs;
            playlist.file_size = entry.file_size;
            playlist.interleaved_file_size = entry.interleaved_file_size;
            playlist.total_angle_size = entry.total_angle_size;
            playlist.has_hidden_tracks = entry.hidden_tracks;

            if inventory.playlists.contains_key(&name) {
                return Err(InventoryError::Duplicate {
                    kind: "playlist",
                    name,
                });
            }
            inventory.insert(playlist);
        }

        Ok(inventory)
    }

    /// Adds a playlist, replacing any existing one with the same name.
    pub fn insert(&mut self, playlist: Playlist) -> Arc<Playlist> {
        let playlist = Arc::new(playlist);
        self.playlists
            .insert(playlist.name.to_uppercase(), Arc::clone(&playlist));
        playlist
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Playlist>> {
        self.playlists.get(&name.to_uppercase())
    }

    pub fn playlists(&self) -> impl Iterator<Item = &Arc<Playlist>> {
        self.playlists.values()
    }

    pub fn len(&self) -> usize {
        self.playlists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.playlists.is_empty()
    }

    /// Resets computed bitrates on every playlist of the disc.
    pub fn clear_bitrates(&self) {
        for playlist in self.playlists.values() {
            playlist.clear_bitrates();
        }
    }
}
