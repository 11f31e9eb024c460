use std::fmt;
use std::time::Duration;

use indicatif::HumanCount;
use serde::{Serialize, Serializer};

use crate::grouping::PlaylistGroup;
use crate::model::Playlist;
use crate::timefmt;

pub const HIDDEN_TRACKS_NOTICE: &str =
    "(*) Some playlists on this disc have hidden tracks. These tracks are marked with an asterisk.";

/// One row of the playlist selection listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaylistInfo {
    pub index: usize,
    pub group: usize,
    pub name: String,
    #[serde(serialize_with = "serialize_hms")]
    pub length: Duration,
    /// `None` when the playlist reports no size.
    pub size: Option<u64>,
    pub angle_size: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlaylistListing {
    pub playlists: Vec<PlaylistInfo>,
    pub has_hidden_tracks: bool,
}

fn serialize_hms<S: Serializer>(length: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&timefmt::format_hms(*length))
}

fn nonzero(size: u64) -> Option<u64> {
    (size > 0).then_some(size)
}

/// Estimated size shown for a playlist: interleaved size when SSIF accounting
/// is enabled and known, else the primary size, else unknown.
pub fn reported_size(playlist: &Playlist, enable_ssif: bool) -> Option<u64> {
    if enable_ssif && playlist.interleaved_file_size > 0 {
        Some(playlist.interleaved_file_size)
    } else {
        nonzero(playlist.file_size)
    }
}

/// Flattens groups into consecutively indexed rows in group order.
pub fn build_listing(groups: &[PlaylistGroup], enable_ssif: bool) -> PlaylistListing {
    let mut listing = PlaylistListing::default();

    for group in groups {
        for playlist in group.playlists.iter().filter(|p| p.is_valid) {
            listing.has_hidden_tracks |= playlist.has_hidden_tracks;
            listing.playlists.push(PlaylistInfo {
                index: listing.playlists.len() + 1,
                group: group.number,
                name: playlist.name.clone(),
                length: playlist.length(),
                size: reported_size(playlist, enable_ssif),
                angle_size: nonzero(playlist.total_angle_size),
            });
        }
    }

    listing
}

fn size_column(size: Option<u64>) -> String {
    size.map(|bytes| HumanCount(bytes).to_string())
        .unwrap_or_else(|| "-".to_string())
}

impl fmt::Display for PlaylistInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<4}{:<7}{:<15}{:<10}{:<16}{:<16}",
            self.index,
            self.group,
            self.name,
            timefmt::format_hms(self.length),
            size_column(self.size),
            size_column(self.angle_size),
        )
    }
}

impl fmt::Display for PlaylistListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<4}{:<7}{:<15}{:<10}{:<16}{:<16}",
            "#", "Group", "Playlist File", "Length", "Estimated Bytes", "Measured Bytes"
        )?;
        for info in &self.playlists {
            writeln!(f, "{}", info)?;
        }
        if self.has_hidden_tracks {
            writeln!(f)?;
            writeln!(f, "{}", HIDDEN_TRACKS_NOTICE)?;
        }
        Ok(())
    }
}
