use std::sync::Arc;

use tracing::warn;

use crate::error::SelectionError;
use crate::grouping::PlaylistGroup;
use crate::inventory::DiscInventory;
use crate::model::Playlist;

/// Resolves requested playlist names (case-insensitive) against the disc.
///
/// Unknown and invalid playlists are skipped with a warning and repeats are
/// dropped, but a request that resolves to nothing is an error.
pub fn select_playlists<S: AsRef<str>>(
    inventory: &DiscInventory,
    names: &[S],
) -> Result<Vec<Arc<Playlist>>, SelectionError> {
    if names.iter().all(|n| n.as_ref().trim().is_empty()) {
        return Err(SelectionError::EmptySelection);
    }

    let mut selected: Vec<Arc<Playlist>> = Vec::new();
    for name in names.iter().map(|n| n.as_ref().trim()).filter(|n| !n.is_empty()) {
        match inventory.get(name) {
            Some(playlist) if !playlist.is_valid => {
                warn!("Playlist {} is not valid, skipping", playlist.name)
            }
            Some(playlist) => {
                if !selected.iter().any(|p| Arc::ptr_eq(p, playlist)) {
                    selected.push(Arc::clone(playlist));
                }
            }
            None => warn!("Playlist {} not found on disc", name),
        }
    }

    if selected.is_empty() {
        return Err(SelectionError::NoMatchingPlaylists {
            requested: names.iter().map(|n| n.as_ref().to_string()).collect(),
        });
    }

    Ok(selected)
}

/// Every listed playlist, in listing order.
pub fn select_whole_disc(groups: &[PlaylistGroup]) -> Vec<Arc<Playlist>> {
    groups
        .iter()
        .flat_map(|group| group.playlists.iter())
        .filter(|p| p.is_valid)
        .cloned()
        .collect()
}

/// Splits a comma separated `--mpls` argument.
pub fn parse_playlist_list(arg: &str) -> Vec<String> {
    arg.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
