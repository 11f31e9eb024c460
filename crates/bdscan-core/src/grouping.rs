use std::cmp::Ordering;
use std::sync::Arc;

use tracing::debug;

use crate::model::Playlist;

#[derive(Debug, Clone)]
pub struct PlaylistGroup {
    /// 1-based.
    pub number: usize,
    pub playlists: Vec<Arc<Playlist>>,
}

/// Display order: longest first, ties broken by ascending name.
pub fn compare_playlists(x: &Playlist, y: &Playlist) -> Ordering {
    y.total_length
        .partial_cmp(&x.total_length)
        .unwrap_or(Ordering::Equal)
        .then_with(|| x.name.cmp(&y.name))
}

/// True when the two playlists reference at least one clip of the same name.
pub fn shares_clip(a: &Playlist, b: &Playlist) -> bool {
    a.stream_clips
        .iter()
        .any(|clip_a| b.stream_clips.iter().any(|clip_b| clip_a.name == clip_b.name))
}

/// Clusters valid playlists into groups of playlists sharing stream clips.
///
/// Assignment is first-fit in display order: a playlist joins the first
/// existing group holding any member it shares a clip with, otherwise it opens
/// a new group. Playlists are never moved once placed, so two playlists linked
/// only through a later one may land in different groups.
pub fn group_playlists<'a, I>(playlists: I) -> Vec<PlaylistGroup>
where
    I: IntoIterator<Item = &'a Arc<Playlist>>,
{
    let mut sorted: Vec<Arc<Playlist>> = playlists
        .into_iter()
        .filter(|p| p.is_valid)
        .cloned()
        .collect();
    sorted.sort_by(|x, y| compare_playlists(x, y));

    let mut groups: Vec<Vec<Arc<Playlist>>> = Vec::new();
    for playlist in sorted {
        let matching = groups
            .iter()
            .position(|group| group.iter().any(|member| shares_clip(&playlist, member)));

        match matching {
            Some(index) => groups[index].push(playlist),
            None => groups.push(vec![playlist]),
        }
    }

    debug!("Grouped playlists into {} groups", groups.len());

    groups
        .into_iter()
        .enumerate()
        .map(|(index, mut playlists)| {
            playlists.sort_by(|x, y| compare_playlists(x, y));
            PlaylistGroup {
                number: index + 1,
                playlists,
            }
        })
        .collect()
}
