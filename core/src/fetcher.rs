/*
    albumsort | Rust CLI tool to sort Spotify playlists by album.
    Copyright (C) 2025  Israel Alberto Roldan Vega

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use crate::api::{ApiError, PlaylistApi};
use crate::models::{ItemKind, PlaylistItem, TrackEntry};
use crate::pagination::paginate;
use futures::stream::TryStreamExt;
use log::{debug, warn};

/// Everything a playlist currently holds, in playlist order.
#[derive(Debug, Clone, Default)]
pub struct FetchedTracks {
    pub entries: Vec<TrackEntry>,
    /// Items without an underlying track. They will not survive a reorder.
    pub skipped: usize,
    /// Podcast episodes among `skipped`.
    pub episodes: usize,
    /// Local files among `skipped`.
    pub local_files: usize,
}

impl FetchedTracks {
    pub fn total_items(&self) -> usize {
        self.entries.len() + self.skipped
    }
}

/// Reads every page of the playlist and keeps the items that still point at
/// a track. Always hits the API; nothing is cached between calls.
pub async fn fetch_tracks(
    api: &dyn PlaylistApi,
    playlist_id: &str,
) -> Result<FetchedTracks, ApiError> {
    let items: Vec<PlaylistItem> = paginate(|cursor| api.playlist_items_page(playlist_id, cursor))
        .try_collect()
        .await?;

    let mut fetched = FetchedTracks::default();
    for item in items {
        match item.track {
            Some(track) => fetched.entries.push(TrackEntry {
                id: track.id,
                name: track.name,
                album: track.album,
                release_date: track.release_date,
                track_number: track.track_number,
                added_at: item.added_at,
            }),
            None => {
                match item.kind {
                    ItemKind::Track => {
                        debug!("Skipping item added at {} without a track", item.added_at);
                    }
                    ItemKind::Episode => {
                        warn!("Podcast episode added at {} will be dropped", item.added_at);
                        fetched.episodes += 1;
                    }
                    ItemKind::LocalFile => {
                        warn!("Local file added at {} will be dropped", item.added_at);
                        fetched.local_files += 1;
                    }
                }
                fetched.skipped += 1;
            }
        }
    }

    Ok(fetched)
}
