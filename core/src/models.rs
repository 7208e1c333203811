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

use serde::{Deserialize, Serialize};
use std::fmt;

/// One track of a playlist, with everything the album ordering needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackEntry {
    pub id: String,
    pub name: String,
    pub album: String,
    pub release_date: String, // "1999", "1999-05" or "1999-05-03"
    pub track_number: u32,
    pub added_at: String,
}

impl fmt::Display for TrackEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let release = if self.release_date.is_empty() {
            "????"
        } else {
            self.release_date.as_str()
        };

        write!(
            f,
            "[{}] {} #{:02} {} ({})",
            release, self.album, self.track_number, self.name, self.id
        )
    }
}

/// Identity of a playlist as read from the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistRef {
    pub id: String,
    pub name: String,
}

/// A row of the "my playlists" listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub total_tracks: u32,
    pub owner_name: String,
}

impl PlaylistSummary {
    pub fn to_playlist_ref(&self) -> PlaylistRef {
        PlaylistRef {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// Track metadata embedded in a playlist item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackInfo {
    pub id: String,
    pub name: String,
    pub album: String,
    pub release_date: String,
    pub track_number: u32,
}

/// What a playlist item refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemKind {
    #[default]
    Track,
    Episode,
    LocalFile,
}

/// Raw playlist item. `track` is `None` when the item no longer points at a
/// playable Spotify track: removed or region locked tracks keep
/// [`ItemKind::Track`], podcast episodes and local files say so in `kind`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistItem {
    pub track: Option<TrackInfo>,
    pub kind: ItemKind,
    pub added_at: String,
}

/// Opaque position of the next page of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor(pub(crate) u32);

impl PageCursor {
    pub(crate) fn offset(self) -> u32 {
        self.0
    }
}

/// One page of a paginated collection.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<PageCursor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WriteOperation {
    Replace,
    Append,
}

/// Detailed log for a single write batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchLog {
    pub batch_index: usize,
    pub operation: WriteOperation,
    pub tracks_count: usize,
    pub status: String, // "Success", "Planned" or error message
}

/// Report for one playlist that went through the whole pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderReport {
    pub playlist: PlaylistRef,
    /// Playlist the sorted order was written to. Differs from `playlist.id`
    /// when sorting into a new playlist.
    pub target_playlist_id: String,
    pub items_fetched: usize,
    pub tracks_kept: usize,
    pub items_skipped: usize,
    /// Of `items_skipped`, how many were podcast episodes and local files.
    pub episodes_dropped: usize,
    pub local_files_dropped: usize,
    pub write_calls: usize,
    pub dry_run: bool,
    pub batch_logs: Vec<BatchLog>,
    pub sorted_tracks: Vec<TrackEntry>,
}

/// Result of running one selected playlist through the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PlaylistOutcome {
    Reordered(ReorderReport),
    Empty(PlaylistRef),
    Skipped { playlist_id: String, reason: String },
    Failed { playlist_id: String, reason: String },
}

impl PlaylistOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, PlaylistOutcome::Failed { .. })
    }
}
