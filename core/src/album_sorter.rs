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
use crate::config::{SortConfig, SortTarget};
use crate::fetcher::fetch_tracks;
use crate::models::{PlaylistOutcome, PlaylistRef, PlaylistSummary, ReorderReport};
use crate::reconciler::Reconciler;
use crate::selector::list_playlists;
use crate::sorter::sort_entries;
use log::{info, warn};
use std::sync::Arc;

const SORTED_DESCRIPTION: &str = "Grouped by album, ordered by release date and track number.";

/// Runs playlists through fetch, sort and write-back, one at a time.
pub struct AlbumSorter {
    api: Arc<dyn PlaylistApi>,
    config: SortConfig,
}

impl AlbumSorter {
    pub fn new(api: Arc<dyn PlaylistApi>, config: SortConfig) -> Self {
        Self { api, config }
    }

    pub fn config(&self) -> &SortConfig {
        &self.config
    }

    pub async fn list_playlists(&self) -> Result<Vec<PlaylistSummary>, ApiError> {
        list_playlists(self.api.as_ref()).await
    }

    /// Sorts every playlist in `playlist_ids`, in order. A playlist that
    /// fails never stops the ones after it. `on_outcome` sees each outcome
    /// with its 0-based position as soon as that playlist is done.
    pub async fn sort_playlists<F>(
        &self,
        playlist_ids: &[String],
        mut on_outcome: F,
    ) -> Vec<PlaylistOutcome>
    where
        F: FnMut(usize, &PlaylistOutcome),
    {
        let mut outcomes = Vec::with_capacity(playlist_ids.len());
        for (i, id) in playlist_ids.iter().enumerate() {
            info!("[{}/{}] Playlist {}", i + 1, playlist_ids.len(), id);
            let outcome = self.sort_playlist(id).await;
            on_outcome(i, &outcome);
            outcomes.push(outcome);
        }
        outcomes
    }

    pub async fn sort_playlist(&self, playlist_id: &str) -> PlaylistOutcome {
        let api = self.api.as_ref();

        let playlist = match api.playlist(playlist_id).await {
            Ok(playlist) => playlist,
            Err(e) => return unreadable(playlist_id, e),
        };

        info!("Fetching tracks of '{}'...", playlist.name);
        let fetched = match fetch_tracks(api, &playlist.id).await {
            Ok(fetched) => fetched,
            Err(e) => return unreadable(playlist_id, e),
        };

        if fetched.entries.is_empty() {
            info!("'{}' has no tracks to sort", playlist.name);
            return PlaylistOutcome::Empty(playlist);
        }

        let items_fetched = fetched.total_items();
        let items_skipped = fetched.skipped;
        let episodes_dropped = fetched.episodes;
        let local_files_dropped = fetched.local_files;
        let unavailable = items_skipped - episodes_dropped - local_files_dropped;
        if unavailable > 0 {
            warn!(
                "{} unavailable items in '{}' will be dropped",
                unavailable, playlist.name
            );
        }
        if episodes_dropped > 0 {
            warn!(
                "{} podcast episodes in '{}' will be dropped",
                episodes_dropped, playlist.name
            );
        }
        if local_files_dropped > 0 {
            warn!(
                "{} local files in '{}' will be dropped",
                local_files_dropped, playlist.name
            );
        }

        info!("Sorting {} tracks...", fetched.entries.len());
        let sorted = sort_entries(fetched.entries);
        let track_ids: Vec<String> = sorted.iter().map(|e| e.id.clone()).collect();
        let reconciler = Reconciler::new(api, &self.config);

        let mut report = ReorderReport {
            target_playlist_id: playlist.id.clone(),
            playlist: playlist.clone(),
            items_fetched,
            tracks_kept: sorted.len(),
            items_skipped,
            episodes_dropped,
            local_files_dropped,
            write_calls: 0,
            dry_run: self.config.dry_run,
            batch_logs: Vec::new(),
            sorted_tracks: sorted,
        };

        if self.config.dry_run {
            report.batch_logs = reconciler.plan(&track_ids);
            return PlaylistOutcome::Reordered(report);
        }

        let target = match self.write_target(&playlist).await {
            Ok(target) => target,
            Err(e) => return failed(playlist_id, e),
        };

        info!("Writing sorted order to '{}'...", target.name);
        match reconciler.reconcile(&target.id, &track_ids).await {
            Ok(logs) => {
                report.target_playlist_id = target.id;
                report.write_calls = logs.len();
                report.batch_logs = logs;
                PlaylistOutcome::Reordered(report)
            }
            Err(e) => failed(playlist_id, e),
        }
    }

    async fn write_target(&self, source: &PlaylistRef) -> Result<PlaylistRef, ApiError> {
        match self.config.target {
            SortTarget::InPlace => Ok(source.clone()),
            SortTarget::NewPlaylist => {
                let user_id = self.api.current_user_id().await?;
                let name = format!("Sorted - {}", source.name);
                let created = self
                    .api
                    .create_playlist(&user_id, &name, SORTED_DESCRIPTION)
                    .await?;
                info!("Created playlist '{}' ({})", created.name, created.id);
                Ok(created)
            }
        }
    }
}

/// A playlist that does not exist is skipped; any other read error fails it.
fn unreadable(playlist_id: &str, err: ApiError) -> PlaylistOutcome {
    if !err.is_not_found() {
        warn!("Reading playlist {} failed: {}", playlist_id, err);
        return PlaylistOutcome::Failed {
            playlist_id: playlist_id.to_string(),
            reason: err.to_string(),
        };
    }

    warn!("Skipping playlist {}: {}", playlist_id, err);
    PlaylistOutcome::Skipped {
        playlist_id: playlist_id.to_string(),
        reason: err.to_string(),
    }
}

fn failed(playlist_id: &str, err: ApiError) -> PlaylistOutcome {
    warn!("Writing playlist {} failed: {}", playlist_id, err);
    PlaylistOutcome::Failed {
        playlist_id: playlist_id.to_string(),
        reason: err.to_string(),
    }
}
