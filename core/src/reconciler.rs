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

use crate::api::{retry_rate_limited, ApiError, PlaylistApi};
use crate::config::SortConfig;
use crate::models::{BatchLog, WriteOperation};
use log::{debug, info};
use std::time::Duration;

/// Writes a target order onto a remote playlist.
///
/// The first batch replaces the whole playlist (dropping anything not in the
/// target order) and every later batch is appended. Running it twice with
/// the same ids leaves the playlist in the same state.
pub struct Reconciler<'a> {
    api: &'a dyn PlaylistApi,
    batch_size: usize,
    write_delay: Duration,
    max_retries: u32,
}

impl<'a> Reconciler<'a> {
    pub fn new(api: &'a dyn PlaylistApi, config: &SortConfig) -> Self {
        Self {
            api,
            batch_size: config.batch_size.max(1),
            write_delay: config.write_delay,
            max_retries: config.max_retries,
        }
    }

    /// The batches `reconcile` would send, without sending them.
    pub fn plan(&self, track_ids: &[String]) -> Vec<BatchLog> {
        self.batches(track_ids)
            .enumerate()
            .map(|(i, (operation, chunk))| BatchLog {
                batch_index: i,
                operation,
                tracks_count: chunk.len(),
                status: "Planned".to_string(),
            })
            .collect()
    }

    /// Makes the playlist hold exactly `track_ids`, in order.
    ///
    /// Stops at the first failed write. Batches already sent stay applied, so
    /// the playlist is left valid but only partly reordered; calling this
    /// again with the same ids finishes the job.
    pub async fn reconcile(
        &self,
        playlist_id: &str,
        track_ids: &[String],
    ) -> Result<Vec<BatchLog>, ApiError> {
        let mut logs = Vec::new();

        for (i, (operation, chunk)) in self.batches(track_ids).enumerate() {
            if i > 0 && !self.write_delay.is_zero() {
                tokio::time::sleep(self.write_delay).await;
            }

            debug!(
                "Batch {} ({:?}) with {} tracks for playlist {}",
                i,
                operation,
                chunk.len(),
                playlist_id
            );

            let api = self.api;
            retry_rate_limited(self.max_retries, || async move {
                match operation {
                    WriteOperation::Replace => api.replace_tracks(playlist_id, chunk).await,
                    WriteOperation::Append => api.append_tracks(playlist_id, chunk).await,
                }
            })
            .await?;

            logs.push(BatchLog {
                batch_index: i,
                operation,
                tracks_count: chunk.len(),
                status: "Success".to_string(),
            });
        }

        info!(
            "Wrote {} tracks to playlist {} in {} calls",
            track_ids.len(),
            playlist_id,
            logs.len()
        );

        Ok(logs)
    }

    fn batches<'t>(
        &self,
        track_ids: &'t [String],
    ) -> impl Iterator<Item = (WriteOperation, &'t [String])> + 't {
        // An empty target still needs one replace to clear the playlist.
        let chunks: Vec<&'t [String]> = if track_ids.is_empty() {
            vec![track_ids]
        } else {
            track_ids.chunks(self.batch_size).collect()
        };

        chunks.into_iter().enumerate().map(|(i, chunk)| {
            let operation = if i == 0 {
                WriteOperation::Replace
            } else {
                WriteOperation::Append
            };
            (operation, chunk)
        })
    }
}
