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

use crate::models::{Page, PageCursor, PlaylistItem, PlaylistRef, PlaylistSummary};
use async_trait::async_trait;
use log::warn;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Playlist not found: {0}")]
    NotFound(String),
    #[error("Invalid Spotify ID: {0}")]
    InvalidId(String),
    #[error("Rate limited by Spotify (retry after {retry_after:?})")]
    RateLimited { retry_after: Option<Duration> },
    #[error("Transient Spotify API failure: {0}")]
    Transient(String),
    #[error("Spotify API error: {0}")]
    Spotify(String),
}

impl ApiError {
    /// Rate limiting and network trouble; retrying the whole run may help.
    pub fn is_transient(&self) -> bool {
        matches!(self, ApiError::RateLimited { .. } | ApiError::Transient(_))
    }

    /// The playlist does not exist or the current user cannot see it.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_) | ApiError::InvalidId(_))
    }
}

/// The slice of the Spotify Web API the sorter needs.
///
/// The production implementation is [`crate::spotify::SpotifyApi`]; tests use
/// an in-memory fake. Ids are bare base62 Spotify ids, never URIs.
#[async_trait]
pub trait PlaylistApi: Send + Sync {
    async fn current_user_id(&self) -> Result<String, ApiError>;

    async fn my_playlists_page(
        &self,
        cursor: Option<PageCursor>,
    ) -> Result<Page<PlaylistSummary>, ApiError>;

    async fn playlist(&self, playlist_id: &str) -> Result<PlaylistRef, ApiError>;

    async fn playlist_items_page(
        &self,
        playlist_id: &str,
        cursor: Option<PageCursor>,
    ) -> Result<Page<PlaylistItem>, ApiError>;

    /// Discards the whole track list of the playlist and installs `track_ids`.
    async fn replace_tracks(&self, playlist_id: &str, track_ids: &[String])
        -> Result<(), ApiError>;

    async fn append_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<(), ApiError>;

    /// Creates a private playlist owned by `user_id`.
    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
    ) -> Result<PlaylistRef, ApiError>;
}

/// Runs `op`, sleeping and trying again while Spotify answers 429 with a
/// Retry-After value. Gives up after `max_retries` retries.
pub async fn retry_rate_limited<T, F, Fut>(max_retries: u32, mut op: F) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut attempts = 0;
    loop {
        match op().await {
            Err(ApiError::RateLimited {
                retry_after: Some(wait),
            }) if attempts < max_retries => {
                attempts += 1;
                warn!(
                    "Rate limited, retrying after {:?} (attempt #{})",
                    wait, attempts
                );
                tokio::time::sleep(wait).await;
            }
            result => return result,
        }
    }
}
