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
use crate::models::{
    ItemKind, Page, PageCursor, PlaylistItem, PlaylistRef, PlaylistSummary, TrackInfo,
};
use async_trait::async_trait;
use log::debug;
use rspotify::{
    http::HttpError,
    model::{Market, PlayableId, PlayableItem, PlaylistId, TrackId, UserId},
    prelude::*,
    AuthCodeSpotify, ClientError,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

const PLAYLISTS_PAGE_SIZE: u32 = 50;
const ITEMS_PAGE_SIZE: u32 = 100;

/// [`PlaylistApi`] backed by the real Spotify Web API.
pub struct SpotifyApi {
    spotify: Arc<AuthCodeSpotify>,
    request_timeout: Duration,
}

impl SpotifyApi {
    pub fn new(spotify: AuthCodeSpotify, request_timeout: Duration) -> Self {
        Self {
            spotify: Arc::new(spotify),
            request_timeout,
        }
    }

    /// Applies the request timeout and maps rspotify failures.
    async fn call<T, Fut>(&self, id: &str, request: Fut) -> Result<T, ApiError>
    where
        Fut: Future<Output = Result<T, ClientError>>,
    {
        match tokio::time::timeout(self.request_timeout, request).await {
            Ok(result) => result.map_err(|e| map_client_error(id, e)),
            Err(_) => Err(ApiError::Transient(format!(
                "request timed out after {:?}",
                self.request_timeout
            ))),
        }
    }
}

fn playlist_id(id: &str) -> Result<PlaylistId<'_>, ApiError> {
    PlaylistId::from_id(id).map_err(|_| ApiError::InvalidId(id.to_string()))
}

fn playable_ids(track_ids: &[String]) -> Result<Vec<PlayableId<'_>>, ApiError> {
    track_ids
        .iter()
        .map(|id| {
            TrackId::from_id(id.as_str())
                .map(PlayableId::Track)
                .map_err(|_| ApiError::InvalidId(id.clone()))
        })
        .collect()
}

fn next_cursor(offset: u32, returned: usize, has_next: bool) -> Option<PageCursor> {
    (has_next && returned > 0).then(|| PageCursor(offset + returned as u32))
}

fn map_client_error(id: &str, err: ClientError) -> ApiError {
    match err {
        ClientError::Http(http) => match *http {
            HttpError::StatusCode(response) => {
                let status = response.status().as_u16();
                match status {
                    404 => ApiError::NotFound(id.to_string()),
                    429 => {
                        let retry_after = response
                            .headers()
                            .get("retry-after")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|s| s.trim().parse::<u64>().ok())
                            .map(Duration::from_secs);
                        ApiError::RateLimited { retry_after }
                    }
                    500..=599 => ApiError::Transient(format!("server answered {}", status)),
                    _ => ApiError::Spotify(format!("unexpected status {} for {}", status, id)),
                }
            }
            other => ApiError::Transient(other.to_string()),
        },
        ClientError::Io(e) => ApiError::Transient(e.to_string()),
        other => ApiError::Spotify(other.to_string()),
    }
}

fn to_playlist_item(item: rspotify::model::PlaylistItem) -> PlaylistItem {
    let added_at = item
        .added_at
        .map(|t| t.format("%Y-%m-%dT%H:%M:%SZ").to_string())
        .unwrap_or_default();

    // Episodes and id-less local files cannot be written back by id.
    let (track, kind) = match item.track {
        Some(PlayableItem::Track(track)) if track.is_local || track.id.is_none() => {
            (None, ItemKind::LocalFile)
        }
        Some(PlayableItem::Track(track)) => {
            let info = track.id.as_ref().map(|id| TrackInfo {
                id: id.id().to_string(),
                name: track.name.clone(),
                album: track.album.name.clone(),
                release_date: track.album.release_date.clone().unwrap_or_default(),
                track_number: track.track_number,
            });
            (info, ItemKind::Track)
        }
        Some(PlayableItem::Episode(_)) => (None, ItemKind::Episode),
        None => (None, ItemKind::Track),
    };

    PlaylistItem {
        track,
        kind,
        added_at,
    }
}

#[async_trait]
impl PlaylistApi for SpotifyApi {
    async fn current_user_id(&self) -> Result<String, ApiError> {
        let me = self.call("me", self.spotify.current_user()).await?;
        Ok(me.id.id().to_string())
    }

    async fn my_playlists_page(
        &self,
        cursor: Option<PageCursor>,
    ) -> Result<Page<PlaylistSummary>, ApiError> {
        let offset = cursor.map(PageCursor::offset).unwrap_or(0);
        let page = self
            .call(
                "me/playlists",
                self.spotify
                    .current_user_playlists_manual(Some(PLAYLISTS_PAGE_SIZE), Some(offset)),
            )
            .await?;

        let next = next_cursor(page.offset, page.items.len(), page.next.is_some());
        let items = page
            .items
            .into_iter()
            .map(|pl| PlaylistSummary {
                id: pl.id.id().to_string(),
                owner_name: pl.owner.display_name.unwrap_or(pl.owner.id.id().to_string()),
                name: pl.name,
                total_tracks: pl.tracks.total,
            })
            .collect();

        Ok(Page { items, next })
    }

    async fn playlist(&self, playlist_id_str: &str) -> Result<PlaylistRef, ApiError> {
        let id = playlist_id(playlist_id_str)?;
        let playlist = self
            .call(playlist_id_str, self.spotify.playlist(id, None, None))
            .await?;

        Ok(PlaylistRef {
            id: playlist.id.id().to_string(),
            name: playlist.name,
        })
    }

    async fn playlist_items_page(
        &self,
        playlist_id_str: &str,
        cursor: Option<PageCursor>,
    ) -> Result<Page<PlaylistItem>, ApiError> {
        let id = playlist_id(playlist_id_str)?;
        let offset = cursor.map(PageCursor::offset).unwrap_or(0);
        debug!("Fetching items of {} from offset {}", playlist_id_str, offset);

        let page = self
            .call(
                playlist_id_str,
                self.spotify.playlist_items_manual(
                    id,
                    None,
                    Some(Market::FromToken),
                    Some(ITEMS_PAGE_SIZE),
                    Some(offset),
                ),
            )
            .await?;

        let next = next_cursor(page.offset, page.items.len(), page.next.is_some());
        let items = page.items.into_iter().map(to_playlist_item).collect();

        Ok(Page { items, next })
    }

    async fn replace_tracks(
        &self,
        playlist_id_str: &str,
        track_ids: &[String],
    ) -> Result<(), ApiError> {
        let id = playlist_id(playlist_id_str)?;
        let items = playable_ids(track_ids)?;
        self.call(
            playlist_id_str,
            self.spotify.playlist_replace_items(id, items),
        )
        .await
    }

    async fn append_tracks(&self, playlist_id_str: &str, track_ids: &[String]) -> Result<(), ApiError> {
        let id = playlist_id(playlist_id_str)?;
        let items = playable_ids(track_ids)?;
        self.call(
            playlist_id_str,
            self.spotify.playlist_add_items(id, items, None),
        )
        .await?;
        Ok(())
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
    ) -> Result<PlaylistRef, ApiError> {
        let user = UserId::from_id(user_id).map_err(|_| ApiError::InvalidId(user_id.to_string()))?;
        let playlist = self
            .call(
                user_id,
                self.spotify.user_playlist_create(
                    user,
                    name,
                    Some(false),
                    Some(false),
                    Some(description),
                ),
            )
            .await?;

        Ok(PlaylistRef {
            id: playlist.id.id().to_string(),
            name: playlist.name,
        })
    }
}
