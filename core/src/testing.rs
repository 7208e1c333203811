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

//! In-memory Spotify used by the unit tests.

use crate::api::{ApiError, PlaylistApi};
use crate::models::{ItemKind, Page, PageCursor, PlaylistItem, PlaylistRef, PlaylistSummary, TrackInfo};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum WriteCall {
    Replace {
        playlist_id: String,
        track_ids: Vec<String>,
    },
    Append {
        playlist_id: String,
        track_ids: Vec<String>,
    },
    Create {
        name: String,
    },
}

#[derive(Default)]
struct FakeState {
    playlists: Vec<PlaylistSummary>,
    items: HashMap<String, Vec<PlaylistItem>>,
    catalog: HashMap<String, (TrackInfo, String)>,
    writes: Vec<WriteCall>,
    write_failures: VecDeque<Option<ApiError>>,
    read_failures: HashMap<String, ApiError>,
    page_requests: usize,
}

pub(crate) struct FakeSpotify {
    page_size: usize,
    state: Mutex<FakeState>,
}

pub(crate) fn track(
    id: &str,
    album: &str,
    release_date: &str,
    track_number: u32,
    added_at: &str,
) -> PlaylistItem {
    PlaylistItem {
        track: Some(TrackInfo {
            id: id.to_string(),
            name: format!("Song {}", id),
            album: album.to_string(),
            release_date: release_date.to_string(),
            track_number,
        }),
        kind: ItemKind::Track,
        added_at: added_at.to_string(),
    }
}

fn without_track(kind: ItemKind, added_at: &str) -> PlaylistItem {
    PlaylistItem {
        track: None,
        kind,
        added_at: added_at.to_string(),
    }
}

pub(crate) fn unavailable(added_at: &str) -> PlaylistItem {
    without_track(ItemKind::Track, added_at)
}

pub(crate) fn episode(added_at: &str) -> PlaylistItem {
    without_track(ItemKind::Episode, added_at)
}

pub(crate) fn local_file(added_at: &str) -> PlaylistItem {
    without_track(ItemKind::LocalFile, added_at)
}

/// `count` distinct tracks, all on different albums, in playlist order.
pub(crate) fn numbered_tracks(count: usize) -> Vec<PlaylistItem> {
    (0..count)
        .map(|i| {
            track(
                &format!("track{:04}", i),
                &format!("Album {:04}", i),
                "2000",
                1,
                "2020-01-01T00:00:00Z",
            )
        })
        .collect()
}

impl FakeSpotify {
    pub(crate) fn new(page_size: usize) -> Self {
        Self {
            page_size,
            state: Mutex::new(FakeState::default()),
        }
    }

    pub(crate) fn with_playlist(self, id: &str, name: &str, items: Vec<PlaylistItem>) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            for item in &items {
                if let Some(track) = &item.track {
                    state
                        .catalog
                        .insert(track.id.clone(), (track.clone(), item.added_at.clone()));
                }
            }
            state.playlists.push(PlaylistSummary {
                id: id.to_string(),
                name: name.to_string(),
                total_tracks: items.len() as u32,
                owner_name: "tester".to_string(),
            });
            state.items.insert(id.to_string(), items);
        }
        self
    }

    /// Queues outcomes for the next write calls: `Some(err)` fails that
    /// call, `None` lets it through.
    pub(crate) fn script_writes(&self, outcomes: Vec<Option<ApiError>>) {
        self.state.lock().unwrap().write_failures.extend(outcomes);
    }

    /// Makes every item page request for `playlist_id` fail with `err`.
    pub(crate) fn fail_reads(&self, playlist_id: &str, err: ApiError) {
        self.state
            .lock()
            .unwrap()
            .read_failures
            .insert(playlist_id.to_string(), err);
    }

    pub(crate) fn track_ids(&self, playlist_id: &str) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state.items[playlist_id]
            .iter()
            .filter_map(|item| item.track.as_ref().map(|t| t.id.clone()))
            .collect()
    }

    pub(crate) fn writes(&self) -> Vec<WriteCall> {
        self.state.lock().unwrap().writes.clone()
    }

    pub(crate) fn page_requests(&self) -> usize {
        self.state.lock().unwrap().page_requests
    }

    fn next_write_failure(state: &mut FakeState) -> Option<ApiError> {
        state.write_failures.pop_front().flatten()
    }

    fn to_items(state: &FakeState, track_ids: &[String]) -> Vec<PlaylistItem> {
        track_ids
            .iter()
            .map(|id| match state.catalog.get(id) {
                Some((info, added_at)) => PlaylistItem {
                    track: Some(info.clone()),
                    kind: ItemKind::Track,
                    added_at: added_at.clone(),
                },
                None => unavailable(""),
            })
            .collect()
    }

    fn page_of<T: Clone>(&self, all: &[T], cursor: Option<PageCursor>) -> Page<T> {
        let offset = cursor.map(|c| c.offset() as usize).unwrap_or(0);
        let end = (offset + self.page_size).min(all.len());
        let items = all.get(offset..end).unwrap_or_default().to_vec();
        let next = if end < all.len() {
            Some(PageCursor(end as u32))
        } else {
            None
        };
        Page { items, next }
    }
}

#[async_trait]
impl PlaylistApi for FakeSpotify {
    async fn current_user_id(&self) -> Result<String, ApiError> {
        Ok("tester".to_string())
    }

    async fn my_playlists_page(
        &self,
        cursor: Option<PageCursor>,
    ) -> Result<Page<PlaylistSummary>, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.page_requests += 1;
        Ok(self.page_of(&state.playlists, cursor))
    }

    async fn playlist(&self, playlist_id: &str) -> Result<PlaylistRef, ApiError> {
        let state = self.state.lock().unwrap();
        state
            .playlists
            .iter()
            .find(|p| p.id == playlist_id)
            .map(|p| p.to_playlist_ref())
            .ok_or_else(|| ApiError::NotFound(playlist_id.to_string()))
    }

    async fn playlist_items_page(
        &self,
        playlist_id: &str,
        cursor: Option<PageCursor>,
    ) -> Result<Page<PlaylistItem>, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.page_requests += 1;
        if let Some(err) = state.read_failures.get(playlist_id) {
            return Err(err.clone());
        }
        let items = state
            .items
            .get(playlist_id)
            .ok_or_else(|| ApiError::NotFound(playlist_id.to_string()))?;
        Ok(self.page_of(items, cursor))
    }

    async fn replace_tracks(
        &self,
        playlist_id: &str,
        track_ids: &[String],
    ) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        if let Some(err) = Self::next_write_failure(&mut state) {
            return Err(err);
        }
        if !state.items.contains_key(playlist_id) {
            return Err(ApiError::NotFound(playlist_id.to_string()));
        }
        let items = Self::to_items(&state, track_ids);
        state.items.insert(playlist_id.to_string(), items);
        state.writes.push(WriteCall::Replace {
            playlist_id: playlist_id.to_string(),
            track_ids: track_ids.to_vec(),
        });
        Ok(())
    }

    async fn append_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        if let Some(err) = Self::next_write_failure(&mut state) {
            return Err(err);
        }
        let items = Self::to_items(&state, track_ids);
        state
            .items
            .get_mut(playlist_id)
            .ok_or_else(|| ApiError::NotFound(playlist_id.to_string()))?
            .extend(items);
        state.writes.push(WriteCall::Append {
            playlist_id: playlist_id.to_string(),
            track_ids: track_ids.to_vec(),
        });
        Ok(())
    }

    async fn create_playlist(
        &self,
        _user_id: &str,
        name: &str,
        _description: &str,
    ) -> Result<PlaylistRef, ApiError> {
        let mut state = self.state.lock().unwrap();
        let id = format!("created{}", state.playlists.len());
        state.playlists.push(PlaylistSummary {
            id: id.clone(),
            name: name.to_string(),
            total_tracks: 0,
            owner_name: "tester".to_string(),
        });
        state.items.insert(id.clone(), Vec::new());
        state.writes.push(WriteCall::Create {
            name: name.to_string(),
        });
        Ok(PlaylistRef {
            id,
            name: name.to_string(),
        })
    }
}
