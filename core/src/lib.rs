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

pub mod album_sorter;
pub mod api;
pub mod auth;
pub mod config;
pub mod fetcher;
pub mod models;
pub mod pagination;
pub mod reconciler;
pub mod selector;
pub mod sorter;
pub mod spotify;

#[cfg(test)]
pub(crate) mod testing;

// Re-export key items for convenience
pub use album_sorter::AlbumSorter;
pub use api::{ApiError, PlaylistApi};
pub use auth::{get_spotify_client, AuthError, AuthOptions};
pub use config::{ConfigError, SortConfig, SortTarget};
pub use models::{
    ItemKind, PlaylistOutcome, PlaylistRef, PlaylistSummary, ReorderReport, TrackEntry,
};
pub use selector::{parse_playlist_id, playlist_url, resolve_selection};
pub use spotify::SpotifyApi;
