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
use crate::models::PlaylistSummary;
use crate::pagination::paginate;
use futures::stream::TryStreamExt;

const PLAYLIST_URL_PREFIX: &str = "https://open.spotify.com/playlist/";
const PLAYLIST_URI_PREFIX: &str = "spotify:playlist:";

/// All playlists of the current user, in the order Spotify lists them.
pub async fn list_playlists(api: &dyn PlaylistApi) -> Result<Vec<PlaylistSummary>, ApiError> {
    paginate(|cursor| api.my_playlists_page(cursor))
        .try_collect()
        .await
}

/// Turns "3,5,56-58" into the 0-based positions [2, 4, 55, 56, 57].
///
/// Indices are 1-based and ranges inclusive. Anything that does not name a
/// listed playlist is dropped without complaint.
pub fn parse_selection(expr: &str, count: usize) -> Vec<usize> {
    let in_range = |n: usize| (1..=count).contains(&n);
    let mut positions = Vec::new();

    for token in expr.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match token.split_once('-') {
            Some((start, end)) => {
                let (Ok(start), Ok(end)) = (start.trim().parse::<usize>(), end.trim().parse::<usize>())
                else {
                    continue;
                };
                // Clamp to the listed playlists before expanding.
                let start = start.max(1);
                let end = end.min(count);
                if start <= end {
                    positions.extend(start - 1..end);
                }
            }
            None => {
                if let Ok(n) = token.parse::<usize>() {
                    if in_range(n) {
                        positions.push(n - 1);
                    }
                }
            }
        }
    }

    positions
}

/// Picks the playlists named by a selection expression, in expression order.
pub fn resolve_selection(playlists: &[PlaylistSummary], expr: &str) -> Vec<PlaylistSummary> {
    parse_selection(expr, playlists.len())
        .into_iter()
        .map(|i| playlists[i].clone())
        .collect()
}

/// Extracts the bare playlist id from an id, a `spotify:playlist:` URI or an
/// open.spotify.com link.
pub fn parse_playlist_id(input: &str) -> Option<String> {
    let input = input.trim();
    let id = if let Some(rest) = input.strip_prefix(PLAYLIST_URL_PREFIX) {
        rest.split(['?', '/', '#']).next().unwrap_or_default()
    } else if let Some(rest) = input.strip_prefix(PLAYLIST_URI_PREFIX) {
        rest
    } else {
        input
    };

    let is_base62 = id.len() == 22 && id.chars().all(|c| c.is_ascii_alphanumeric());
    is_base62.then(|| id.to_string())
}

pub fn playlist_url(playlist_id: &str) -> String {
    format!("{}{}", PLAYLIST_URL_PREFIX, playlist_id)
}
