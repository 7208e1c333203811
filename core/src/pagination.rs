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

use crate::api::ApiError;
use crate::models::{Page, PageCursor};
use futures::stream::{self, Stream, TryStreamExt};
use std::future::Future;

/// Flattens a cursor-paginated collection into a stream of items.
///
/// `fetch` is called with `None` for the first page and then with each
/// `next` cursor the server hands back, until a page comes without one.
/// Nothing is requested before the stream is polled, and calling
/// `paginate` again starts over from the first page.
pub fn paginate<T, F, Fut>(fetch: F) -> impl Stream<Item = Result<T, ApiError>>
where
    F: FnMut(Option<PageCursor>) -> Fut,
    Fut: Future<Output = Result<Page<T>, ApiError>>,
{
    // Outer `None` means exhausted, inner `None` means "first page".
    let start: Option<Option<PageCursor>> = Some(None);

    stream::try_unfold((fetch, start), |(mut fetch, state)| async move {
        let Some(cursor) = state else {
            return Ok(None);
        };

        let page = fetch(cursor).await?;
        // A server claiming more pages while returning none would loop forever.
        let next = if page.items.is_empty() {
            None
        } else {
            page.next.map(Some)
        };

        let items = stream::iter(page.items.into_iter().map(Ok::<T, ApiError>));
        Ok::<_, ApiError>(Some((items, (fetch, next))))
    })
    .try_flatten()
}
