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

use crate::models::TrackEntry;

/// Ordering key of a track: album release date, album name, track number,
/// then the time it was added to the playlist.
///
/// Release dates are compared as plain strings, so a year-only date sorts
/// before any full date of the same year ("1999" < "1999-01-01").
pub type SortKey<'a> = (&'a str, &'a str, u32, &'a str);

pub fn sort_key(entry: &TrackEntry) -> SortKey<'_> {
    (
        entry.release_date.as_str(),
        entry.album.as_str(),
        entry.track_number,
        entry.added_at.as_str(),
    )
}

/// Groups tracks by album in release order. Equal keys keep their input order.
pub fn sort_entries(mut entries: Vec<TrackEntry>) -> Vec<TrackEntry> {
    entries.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, album: &str, release_date: &str, track_number: u32, added_at: &str) -> TrackEntry {
        TrackEntry {
            id: id.to_string(),
            name: format!("Song {}", id),
            album: album.to_string(),
            release_date: release_date.to_string(),
            track_number,
            added_at: added_at.to_string(),
        }
    }

    fn ids(entries: &[TrackEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.id.as_str()).collect()
    }

    fn mixed_playlist() -> Vec<TrackEntry> {
        vec![
            entry("1", "Kid A", "2000-10-02", 3, "2021-01-01T00:00:00Z"),
            entry("2", "OK Computer", "1997-05-21", 1, "2021-01-02T00:00:00Z"),
            entry("3", "Kid A", "2000-10-02", 1, "2021-01-03T00:00:00Z"),
            entry("4", "Amnesiac", "2001", 2, "2021-01-04T00:00:00Z"),
            entry("5", "OK Computer", "1997-05-21", 1, "2020-12-31T00:00:00Z"),
            entry("6", "Pablo Honey", "1993", 12, "2021-01-05T00:00:00Z"),
            entry("7", "Kid A", "2000-10-02", 3, "2021-01-01T00:00:00Z"),
        ]
    }

    #[test]
    fn test_album_scenario() {
        let entries = vec![
            entry("b2", "B", "2001", 2, "t1"),
            entry("a1", "A", "2000", 1, "t2"),
            entry("a2", "A", "2000", 2, "t3"),
        ];

        let sorted = sort_entries(entries);

        assert_eq!(ids(&sorted), vec!["a1", "a2", "b2"]);
    }

    #[test]
    fn test_keys_are_non_decreasing() {
        let sorted = sort_entries(mixed_playlist());

        for pair in sorted.windows(2) {
            assert!(sort_key(&pair[0]) <= sort_key(&pair[1]));
        }
        assert_eq!(ids(&sorted), vec!["6", "5", "2", "3", "1", "7", "4"]);
    }

    #[test]
    fn test_is_idempotent_and_keeps_membership() {
        let input = mixed_playlist();
        let once = sort_entries(input.clone());
        let twice = sort_entries(once.clone());

        assert_eq!(once, twice);

        let mut before = ids(&input);
        let mut after = ids(&once);
        before.sort_unstable();
        after.sort_unstable();
        assert_eq!(before, after);
    }

    #[test]
    fn test_equal_keys_keep_input_order() {
        // same key, different ids (e.g. the same song added twice in one second)
        let entries = vec![
            entry("x", "Same", "2010", 1, "t"),
            entry("y", "Same", "2010", 1, "t"),
            entry("z", "Same", "2010", 1, "t"),
        ];

        assert_eq!(ids(&sort_entries(entries.clone())), vec!["x", "y", "z"]);

        let reversed: Vec<TrackEntry> = entries.into_iter().rev().collect();
        assert_eq!(ids(&sort_entries(reversed)), vec!["z", "y", "x"]);
    }

    #[test]
    fn test_release_dates_compare_as_strings() {
        let entries = vec![
            entry("full", "Late", "1999-12-01", 1, "t"),
            entry("month", "Mid", "1999-05", 1, "t"),
            entry("year", "Early", "1999", 1, "t"),
            entry("unknown", "None", "", 1, "t"),
        ];

        let sorted = sort_entries(entries);

        assert_eq!(ids(&sorted), vec!["unknown", "year", "month", "full"]);
    }

    #[test]
    fn test_track_number_is_numeric() {
        let entries = vec![
            entry("ten", "A", "2000", 10, "t"),
            entry("two", "A", "2000", 2, "t"),
        ];

        assert_eq!(ids(&sort_entries(entries)), vec!["two", "ten"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(sort_entries(Vec::new()).is_empty());
    }
}
