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

use std::time::Duration;
use thiserror::Error;

/// Spotify accepts at most this many track URIs per write call.
pub const MAX_BATCH_SIZE: usize = 100;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Batch size must be between 1 and 100, got {0}")]
    InvalidBatchSize(usize),
}

/// Where the sorted order is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortTarget {
    /// Overwrite the source playlist in place.
    #[default]
    InPlace,
    /// Create a private "Sorted - <name>" playlist and leave the source alone.
    NewPlaylist,
}

/// Knobs for one sorting run.
#[derive(Debug, Clone)]
pub struct SortConfig {
    pub batch_size: usize,
    /// Pause between consecutive write calls.
    pub write_delay: Duration,
    /// How many times a rate limited write is retried after its Retry-After.
    pub max_retries: u32,
    pub target: SortTarget,
    pub dry_run: bool,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            batch_size: MAX_BATCH_SIZE,
            write_delay: Duration::from_secs(1),
            max_retries: 3,
            target: SortTarget::InPlace,
            dry_run: false,
        }
    }
}

impl SortConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 || self.batch_size > MAX_BATCH_SIZE {
            return Err(ConfigError::InvalidBatchSize(self.batch_size));
        }
        Ok(())
    }
}
