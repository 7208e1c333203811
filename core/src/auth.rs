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

use log::debug;
use rspotify::{prelude::*, scopes, AuthCodeSpotify, Config, Credentials, OAuth};
use std::collections::HashSet;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Failed to initialize Spotify client: {0}")]
    ClientConfig(String),
    #[error("Spotify authentication failed: {0}")]
    Spotify(#[from] rspotify::ClientError),
}

#[derive(Debug, Clone)]
pub struct AuthOptions {
    /// Where rspotify keeps the OAuth token between runs.
    pub token_cache: PathBuf,
}

impl Default for AuthOptions {
    fn default() -> Self {
        Self {
            token_cache: PathBuf::from(".spotify_token_cache.json"),
        }
    }
}

/// Read and rewrite access to every playlist the user owns or follows.
fn playlist_scopes() -> HashSet<String> {
    scopes!(
        "playlist-read-private",
        "playlist-read-collaborative",
        "playlist-modify-public",
        "playlist-modify-private"
    )
}

fn client_config(options: &AuthOptions) -> Config {
    Config {
        token_cached: true,
        token_refreshing: true,
        cache_path: options.token_cache.clone(),
        ..Default::default()
    }
}

/// Returns an authorized client for the playlist endpoints.
///
/// Credentials and the redirect URI come from `RSPOTIFY_CLIENT_ID`,
/// `RSPOTIFY_CLIENT_SECRET` and `RSPOTIFY_REDIRECT_URI`. A token cached at
/// `options.token_cache` is reused and refreshed; without one the user is
/// sent through the browser consent page once.
pub async fn get_spotify_client(options: &AuthOptions) -> Result<AuthCodeSpotify, AuthError> {
    let creds = Credentials::from_env().ok_or_else(|| {
        AuthError::ClientConfig("Missing RSPOTIFY_CLIENT_ID or RSPOTIFY_CLIENT_SECRET".to_string())
    })?;
    let oauth = OAuth::from_env(playlist_scopes())
        .ok_or_else(|| AuthError::ClientConfig("Missing RSPOTIFY_REDIRECT_URI".to_string()))?;

    let spotify = AuthCodeSpotify::with_config(creds, oauth, client_config(options));
    let url = spotify.get_authorize_url(false)?;
    spotify.prompt_for_token(&url).await?;

    debug!("Spotify client ready, token cache at {}", options.token_cache.display());
    Ok(spotify)
}
