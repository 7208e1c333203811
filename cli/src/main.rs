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

use albumsort_core::{
    get_spotify_client, parse_playlist_id, playlist_url, resolve_selection, AlbumSorter,
    AuthOptions, PlaylistOutcome, PlaylistSummary, ReorderReport, SortConfig, SortTarget,
    SpotifyApi,
};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dotenvy::dotenv;
use log::debug;
use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "albumsort")]
#[command(about = "Sorts Spotify playlists by album release date and track number", long_about = None)]
struct Cli {
    #[command(flatten)]
    client: ClientArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ClientArgs {
    /// Track URIs sent per write call (Spotify accepts at most 100)
    #[arg(long, global = true, env = "ALBUMSORT_BATCH_SIZE", default_value_t = 100)]
    batch_size: usize,

    /// Pause between write calls, in milliseconds
    #[arg(long, global = true, env = "ALBUMSORT_DELAY_MS", default_value_t = 1000)]
    delay_ms: u64,

    /// Retries for a write that Spotify rate limits with a Retry-After header
    #[arg(long, global = true, env = "ALBUMSORT_MAX_RETRIES", default_value_t = 3)]
    max_retries: u32,

    /// Timeout for every Spotify request, in seconds
    #[arg(long, global = true, env = "ALBUMSORT_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// Where the OAuth token is cached between runs
    #[arg(
        long,
        global = true,
        env = "ALBUMSORT_TOKEN_CACHE",
        default_value = ".spotify_token_cache.json"
    )]
    token_cache: PathBuf,
}

#[derive(Args)]
struct SortArgs {
    /// Write the sorted order to a new private "Sorted - <name>" playlist
    #[arg(long)]
    new_playlist: bool,

    /// Fetch and sort only; print the new order without touching Spotify
    #[arg(long)]
    dry_run: bool,

    /// Output the detailed report to a JSON file (e.g., --json=report.json)
    #[arg(long)]
    json: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Lists your playlists with the index used by `select`
    List,
    /// Sorts the given playlists (IDs, spotify: URIs or open.spotify.com links)
    Sort {
        #[arg(value_name = "PLAYLIST", required = true)]
        playlists: Vec<String>,
        #[command(flatten)]
        options: SortArgs,
    },
    /// Lists your playlists and sorts the ones picked by index, e.g. "3,5,56-70"
    Select {
        /// Selection expression; read from stdin when omitted
        #[arg(value_name = "EXPR")]
        selection: Option<String>,
        #[command(flatten)]
        options: SortArgs,
    },
}

#[tokio::main]
async fn main() {
    env_logger::init();

    if dotenv().is_err() {
        // Silently ignore
    }

    let cli = Cli::parse();

    let code = match &cli.command {
        Commands::List => handle_list(&cli.client).await,
        Commands::Sort { playlists, options } => handle_sort(&cli.client, playlists, options).await,
        Commands::Select { selection, options } => {
            handle_select(&cli.client, selection.as_deref(), options).await
        }
    };

    process::exit(code);
}

fn sort_config(client: &ClientArgs, options: Option<&SortArgs>) -> SortConfig {
    SortConfig {
        batch_size: client.batch_size,
        write_delay: Duration::from_millis(client.delay_ms),
        max_retries: client.max_retries,
        target: match options {
            Some(o) if o.new_playlist => SortTarget::NewPlaylist,
            _ => SortTarget::InPlace,
        },
        dry_run: options.is_some_and(|o| o.dry_run),
    }
}

async fn get_sorter(client: &ClientArgs, options: Option<&SortArgs>) -> AlbumSorter {
    let config = sort_config(client, options);
    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        process::exit(1);
    }

    let auth = AuthOptions {
        token_cache: client.token_cache.clone(),
    };
    let spotify = match get_spotify_client(&auth).await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error initializing Spotify client: {}", e);
            process::exit(1);
        }
    };

    let api = SpotifyApi::new(spotify, Duration::from_secs(client.timeout_secs));
    AlbumSorter::new(Arc::new(api), config)
}

async fn fetch_playlists(sorter: &AlbumSorter) -> Option<Vec<PlaylistSummary>> {
    println!("Fetching your playlists...");
    match sorter.list_playlists().await {
        Ok(playlists) => Some(playlists),
        Err(e) => {
            eprintln!("Failed to list playlists: {}", e);
            None
        }
    }
}

fn print_playlists(playlists: &[PlaylistSummary]) {
    println!();
    println!(
        "{:>4} | {:<22} | {:<30} | {:<20} | {:<6}",
        "#", "ID", "Name", "Owner", "Tracks"
    );
    println!(
        "{:->4}-+-{:-<22}-+-{:-<30}-+-{:-<20}-+-{:-<6}",
        "", "", "", "", ""
    );

    for (i, pl) in playlists.iter().enumerate() {
        println!(
            "{:>4} | {:<22} | {:<30} | {:<20} | {:<6}",
            i + 1,
            pl.id,
            truncate(&pl.name, 30),
            truncate(&pl.owner_name, 20),
            pl.total_tracks
        );
    }
    println!();
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let head: String = text.chars().take(width - 2).collect();
        format!("{}..", head)
    } else {
        text.to_string()
    }
}

async fn handle_list(client: &ClientArgs) -> i32 {
    let sorter = get_sorter(client, None).await;

    let Some(playlists) = fetch_playlists(&sorter).await else {
        return 1;
    };
    print_playlists(&playlists);
    println!("Tip: run 'albumsort select \"1,3,5-7\"' to sort playlists by index");
    0
}

async fn handle_sort(client: &ClientArgs, inputs: &[String], options: &SortArgs) -> i32 {
    let mut ids = Vec::new();
    for input in inputs {
        match parse_playlist_id(input) {
            Some(id) => ids.push(id),
            None => eprintln!("[SKIP] Not a playlist ID, URI or link: {}", input),
        }
    }

    if ids.is_empty() {
        eprintln!("No playlists to sort.");
        return 1;
    }

    let sorter = get_sorter(client, Some(options)).await;
    run_and_report(&sorter, &ids, options).await
}

async fn handle_select(client: &ClientArgs, selection: Option<&str>, options: &SortArgs) -> i32 {
    let sorter = get_sorter(client, Some(options)).await;

    let Some(playlists) = fetch_playlists(&sorter).await else {
        return 1;
    };
    print_playlists(&playlists);

    let expr = match selection {
        Some(expr) => expr.to_string(),
        None => match prompt_selection() {
            Ok(expr) => expr,
            Err(e) => {
                eprintln!("[ERROR] {:#}", e);
                return 1;
            }
        },
    };

    let picked = resolve_selection(&playlists, &expr);
    if picked.is_empty() {
        println!("Nothing selected.");
        return 0;
    }

    for pl in &picked {
        debug!("Selected '{}' ({})", pl.name, pl.id);
    }

    let ids: Vec<String> = picked.into_iter().map(|pl| pl.id).collect();
    run_and_report(&sorter, &ids, options).await
}

fn prompt_selection() -> Result<String> {
    print!("Playlists to sort (e.g. 3,5,56-70): ");
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read selection from stdin")?;
    Ok(line.trim().to_string())
}

async fn run_and_report(sorter: &AlbumSorter, ids: &[String], options: &SortArgs) -> i32 {
    let outcomes = sorter
        .sort_playlists(ids, |i, outcome| {
            println!();
            println!("[{}/{}] Playlist {}", i + 1, ids.len(), ids[i]);
            print_outcome(outcome);
        })
        .await;

    print_summary(&outcomes, sorter.config().dry_run);

    if let Some(path) = &options.json {
        if let Err(e) = write_report(path, &outcomes) {
            eprintln!();
            eprintln!("[ERROR] {:#}", e);
        } else {
            println!();
            println!("[SAVED] Detailed report saved to: {}", path.display());
        }
    }

    if outcomes.iter().any(PlaylistOutcome::is_failure) {
        1
    } else {
        0
    }
}

fn print_outcome(outcome: &PlaylistOutcome) {
    match outcome {
        PlaylistOutcome::Reordered(report) if report.dry_run => {
            println!("[DRY RUN] '{}' would be written as:", report.playlist.name);
            for (i, track) in report.sorted_tracks.iter().enumerate() {
                println!("{:>5}. {}", i + 1, track);
            }
            println!(
                "          {} write calls planned, {} would be dropped",
                report.batch_logs.len(),
                dropped_items(report)
            );
        }
        PlaylistOutcome::Reordered(report) => {
            println!(
                "[OK] '{}': {} tracks sorted in {} write calls ({} removed)",
                report.playlist.name,
                report.tracks_kept,
                report.write_calls,
                dropped_items(report)
            );
            println!("     {}", playlist_url(&report.target_playlist_id));
        }
        PlaylistOutcome::Empty(playlist) => {
            println!("[EMPTY] '{}' has no tracks to sort, skipped.", playlist.name);
        }
        PlaylistOutcome::Skipped {
            playlist_id,
            reason,
        } => {
            eprintln!("[SKIP] {}: {}", playlist_id, reason);
        }
        PlaylistOutcome::Failed {
            playlist_id,
            reason,
        } => {
            eprintln!("[ERROR] {}: {}", playlist_id, reason);
            eprintln!("        Run the command again to finish; the playlist may be partly sorted.");
        }
    }
}

/// "2 unavailable items, 1 podcast episode, 1 local file"
fn dropped_items(report: &ReorderReport) -> String {
    let unavailable =
        report.items_skipped - report.episodes_dropped - report.local_files_dropped;
    let plural = |n: usize, one: &str, many: &str| {
        format!("{} {}", n, if n == 1 { one } else { many })
    };

    let mut parts = vec![plural(unavailable, "unavailable item", "unavailable items")];
    if report.episodes_dropped > 0 {
        parts.push(plural(report.episodes_dropped, "podcast episode", "podcast episodes"));
    }
    if report.local_files_dropped > 0 {
        parts.push(plural(report.local_files_dropped, "local file", "local files"));
    }
    parts.join(", ")
}

fn print_summary(outcomes: &[PlaylistOutcome], dry_run: bool) {
    let count = |f: fn(&PlaylistOutcome) -> bool| outcomes.iter().filter(|o| f(o)).count();

    println!();
    println!("---------------------------------------------------");
    println!("{}", if dry_run { "DRY RUN COMPLETE" } else { "SORT COMPLETE" });
    println!("---------------------------------------------------");
    println!(
        "Sorted:   {}",
        count(|o| matches!(o, PlaylistOutcome::Reordered(_)))
    );
    println!(
        "Empty:    {}",
        count(|o| matches!(o, PlaylistOutcome::Empty(_)))
    );
    println!(
        "Skipped:  {}",
        count(|o| matches!(o, PlaylistOutcome::Skipped { .. }))
    );
    println!("Failed:   {}", count(PlaylistOutcome::is_failure));
    println!("---------------------------------------------------");
}

fn write_report(path: &PathBuf, outcomes: &[PlaylistOutcome]) -> Result<()> {
    let json_content =
        serde_json::to_string_pretty(outcomes).context("Failed to serialize report")?;
    let mut file = File::create(path)
        .with_context(|| format!("Failed to create file '{}'", path.display()))?;
    file.write_all(json_content.as_bytes())
        .context("Failed to write report to file")?;
    Ok(())
}
