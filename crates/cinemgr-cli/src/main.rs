//! cinemgr - cinema listings collection CLI.

/// Application configuration (TOML).
mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Days, Local};
use clap::{Parser, Subcommand};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use url::Url;

use crate::config::{AppConfig, resolve_config_path};
use cinemgr_api::afisha::{
    AfishaClient, DateRange, MoviePages, MovieRecord, PlaceItem, SchedulePages, SessionRecord,
    parse_date,
};
use cinemgr_db::cinemas::CinemaRow;
use cinemgr_db::movies::MovieRow;
use cinemgr_db::schedule::SessionRow;
use cinemgr_db::{
    Connection, load_movies, load_schedule, load_schedule_for_movie, open_db,
    save_cinema_sessions, save_movie,
};

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config/data directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Collect movies and their schedules into the local database.
    Sync(SyncArgs),
    /// Local database operations.
    Db(DbCommand),
}

/// Arguments for the `sync` subcommand.
#[derive(clap::Args)]
struct SyncArgs {
    /// Listing date (format: "2026-08-05"; default: today).
    #[arg(long)]
    date: Option<String>,

    /// Schedule window length in days, starting at the listing date.
    /// Falls back to config if omitted.
    #[arg(long)]
    days: Option<u32>,
}

/// Arguments for the `db` subcommand.
#[derive(clap::Args)]
struct DbCommand {
    /// Db subcommand to run.
    #[command(subcommand)]
    command: DbSubcommands,
}

/// Available database subcommands.
#[derive(Subcommand)]
enum DbSubcommands {
    /// List stored movies.
    Movies,
    /// List stored schedule rows.
    Schedule(ScheduleArgs),
}

/// Arguments for the `db schedule` subcommand.
#[derive(clap::Args)]
struct ScheduleArgs {
    /// Restrict output to one movie ID.
    #[arg(long)]
    movie_id: Option<u32>,
}

/// Builds an `AfishaClient` for the configured city.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or the client fails to
/// build.
#[instrument(skip_all)]
fn build_afisha_client(dir: Option<&PathBuf>) -> Result<AfishaClient> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let config = AppConfig::load(&config_path).context("failed to load config")?;

    let base_url: Url = format!("https://www.afisha.ru/{}/", config.site.city)
        .parse()
        .with_context(|| format!("invalid city segment: {}", config.site.city))?;

    AfishaClient::builder()
        .base_url(base_url)
        .build()
        .context("failed to build listings client")
}

/// Resolves the schedule window length from CLI args or config fallback.
fn resolve_window_days(days: Option<u32>, dir: Option<&PathBuf>) -> Result<u32> {
    if let Some(days) = days {
        return Ok(days);
    }

    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let config = AppConfig::load(&config_path).context("failed to load config")?;
    Ok(config.sync.days)
}

/// Converts an assembled movie record to a `MovieRow` for storage.
fn to_movie_row(record: &MovieRecord) -> MovieRow {
    MovieRow {
        id: record.info.id,
        name: record.info.name.clone(),
        production_year: record.info.production_year,
        country: record.info.country.clone(),
        duration: record.info.duration.clone(),
        synopsis: record.info.synopsis.clone(),
        rating: record.info.rating,
        url: Some(record.info.url.clone()),
        image: record.image.clone(),
    }
}

/// Converts cinema info to a `CinemaRow` for storage.
fn to_cinema_row(place: &PlaceItem) -> CinemaRow {
    CinemaRow {
        id: place.id,
        name: place.name.clone(),
        address: place.address.clone(),
        rating: place.rating,
    }
}

/// Converts accepted sessions to `SessionRow`s for storage.
fn to_session_rows(sessions: &[SessionRecord]) -> Vec<SessionRow> {
    sessions
        .iter()
        .map(|s| SessionRow {
            session_id: s.id.clone(),
            datetime: s.starts_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            min_price: s.min_price.clone(),
        })
        .collect()
}

/// Walks one movie's schedule over the date window and persists each
/// cinema block. Returns the number of sessions inserted.
async fn sync_movie_schedule(
    client: &AfishaClient,
    conn: &Connection,
    record: &MovieRecord,
    window: &DateRange,
) -> Result<usize> {
    let mut pages = SchedulePages::new(client, &record.info.url, window.clone())?;

    let mut inserted: usize = 0;
    while let Some(blocks) = pages.next_page().await.with_context(|| {
        format!("failed to fetch schedule for movie {}", record.info.id)
    })? {
        for block in blocks {
            let cinema = to_cinema_row(&block.place);
            let sessions = to_session_rows(&block.sessions);
            inserted = inserted
                .saturating_add(save_cinema_sessions(conn, record.info.id, &cinema, &sessions)?);
        }
    }

    Ok(inserted)
}

/// Runs the `sync` subcommand.
///
/// Iterates listing pages for the target date, persists each movie, and
/// walks each movie's schedule over the date window.
///
/// # Errors
///
/// Returns an error if config, API, or DB operations fail.
#[instrument(skip_all)]
async fn run_sync(args: &SyncArgs, dir: Option<&PathBuf>) -> Result<()> {
    let client = build_afisha_client(dir)?;

    let date = match args.date.as_deref() {
        Some(s) => parse_date(s)?,
        None => Local::now().date_naive(),
    };
    let days = resolve_window_days(args.days, dir)?;
    let window_end = date
        .checked_add_days(Days::new(u64::from(days.saturating_sub(1))))
        .context("failed to compute window end")?;
    let window = DateRange::new(date, window_end);
    tracing::info!(
        "Listing date: {date}, schedule window: {} .. {}",
        window.start,
        window.end,
    );

    let conn = open_db(dir).context("failed to open database")?;

    let mut movies_seen: usize = 0;
    let mut movies_inserted: usize = 0;
    let mut sessions_inserted: usize = 0;

    let mut pages = MoviePages::new(&client, Some(date));
    while let Some(records) = pages
        .next_page()
        .await
        .context("failed to fetch movie listing")?
    {
        for record in records {
            movies_seen = movies_seen.saturating_add(1);
            if save_movie(&conn, &to_movie_row(&record))? {
                movies_inserted = movies_inserted.saturating_add(1);
            }
            sessions_inserted = sessions_inserted
                .saturating_add(sync_movie_schedule(&client, &conn, &record, &window).await?);
        }
    }

    tracing::info!(
        "Sync complete: {} movies seen ({} new), {} sessions inserted",
        movies_seen,
        movies_inserted,
        sessions_inserted,
    );

    Ok(())
}

/// Runs the `db movies` subcommand.
///
/// # Errors
///
/// Returns an error if DB operations fail.
#[instrument(skip_all)]
fn run_db_movies(dir: Option<&PathBuf>) -> Result<()> {
    let conn = open_db(dir).context("failed to open database")?;
    let movies = load_movies(&conn).context("failed to load movies")?;

    tracing::info!("ID\tName\t\t\tYear\tCountry\t\tRating");
    for movie in &movies {
        tracing::info!(
            "{}\t{}\t{}\t{}\t{}",
            movie.id,
            movie.name,
            movie
                .production_year
                .map_or_else(|| String::from("-"), |v| v.to_string()),
            movie.country.as_deref().unwrap_or("-"),
            movie
                .rating
                .map_or_else(|| String::from("-"), |v| v.to_string()),
        );
    }
    tracing::info!("Total: {} movies", movies.len());

    Ok(())
}

/// Runs the `db schedule` subcommand.
///
/// # Errors
///
/// Returns an error if DB operations fail.
#[instrument(skip_all)]
fn run_db_schedule(args: &ScheduleArgs, dir: Option<&PathBuf>) -> Result<()> {
    let conn = open_db(dir).context("failed to open database")?;
    let rows = match args.movie_id {
        Some(movie_id) => {
            load_schedule_for_movie(&conn, movie_id).context("failed to load schedule")?
        }
        None => load_schedule(&conn).context("failed to load schedule")?,
    };

    tracing::info!("MovieID\tCinemaID\tSessionID\tDatetime\t\tMinPrice");
    for row in &rows {
        tracing::info!(
            "{}\t{}\t{}\t{}\t{}",
            row.movie_id,
            row.cinema_id,
            row.session_id,
            row.datetime,
            row.min_price,
        );
    }
    tracing::info!("Total: {} sessions", rows.len());

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Sync(args) => run_sync(&args, cli.dir.as_ref()).await,
        Commands::Db(db) => match db.command {
            DbSubcommands::Movies => run_db_movies(cli.dir.as_ref()),
            DbSubcommands::Schedule(args) => run_db_schedule(&args, cli.dir.as_ref()),
        },
    }
}
