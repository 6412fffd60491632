//! moviedeck - TMDB movie list CLI (Korean locale).

/// Application configuration (TOML).
mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::config::{AppConfig, resolve_config_path};
use moviedeck_api::tmdb::{
    MovieApi, TmdbClient, TmdbMovie, TmdbMoviePage, genre_movies_url, now_playing_movies_url,
    popular_movies_url,
};

/// Environment variable read for the API key when `--api-key` is absent.
const API_KEY_ENV: &str = "TMDB_API_KEY";

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// TMDB API key. Falls back to `TMDB_API_KEY`, then `[tmdb] api_key` in config.toml.
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Override the TMDB API base URL.
    #[arg(long, global = true, hide = true)]
    base_url: Option<Url>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Show the featured movie (first popular movie).
    Featured,
    /// List popular movies.
    Popular(PageArgs),
    /// List movies now playing in theaters.
    NowPlaying(PageArgs),
    /// List movies of a genre.
    Genre(GenreArgs),
    /// Print request URLs without sending them.
    Url(UrlCommand),
    /// Manage the config file.
    Config(ConfigCommand),
}

/// Page selection shared by list subcommands.
#[derive(clap::Args)]
struct PageArgs {
    /// Result page (default: 1, or 2 for now-playing).
    #[arg(long)]
    page: Option<u32>,
}

/// Arguments for genre subcommands.
#[derive(clap::Args)]
struct GenreArgs {
    /// TMDB genre ID (e.g. "28" for action). Passed through as-is.
    #[arg(long, required = true)]
    genre: String,
    /// Result page (default: 1).
    #[arg(long)]
    page: Option<u32>,
}

/// Arguments for the `url` subcommand.
#[derive(clap::Args)]
struct UrlCommand {
    /// Url subcommand to run.
    #[command(subcommand)]
    command: UrlSubcommands,
}

/// Available url subcommands.
#[derive(Subcommand)]
enum UrlSubcommands {
    /// `movie/popular` URL.
    Popular(PageArgs),
    /// `movie/now_playing` URL.
    NowPlaying(PageArgs),
    /// `discover/movie` URL filtered by genre.
    Genre(GenreArgs),
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Print the config file path.
    Path,
    /// Store the TMDB API key in the config file.
    SetApiKey(SetApiKeyArgs),
}

/// Arguments for the `config set-api-key` subcommand.
#[derive(clap::Args)]
struct SetApiKeyArgs {
    /// TMDB API key.
    key: String,
}

/// Picks the API key: flag, then environment, then config.
///
/// Empty values are skipped.
fn pick_api_key(flag: Option<&str>, env: Option<&str>, config: &AppConfig) -> Option<String> {
    [flag, env, config.tmdb.api_key()]
        .into_iter()
        .flatten()
        .find(|k| !k.is_empty())
        .map(String::from)
}

/// Resolves the API key for a command.
///
/// # Errors
///
/// Returns an error if no key is found.
fn resolve_api_key(cli: &Cli, config: &AppConfig) -> Result<String> {
    let env = std::env::var(API_KEY_ENV).ok();
    pick_api_key(cli.api_key.as_deref(), env.as_deref(), config).with_context(|| {
        format!("TMDB API key is required (--api-key, {API_KEY_ENV}, or [tmdb] api_key in config.toml)")
    })
}

/// Loads the config file selected by `--dir`.
///
/// # Errors
///
/// Returns an error if the path cannot be resolved or the file is invalid.
fn load_config(dir: Option<&PathBuf>) -> Result<AppConfig> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    AppConfig::load(&config_path).context("failed to load config")
}

/// Builds a `TmdbClient` using the config timeout and optional base URL.
///
/// # Errors
///
/// Returns an error if the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client(base_url: Option<&Url>, config: &AppConfig) -> Result<TmdbClient> {
    let mut builder = TmdbClient::builder().user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(url) = base_url {
        builder = builder.base_url(url.clone());
    }
    if let Some(timeout) = config.tmdb.timeout() {
        builder = builder.timeout(timeout);
    }
    builder.build().context("failed to build TMDB client")
}

/// Formats a single movie for display.
fn movie_lines(movie: &TmdbMovie) -> Vec<String> {
    let or_dash = |v: Option<&str>| String::from(v.filter(|s| !s.is_empty()).unwrap_or("-"));
    vec![
        format!("ID: {}", movie.id),
        format!("Title: {}", or_dash(Some(movie.title.as_str()))),
        format!("Original Title: {}", or_dash(movie.original_title.as_deref())),
        format!("Release Date: {}", or_dash(movie.release_date.as_deref())),
        format!(
            "Vote Average: {}",
            movie
                .vote_average
                .map_or_else(|| String::from("-"), |v| format!("{v:.1}"))
        ),
        format!("Overview: {}", or_dash(movie.overview.as_deref())),
    ]
}

/// Formats a movie page as a table for display.
fn page_lines(page: &TmdbMoviePage) -> Vec<String> {
    let mut lines = Vec::with_capacity(page.results.len().saturating_add(2));
    lines.push(format!(
        "Page {}/{} (total results: {})",
        page.page, page.total_pages, page.total_results
    ));
    lines.push(String::from("ID\tReleaseDate\tTitle"));
    for movie in &page.results {
        lines.push(format!(
            "{}\t{}\t{}",
            movie.id,
            movie
                .release_date
                .as_deref()
                .filter(|d| !d.is_empty())
                .unwrap_or("-"),
            movie.title,
        ));
    }
    lines
}

/// Logs each line at INFO.
fn emit(lines: &[String]) {
    for line in lines {
        tracing::info!("{}", line);
    }
}

/// A TMDB request selected by a subcommand.
#[derive(Clone, Copy)]
enum TmdbRequest<'a> {
    /// First popular movie.
    Featured,
    /// `movie/popular` page.
    Popular(Option<u32>),
    /// `movie/now_playing` page.
    NowPlaying(Option<u32>),
    /// `discover/movie` page for a genre.
    Genre(&'a str, Option<u32>),
}

/// Sends a TMDB request and formats the response for display.
///
/// # Errors
///
/// Returns an error if the API request fails.
async fn run_request(
    api: &impl MovieApi,
    api_key: &str,
    request: TmdbRequest<'_>,
) -> Result<Vec<String>> {
    let page = match request {
        TmdbRequest::Featured => {
            let movie = api
                .fetch_featured_movie(api_key)
                .await
                .context("TMDB featured movie request failed")?;
            return Ok(movie_lines(&movie));
        }
        TmdbRequest::Popular(page) => api
            .popular_movies(api_key, page)
            .await
            .context("TMDB movie/popular request failed")?,
        TmdbRequest::NowPlaying(page) => api
            .now_playing_movies(api_key, page)
            .await
            .context("TMDB movie/now_playing request failed")?,
        TmdbRequest::Genre(genre, page) => api
            .genre_movies(api_key, genre, page)
            .await
            .context("TMDB discover/movie request failed")?,
    };
    Ok(page_lines(&page))
}

/// Runs the `url` subcommand.
///
/// # Errors
///
/// Returns an error if the URL cannot be built.
fn run_url(command: &UrlSubcommands, api_key: &str) -> Result<Url> {
    match command {
        UrlSubcommands::Popular(args) => popular_movies_url(api_key, args.page),
        UrlSubcommands::NowPlaying(args) => now_playing_movies_url(api_key, args.page),
        UrlSubcommands::Genre(args) => genre_movies_url(api_key, &args.genre, args.page),
    }
}

/// Runs the `config` subcommand.
///
/// # Errors
///
/// Returns an error if the config path cannot be resolved or the file
/// cannot be read or written.
fn run_config(command: &ConfigSubcommands, dir: Option<&PathBuf>) -> Result<()> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    match command {
        ConfigSubcommands::Path => {
            tracing::info!("{}", config_path.display());
        }
        ConfigSubcommands::SetApiKey(args) => {
            let mut config = AppConfig::load(&config_path).context("failed to load config")?;
            config.tmdb.api_key = Some(args.key.clone());
            config.save(&config_path).context("failed to save config")?;
            tracing::info!("Saved API key to {}", config_path.display());
        }
    }
    Ok(())
}

/// Dispatches the parsed command line.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
async fn run(cli: &Cli) -> Result<()> {
    let request = match &cli.command {
        Commands::Config(cmd) => return run_config(&cmd.command, cli.dir.as_ref()),
        Commands::Url(cmd) => {
            let config = load_config(cli.dir.as_ref())?;
            let api_key = resolve_api_key(cli, &config)?;
            let url = run_url(&cmd.command, &api_key)?;
            tracing::info!("{}", url);
            return Ok(());
        }
        Commands::Featured => TmdbRequest::Featured,
        Commands::Popular(args) => TmdbRequest::Popular(args.page),
        Commands::NowPlaying(args) => TmdbRequest::NowPlaying(args.page),
        Commands::Genre(args) => TmdbRequest::Genre(&args.genre, args.page),
    };

    let config = load_config(cli.dir.as_ref())?;
    let api_key = resolve_api_key(cli, &config)?;
    let client = build_tmdb_client(cli.base_url.as_ref(), &config)?;
    let lines = run_request(&client, &api_key, request).await?;
    emit(&lines);
    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    run(&Cli::parse()).await
}
