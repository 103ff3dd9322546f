use clap::{Parser, ValueEnum};
use now_playing::catalog::{DEFAULT_RELEASED_AFTER, now_playing_table_after};
use now_playing::tmdb::{API_BASE_URL, DEFAULT_LANGUAGE, DEFAULT_REGION, TmdbClient, TmdbConfig};
use now_playing::{generate_rss, render_table};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Table,
    Json,
    Rss,
}

/// Fetch the movies currently playing in a region from TMDB and print them as a table.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TMDB API key.
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    api_key: String,

    /// Language tag sent with every request.
    #[arg(long, default_value = DEFAULT_LANGUAGE)]
    language: String,

    /// Region code for the now playing listing.
    #[arg(long, default_value = DEFAULT_REGION)]
    region: String,

    /// Base URL of the TMDB API.
    #[arg(long, default_value = API_BASE_URL)]
    base_url: String,

    /// First listing page to fetch.
    #[arg(long, default_value_t = 1)]
    start_page: u32,

    /// Keep rows whose release date string sorts after this value.
    #[arg(long, default_value = DEFAULT_RELEASED_AFTER)]
    released_after: String,

    #[arg(long, value_enum, default_value_t = Format::Table)]
    format: Format,

    /// Number of rows shown by the table format.
    #[arg(long, default_value_t = 5)]
    head: usize,

    /// Write the output to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = TmdbConfig::new(args.api_key)
        .language(args.language)
        .region(args.region.clone())
        .base_url(args.base_url);
    let client = TmdbClient::new(config)?;

    let table = now_playing_table_after(&client, args.start_page, &args.released_after).await?;

    let rendered = match args.format {
        Format::Table => render_table(&table, args.head),
        Format::Json => serde_json::to_string_pretty(&table)?,
        Format::Rss => generate_rss(
            &table,
            &format!("Now playing ({})", args.region),
            "https://www.themoviedb.org/movie/now-playing",
            &format!("Movies now playing in {} released after {}", args.region, args.released_after),
        )?,
    };

    match args.output {
        Some(path) => {
            std::fs::write(&path, rendered)?;
            tracing::info!(path = %path.display(), rows = table.len(), "wrote output");
        }
        None => print!("{}", rendered),
    }

    Ok(())
}
