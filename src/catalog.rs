//! Walks the now-playing listing, joins it against the genre list and
//! filters the result into a `MovieTable`.

use crate::error::{FetchError, or_empty};
use crate::tmdb::{GenreMap, RawMovie};
use crate::{MovieRow, MovieSource, MovieTable};
use chrono::{Datelike, NaiveDate};

pub const UNKNOWN_GENRE: &str = "Unknown";
pub const NO_DATE: &str = "no date";

/// Rows must have a raw release date sorting strictly above this string.
pub const DEFAULT_RELEASED_AFTER: &str = "2025-01-01";

/// Genre lookup. A failed request yields an empty map.
pub async fn genre_lookup(source: &dyn MovieSource) -> Result<GenreMap, FetchError> {
    or_empty(source.genres().await)
}

/// Fetch pages from `start_page` until a page comes back empty or the
/// server-reported page count is reached. Results keep arrival order.
pub async fn walk_now_playing(
    source: &dyn MovieSource,
    start_page: u32,
) -> Result<Vec<RawMovie>, FetchError> {
    let mut page = start_page.max(1);
    let mut movies = Vec::new();

    loop {
        let fetched = or_empty(source.now_playing_page(page).await)?;
        tracing::debug!(
            page,
            results = fetched.results.len(),
            total_pages = fetched.total_pages,
            "fetched now playing page"
        );
        if fetched.results.is_empty() {
            break;
        }
        movies.extend(fetched.results);

        if fetched.total_pages <= page {
            break;
        }
        page += 1;
    }

    Ok(movies)
}

/// Year and month of an ISO `YYYY-MM-DD` date, `None` for anything else.
pub fn year_month(date: &str) -> (Option<i32>, Option<u32>) {
    match NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d") {
        Ok(d) => (Some(d.year()), Some(d.month())),
        Err(_) => (None, None),
    }
}

pub fn project(movie: RawMovie, genres: &GenreMap) -> MovieRow {
    let genre_names: Vec<String> = movie
        .genre_ids
        .iter()
        .map(|id| {
            genres
                .get(id)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_GENRE.to_string())
        })
        .collect();
    let release_date = movie
        .release_date
        .unwrap_or_else(|| Some(NO_DATE.to_string()));
    let (year, month) = release_date.as_deref().map_or((None, None), year_month);
    let genres_joined = genre_names.join(", ");

    MovieRow {
        title: movie.title,
        release_date,
        genres: genre_names,
        year,
        month,
        genres_joined,
    }
}

/// Table-level filters, in order: empty genre string, then the raw date
/// string compared against `released_after`. The date check is a plain
/// string comparison, so "no date" sorts above any ISO date and survives,
/// while a null date never compares greater.
pub fn filter_table(rows: Vec<MovieRow>, released_after: &str) -> MovieTable {
    rows.into_iter()
        .filter(|row| !row.genres_joined.trim().is_empty())
        .filter(|row| {
            row.release_date
                .as_deref()
                .is_some_and(|date| date > released_after)
        })
        .collect()
}

/// Genre lookup, full listing walk and projection, without table filters.
pub async fn list_now_playing(
    source: &dyn MovieSource,
    start_page: u32,
) -> Result<Vec<MovieRow>, FetchError> {
    let genres = genre_lookup(source).await?;
    let movies = walk_now_playing(source, start_page).await?;
    Ok(movies
        .into_iter()
        .map(|movie| project(movie, &genres))
        .collect())
}

pub async fn now_playing_table(source: &dyn MovieSource) -> Result<MovieTable, FetchError> {
    now_playing_table_after(source, 1, DEFAULT_RELEASED_AFTER).await
}

pub async fn now_playing_table_after(
    source: &dyn MovieSource,
    start_page: u32,
    released_after: &str,
) -> Result<MovieTable, FetchError> {
    let rows = list_now_playing(source, start_page).await?;
    let fetched = rows.len();
    let table = filter_table(rows, released_after);
    tracing::info!(fetched, kept = table.len(), "built now playing table");
    Ok(table)
}
