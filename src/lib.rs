use rss::{ChannelBuilder, ItemBuilder};
use serde::Serialize;

pub mod catalog;
pub mod error;
pub mod tmdb;

use error::FetchError;
use tmdb::{GenreMap, NowPlayingPage};

/// One now-playing movie after the genre join and date derivation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieRow {
    pub title: String,
    /// `None` when the API sent an explicit `null`.
    pub release_date: Option<String>,
    pub genres: Vec<String>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub genres_joined: String,
}

/// Filtered rows in page-then-arrival order.
pub type MovieTable = Vec<MovieRow>;

/// Anything that can serve the genre list and the paged now-playing listing.
#[async_trait::async_trait]
pub trait MovieSource: Send + Sync {
    async fn genres(&self) -> Result<GenreMap, FetchError>;

    /// Fetch one 1-based page of the listing.
    async fn now_playing_page(&self, page: u32) -> Result<NowPlayingPage, FetchError>;
}

fn optional_cell<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Render the first `limit` rows as a fixed-width text table.
pub fn render_table(rows: &[MovieRow], limit: usize) -> String {
    let shown = &rows[..rows.len().min(limit)];
    let title_width = shown
        .iter()
        .map(|r| r.title.chars().count())
        .max()
        .unwrap_or(0)
        .max("title".len());
    let date_width = shown
        .iter()
        .map(|r| r.release_date.as_deref().map_or(1, |d| d.chars().count()))
        .max()
        .unwrap_or(0)
        .max("release_date".len());

    let mut out = format!(
        "{:<tw$}  {:<dw$}  {:>4}  {:>5}  genres\n",
        "title",
        "release_date",
        "year",
        "month",
        tw = title_width,
        dw = date_width,
    );
    for row in shown {
        out.push_str(&format!(
            "{:<tw$}  {:<dw$}  {:>4}  {:>5}  {}\n",
            row.title,
            optional_cell(row.release_date.as_deref()),
            optional_cell(row.year),
            optional_cell(row.month),
            row.genres_joined,
            tw = title_width,
            dw = date_width,
        ));
    }
    if rows.len() > shown.len() {
        out.push_str(&format!("... {} more rows\n", rows.len() - shown.len()));
    }
    out
}

/// Generate an RSS feed with one item per movie row
pub fn generate_rss(
    rows: &[MovieRow],
    channel_title: &str,
    channel_link: &str,
    channel_description: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let mut items = Vec::new();

    for row in rows {
        let mut description_parts = vec![format!(
            "Release date: {}",
            optional_cell(row.release_date.as_deref())
        )];

        if !row.genres_joined.is_empty() {
            description_parts.push(format!("Genres: {}", row.genres_joined));
        }

        if let (Some(year), Some(month)) = (row.year, row.month) {
            description_parts.push(format!("Released: {:04}-{:02}", year, month));
        }

        let mut item_builder = ItemBuilder::default();
        item_builder.title(row.title.clone());
        item_builder.description(description_parts.join("<br/>\n"));
        item_builder.categories(
            row.genres
                .iter()
                .map(|g| rss::Category {
                    name: g.clone(),
                    domain: None,
                })
                .collect::<Vec<_>>(),
        );

        items.push(item_builder.build());
    }

    let channel = ChannelBuilder::default()
        .title(channel_title)
        .link(channel_link)
        .description(channel_description)
        .last_build_date(chrono::Utc::now().to_rfc2822())
        .items(items)
        .build();

    let mut buf = Vec::new();
    channel.write_to(&mut buf)?;
    Ok(String::from_utf8(buf)?)
}
