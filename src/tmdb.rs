//! Client for the TMDB v3 API: genre list and the paged "now playing" listing.
//! Every request carries the API key and language as query parameters.

use crate::MovieSource;
use crate::error::FetchError;
use reqwest::{Client, StatusCode, header};
use serde::{Deserialize, Deserializer};
use serde::de::DeserializeOwned;
use std::collections::HashMap;

pub const API_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const GENRE_LIST_ENDPOINT: &str = "/genre/movie/list";
pub const NOW_PLAYING_ENDPOINT: &str = "/movie/now_playing";

pub const DEFAULT_LANGUAGE: &str = "en-US";
pub const DEFAULT_REGION: &str = "US";

/// Genre id to display name.
pub type GenreMap = HashMap<u32, String>;

#[derive(Debug, Clone)]
pub struct TmdbConfig {
    pub api_key: String,
    pub language: String,
    pub region: String,
    pub base_url: String,
}

impl TmdbConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            language: DEFAULT_LANGUAGE.to_string(),
            region: DEFAULT_REGION.to_string(),
            base_url: API_BASE_URL.to_string(),
        }
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct GenreList {
    #[serde(default)]
    pub genres: Vec<Genre>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

/// One listing entry as returned by the API. `title` is mandatory: a page
/// containing an entry without it fails to decode.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawMovie {
    pub title: String,
    /// `None` when the key is missing, `Some(None)` when it is `null`.
    #[serde(default, deserialize_with = "present")]
    pub release_date: Option<Option<String>>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NowPlayingPage {
    #[serde(default)]
    pub results: Vec<RawMovie>,
    #[serde(default = "single_page")]
    pub total_pages: u32,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

fn single_page() -> u32 {
    1
}

impl Default for NowPlayingPage {
    fn default() -> Self {
        Self {
            results: Vec::new(),
            total_pages: single_page(),
        }
    }
}

pub struct TmdbClient {
    client: Client,
    config: TmdbConfig,
}

impl TmdbClient {
    pub fn new(config: TmdbConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: TmdbConfig) -> Self {
        Self { client, config }
    }

    /// Caller parameters plus `api_key` and `language`; the configured
    /// values win over caller keys of the same name.
    pub fn query_for(&self, params: &[(&str, String)]) -> Vec<(String, String)> {
        let mut query: Vec<(String, String)> = params
            .iter()
            .filter(|(key, _)| *key != "api_key" && *key != "language")
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect();
        query.push(("api_key".to_string(), self.config.api_key.clone()));
        query.push(("language".to_string(), self.config.language.clone()));
        query
    }

    /// GET `endpoint` below the base URL and decode the JSON body.
    /// Anything but 200 is a `FetchError::Status`.
    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint);
        let transport = |source: reqwest::Error| FetchError::Transport {
            endpoint: endpoint.to_string(),
            source,
        };

        let resp = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .query(&self.query_for(params))
            .send()
            .await
            .map_err(transport)?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status {
                endpoint: endpoint.to_string(),
                status,
            });
        }

        let body = resp.text().await.map_err(transport)?;
        serde_json::from_str(&body).map_err(|source| FetchError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    pub async fn genres(&self) -> Result<GenreMap, FetchError> {
        let list: GenreList = self.get(GENRE_LIST_ENDPOINT, &[]).await?;
        Ok(list.genres.into_iter().map(|g| (g.id, g.name)).collect())
    }

    pub async fn now_playing_page(&self, page: u32) -> Result<NowPlayingPage, FetchError> {
        let params = [
            ("region", self.config.region.clone()),
            ("page", page.to_string()),
        ];
        self.get(NOW_PLAYING_ENDPOINT, &params).await
    }
}

#[async_trait::async_trait]
impl MovieSource for TmdbClient {
    async fn genres(&self) -> Result<GenreMap, FetchError> {
        TmdbClient::genres(self).await
    }

    async fn now_playing_page(&self, page: u32) -> Result<NowPlayingPage, FetchError> {
        TmdbClient::now_playing_page(self, page).await
    }
}
