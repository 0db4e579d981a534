//! TMDB movie and TV search.

use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::models::{ContentItem, ContentSource, MediaType};

use super::{non_empty, year_of, ContentProvider, ProviderError};

const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
const TMDB_IMG_BASE: &str = "https://image.tmdb.org/t/p/w500";
const DEFAULT_POSTER: &str = "https://image.tmdb.org/t/p/w500/6FfCtAuVAW8XJjZ7eWeLibRLWTw.jpg";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TmdbEntry {
    id: Option<u64>,
    title: Option<String>,
    name: Option<String>,
    original_title: Option<String>,
    original_name: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    poster_path: Option<String>,
    overview: Option<String>,
    genres: Vec<TmdbGenre>,
    media_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbGenre {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchResponse {
    results: Vec<TmdbEntry>,
}

#[derive(Clone)]
pub struct TmdbClient {
    http: Client,
    api_key: String,
}

impl TmdbClient {
    pub fn new(http: Client, api_key: String) -> Self {
        Self { http, api_key }
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<T, ProviderError> {
        let response = self
            .http
            .get(format!("{}{}", TMDB_BASE_URL, endpoint))
            .query(&[("api_key", self.api_key.as_str()), ("language", "en-US")])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Status("TMDB", response.status()));
        }
        Ok(response.json().await?)
    }
}

fn media_type_of(entry: &TmdbEntry) -> Option<MediaType> {
    match entry.media_type.as_deref() {
        Some("movie") => Some(MediaType::Movie),
        Some("tv") => Some(MediaType::Tv),
        Some(_) => None,
        None if entry.first_air_date.is_some() => Some(MediaType::Tv),
        None => Some(MediaType::Movie),
    }
}

/// Convert a TMDB record; people and other media types yield `None`.
fn normalize_entry(entry: TmdbEntry) -> Option<ContentItem> {
    let media_type = media_type_of(&entry)?;
    let date = non_empty(entry.release_date).or(non_empty(entry.first_air_date));
    let genres: Vec<String> = entry.genres.into_iter().map(|g| g.name).collect();

    Some(ContentItem {
        id: entry.id.map(|id| id.to_string()).unwrap_or_default(),
        title: non_empty(entry.title)
            .or(non_empty(entry.name))
            .or(non_empty(entry.original_title))
            .or(non_empty(entry.original_name))
            .unwrap_or_else(|| "Untitled".to_string()),
        year: year_of(date.as_deref()),
        poster: non_empty(entry.poster_path)
            .map(|path| format!("{}{}", TMDB_IMG_BASE, path))
            .unwrap_or_else(|| DEFAULT_POSTER.to_string()),
        overview: non_empty(entry.overview).unwrap_or_else(|| "No overview available.".to_string()),
        genre: if genres.is_empty() {
            "Unknown".to_string()
        } else {
            genres.join(", ")
        },
        media_type,
        source: ContentSource::Tmdb,
        sub_type: None,
    })
}

impl ContentProvider for TmdbClient {
    async fn search(&self, query: &str) -> Result<Vec<ContentItem>, ProviderError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ProviderError::EmptyQuery);
        }

        let data: SearchResponse = self
            .get("/search/multi", &[("query", query), ("include_adult", "false")])
            .await?;
        let matches: Vec<ContentItem> = data
            .results
            .into_iter()
            .filter(|entry| matches!(entry.media_type.as_deref(), Some("movie" | "tv")))
            .filter_map(normalize_entry)
            .collect();

        debug!("TMDB returned {} matches for {:?}", matches.len(), query);
        if matches.is_empty() {
            return Err(ProviderError::NotFound);
        }
        Ok(matches)
    }

    async fn details(&self, item: &ContentItem) -> Result<ContentItem, ProviderError> {
        if item.id.is_empty() {
            return Err(ProviderError::Malformed("Missing TMDB id".to_string()));
        }
        let kind = match item.media_type {
            MediaType::Tv => "tv",
            _ => "movie",
        };

        let mut entry: TmdbEntry = self.get(&format!("/{}/{}", kind, item.id), &[]).await?;
        entry.media_type = Some(kind.to_string());
        normalize_entry(entry).ok_or(ProviderError::NotFound)
    }
}
