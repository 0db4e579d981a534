//! RAWG video game search.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::models::{ContentItem, ContentSource, MediaType};

use super::{non_empty, year_of, ContentProvider, ProviderError};

const RAWG_BASE_URL: &str = "https://api.rawg.io/api";
const RAWG_DEFAULT_IMAGE: &str =
    "https://images.unsplash.com/photo-1511512578047-dfb367046420?auto=format&fit=crop&w=600&q=80";
const SEARCH_PAGE_SIZE: &str = "6";
const OVERVIEW_MAX_CHARS: usize = 280;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawgGame {
    id: Option<u64>,
    name: Option<String>,
    released: Option<String>,
    background_image: Option<String>,
    description_raw: Option<String>,
    short_description: Option<String>,
    genres: Vec<RawgGenre>,
}

#[derive(Debug, Deserialize)]
struct RawgGenre {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchResponse {
    results: Vec<RawgGame>,
}

#[derive(Clone)]
pub struct RawgClient {
    http: Client,
    api_key: String,
}

impl RawgClient {
    pub fn new(http: Client, api_key: String) -> Self {
        Self { http, api_key }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, &str)]) -> Result<T, ProviderError> {
        let response = self
            .http
            .get(format!("{}{}", RAWG_BASE_URL, path))
            .query(&[("key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Status("RAWG", response.status()));
        }
        Ok(response.json().await?)
    }
}

fn normalize_game(game: RawgGame) -> ContentItem {
    let genres: Vec<String> = game.genres.into_iter().map(|g| g.name).collect();
    ContentItem {
        id: game.id.map(|id| id.to_string()).unwrap_or_default(),
        title: non_empty(game.name).unwrap_or_else(|| "Untitled Game".to_string()),
        year: year_of(game.released.as_deref()),
        poster: non_empty(game.background_image).unwrap_or_else(|| RAWG_DEFAULT_IMAGE.to_string()),
        overview: non_empty(game.description_raw)
            .map(|d| d.chars().take(OVERVIEW_MAX_CHARS).collect::<String>())
            .unwrap_or_else(|| "A video game experience from RAWG.".to_string()),
        genre: if genres.is_empty() {
            "Game".to_string()
        } else {
            genres.join(", ")
        },
        media_type: MediaType::Game,
        source: ContentSource::Rawg,
        sub_type: None,
    }
}

impl ContentProvider for RawgClient {
    async fn search(&self, query: &str) -> Result<Vec<ContentItem>, ProviderError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let data: SearchResponse = self
            .get("/games", &[("search", query), ("page_size", SEARCH_PAGE_SIZE)])
            .await?;
        Ok(data
            .results
            .into_iter()
            .map(|mut game| {
                // search results carry no full description
                let short = game.short_description.take().unwrap_or_default();
                ContentItem {
                    overview: short,
                    ..normalize_game(game)
                }
            })
            .collect())
    }

    async fn details(&self, item: &ContentItem) -> Result<ContentItem, ProviderError> {
        if item.id.is_empty() {
            return Err(ProviderError::Malformed("Missing RAWG game id".to_string()));
        }
        let game: RawgGame = self.get(&format!("/games/{}", item.id), &[]).await?;
        Ok(normalize_game(game))
    }
}
