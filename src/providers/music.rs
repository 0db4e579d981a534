//! MusicBrainz recording and artist search.

use reqwest::header::USER_AGENT;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::models::{ContentItem, ContentSource, MediaType, MusicKind};

use super::{non_empty, year_of, ContentProvider, ProviderError};

const MUSIC_BASE_URL: &str = "https://musicbrainz.org/ws/2";
const MUSIC_USER_AGENT: &str = "PIXELQuiz/1.0 (localhost)";
const MUSIC_DEFAULT_IMAGE: &str =
    "https://images.unsplash.com/photo-1485579149621-3123dd979885?auto=format&fit=crop&w=600&q=80";
const SEARCH_LIMIT: &str = "5";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Recording {
    id: String,
    title: Option<String>,
    #[serde(rename = "first-release-date")]
    first_release_date: Option<String>,
    releases: Vec<Release>,
    #[serde(rename = "artist-credit")]
    artist_credit: Vec<ArtistCredit>,
    disambiguation: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Release {
    date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ArtistCredit {
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Artist {
    id: String,
    name: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    disambiguation: Option<String>,
    #[serde(rename = "life-span")]
    life_span: Option<LifeSpan>,
    genres: Vec<Tag>,
    tags: Vec<Tag>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LifeSpan {
    begin: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Tag {
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RecordingSearch {
    recordings: Vec<Recording>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ArtistSearch {
    artists: Vec<Artist>,
}

#[derive(Clone)]
pub struct MusicBrainzClient {
    http: Client,
}

impl MusicBrainzClient {
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, &str)]) -> Result<T, ProviderError> {
        let response = self
            .http
            .get(format!("{}{}", MUSIC_BASE_URL, path))
            .header(USER_AGENT, MUSIC_USER_AGENT)
            .query(&[("fmt", "json")])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Status("MusicBrainz", response.status()));
        }
        Ok(response.json().await?)
    }
}

fn normalize_recording(recording: Recording) -> ContentItem {
    let release = non_empty(recording.first_release_date)
        .or_else(|| recording.releases.into_iter().next().and_then(|r| non_empty(r.date)));
    let year = year_of(release.as_deref());
    let artist = recording
        .artist_credit
        .into_iter()
        .next()
        .and_then(|a| non_empty(a.name))
        .unwrap_or_else(|| "Unknown artist".to_string());

    let overview = if year == "N/A" {
        format!("Song by {}.", artist)
    } else {
        format!("Song by {} released around {}.", artist, year)
    };

    ContentItem {
        id: recording.id,
        title: non_empty(recording.title).unwrap_or_else(|| "Untitled Song".to_string()),
        year,
        poster: MUSIC_DEFAULT_IMAGE.to_string(),
        overview,
        genre: non_empty(recording.disambiguation).unwrap_or_else(|| "Song".to_string()),
        media_type: MediaType::Song,
        source: ContentSource::Music,
        sub_type: Some(MusicKind::Recording),
    }
}

fn normalize_artist(artist: Artist) -> ContentItem {
    let begin = artist.life_span.and_then(|span| span.begin);
    let kind = non_empty(artist.kind);
    // lookups fill a missing disambiguation from genres, then tags
    let first_tag = |tags: Vec<Tag>| tags.into_iter().find_map(|t| non_empty(t.name));
    let disambiguation = non_empty(artist.disambiguation)
        .or_else(|| first_tag(artist.genres))
        .or_else(|| first_tag(artist.tags));

    ContentItem {
        id: artist.id,
        title: non_empty(artist.name).unwrap_or_else(|| "Unknown Artist".to_string()),
        year: year_of(begin.as_deref()),
        poster: MUSIC_DEFAULT_IMAGE.to_string(),
        overview: disambiguation
            .or_else(|| kind.clone())
            .unwrap_or_else(|| "Performer from MusicBrainz.".to_string()),
        genre: kind.unwrap_or_else(|| "Artist".to_string()),
        media_type: MediaType::Artist,
        source: ContentSource::Music,
        sub_type: Some(MusicKind::Artist),
    }
}

impl ContentProvider for MusicBrainzClient {
    async fn search(&self, query: &str) -> Result<Vec<ContentItem>, ProviderError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let params = [("query", query), ("limit", SEARCH_LIMIT)];
        let (recordings, artists) = tokio::try_join!(
            self.get::<RecordingSearch>("/recording/", &params),
            self.get::<ArtistSearch>("/artist/", &params),
        )?;

        Ok(recordings
            .recordings
            .into_iter()
            .map(normalize_recording)
            .chain(artists.artists.into_iter().map(normalize_artist))
            .collect())
    }

    async fn details(&self, item: &ContentItem) -> Result<ContentItem, ProviderError> {
        if item.id.is_empty() {
            return Err(ProviderError::Malformed("Missing MusicBrainz id".to_string()));
        }

        match item.sub_type {
            Some(MusicKind::Artist) => {
                let artist: Artist = self
                    .get(&format!("/artist/{}", item.id), &[("inc", "genres+tags")])
                    .await?;
                Ok(normalize_artist(artist))
            }
            _ => {
                let recording: Recording = self
                    .get(&format!("/recording/{}", item.id), &[("inc", "artists+releases")])
                    .await?;
                Ok(normalize_recording(recording))
            }
        }
    }
}
