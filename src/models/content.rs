use serde::{Deserialize, Serialize};

/// Catalog a content item was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentSource {
    Tmdb,
    Rawg,
    Music,
}

/// Kind of work a content item describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
    Game,
    Song,
    Artist,
}

impl MediaType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
            Self::Game => "game",
            Self::Song => "song",
            Self::Artist => "artist",
        }
    }

    /// Human readable label for result lists.
    pub fn label(self) -> &'static str {
        match self {
            Self::Movie => "Movie",
            Self::Tv => "TV Series",
            Self::Game => "Video Game",
            Self::Song => "Song",
            Self::Artist => "Artist",
        }
    }
}

/// MusicBrainz entity kind, needed to pick the right lookup endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MusicKind {
    Recording,
    Artist,
}

/// Normalized metadata for a movie, show, game, song or artist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    pub title: String,
    pub year: String,
    pub poster: String,
    pub overview: String,
    pub genre: String,
    pub media_type: MediaType,
    pub source: ContentSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_type: Option<MusicKind>,
}
