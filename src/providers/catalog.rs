//! Aggregated search across every configured catalog.

use log::{debug, warn};
use reqwest::Client;

use crate::models::{ContentItem, ContentSource};

use super::{ContentProvider, MusicBrainzClient, ProviderError, RawgClient, TmdbClient};

/// TMDB, RAWG and MusicBrainz behind one [`ContentProvider`].
///
/// A missing source is skipped; a failing one contributes no results.
pub struct Catalog<T = TmdbClient, R = RawgClient, M = MusicBrainzClient> {
    tmdb: Option<T>,
    rawg: Option<R>,
    music: Option<M>,
}

impl<T, R, M> Catalog<T, R, M> {
    pub fn new(tmdb: Option<T>, rawg: Option<R>, music: Option<M>) -> Self {
        Self { tmdb, rawg, music }
    }
}

impl Catalog {
    /// Real clients sharing one HTTP client. Sources without a key are off.
    pub fn from_keys(http: Client, tmdb_key: Option<String>, rawg_key: Option<String>) -> Self {
        if tmdb_key.is_none() {
            warn!("no TMDB API key configured, movie and TV search disabled");
        }
        if rawg_key.is_none() {
            warn!("no RAWG API key configured, game search disabled");
        }

        Self::new(
            tmdb_key.map(|key| TmdbClient::new(http.clone(), key)),
            rawg_key.map(|key| RawgClient::new(http.clone(), key)),
            Some(MusicBrainzClient::new(http)),
        )
    }
}

async fn safe_search<P: ContentProvider>(provider: Option<&P>, query: &str, name: &str) -> Vec<ContentItem> {
    let Some(provider) = provider else {
        return Vec::new();
    };
    match provider.search(query).await {
        Ok(items) => items,
        Err(e) => {
            warn!("{} search failed: {}", name, e);
            Vec::new()
        }
    }
}

impl<T, R, M> ContentProvider for Catalog<T, R, M>
where
    T: ContentProvider,
    R: ContentProvider,
    M: ContentProvider,
{
    async fn search(&self, query: &str) -> Result<Vec<ContentItem>, ProviderError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ProviderError::EmptyQuery);
        }

        let (movies, games, music) = tokio::join!(
            safe_search(self.tmdb.as_ref(), query, "TMDB"),
            safe_search(self.rawg.as_ref(), query, "RAWG"),
            safe_search(self.music.as_ref(), query, "MusicBrainz"),
        );
        debug!(
            "catalog search {:?}: {} movies/shows, {} games, {} music",
            query,
            movies.len(),
            games.len(),
            music.len()
        );

        Ok(movies.into_iter().chain(games).chain(music).collect())
    }

    async fn details(&self, item: &ContentItem) -> Result<ContentItem, ProviderError> {
        match item.source {
            ContentSource::Tmdb => self.tmdb.as_ref().ok_or(ProviderError::Unsupported)?.details(item).await,
            ContentSource::Rawg => self.rawg.as_ref().ok_or(ProviderError::Unsupported)?.details(item).await,
            ContentSource::Music => self.music.as_ref().ok_or(ProviderError::Unsupported)?.details(item).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaType;

    struct FakeProvider {
        source: ContentSource,
        titles: Vec<&'static str>,
        fail: bool,
    }

    impl FakeProvider {
        fn new(source: ContentSource, titles: Vec<&'static str>) -> Self {
            Self {
                source,
                titles,
                fail: false,
            }
        }

        fn failing(source: ContentSource) -> Self {
            Self {
                source,
                titles: Vec::new(),
                fail: true,
            }
        }

        fn item(&self, title: &str) -> ContentItem {
            ContentItem {
                id: title.to_lowercase(),
                title: title.to_string(),
                year: "2000".to_string(),
                poster: String::new(),
                overview: String::new(),
                genre: String::new(),
                media_type: MediaType::Movie,
                source: self.source,
                sub_type: None,
            }
        }
    }

    impl ContentProvider for FakeProvider {
        async fn search(&self, _query: &str) -> Result<Vec<ContentItem>, ProviderError> {
            if self.fail {
                return Err(ProviderError::NotFound);
            }
            Ok(self.titles.iter().map(|t| self.item(t)).collect())
        }

        async fn details(&self, item: &ContentItem) -> Result<ContentItem, ProviderError> {
            Ok(ContentItem {
                overview: format!("details for {}", item.title),
                ..item.clone()
            })
        }
    }

    #[tokio::test]
    async fn test_search_merges_in_source_order() {
        let catalog = Catalog::new(
            Some(FakeProvider::new(ContentSource::Tmdb, vec!["Halo Movie"])),
            Some(FakeProvider::new(ContentSource::Rawg, vec!["Halo", "Halo 2"])),
            Some(FakeProvider::new(ContentSource::Music, vec!["Halo Song"])),
        );

        let results = catalog.search("halo").await.unwrap();
        let titles: Vec<&str> = results.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Halo Movie", "Halo", "Halo 2", "Halo Song"]);
    }

    #[tokio::test]
    async fn test_failing_and_missing_sources_are_empty() {
        let catalog = Catalog::new(
            Some(FakeProvider::failing(ContentSource::Tmdb)),
            None::<FakeProvider>,
            Some(FakeProvider::new(ContentSource::Music, vec!["Only"])),
        );

        let results = catalog.search("only").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].source, ContentSource::Music);
    }

    #[tokio::test]
    async fn test_blank_query_rejected() {
        let catalog: Catalog<FakeProvider, FakeProvider, FakeProvider> = Catalog::new(None, None, None);
        assert!(matches!(catalog.search("   ").await, Err(ProviderError::EmptyQuery)));
    }

    #[tokio::test]
    async fn test_details_dispatch_by_source() {
        let rawg = FakeProvider::new(ContentSource::Rawg, vec!["Portal"]);
        let item = rawg.item("Portal");
        let catalog: Catalog<FakeProvider, FakeProvider, FakeProvider> = Catalog::new(None, Some(rawg), None);

        let details = catalog.details(&item).await.unwrap();
        assert_eq!(details.overview, "details for Portal");

        let mut movie = item.clone();
        movie.source = ContentSource::Tmdb;
        assert!(matches!(catalog.details(&movie).await, Err(ProviderError::Unsupported)));
    }
}
