//! External collaborators: content catalogs and question generation.
//!
//! Each provider is a thin request/response wrapper. Failures are returned
//! as [`ProviderError`] and recovered by the caller.

mod catalog;
mod music;
mod openrouter;
mod rawg;
mod tmdb;

use std::future::Future;

use serde_json::Value;
use thiserror::Error;

use crate::models::ContentItem;

pub use catalog::Catalog;
pub use music::MusicBrainzClient;
pub use openrouter::{extract_json_object, OpenRouterClient, DEFAULT_MODEL};
pub use rawg::RawgClient;
pub use tmdb::TmdbClient;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Please enter a title")]
    EmptyQuery,
    #[error("{0} request failed: {1}")]
    Status(&'static str, reqwest::StatusCode),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Malformed(String),
    #[error("No matches found")]
    NotFound,
    #[error("missing {0} API key")]
    MissingKey(&'static str),
    #[error("unsupported content source")]
    Unsupported,
}

/// Searches a catalog and fetches full records.
pub trait ContentProvider: Send + Sync {
    fn search(&self, query: &str) -> impl Future<Output = Result<Vec<ContentItem>, ProviderError>> + Send;

    fn details(&self, item: &ContentItem) -> impl Future<Output = Result<ContentItem, ProviderError>> + Send;
}

/// Produces a raw question payload for a piece of content.
pub trait QuestionGenerator: Send + Sync {
    fn generate(&self, content: &ContentItem) -> impl Future<Output = Result<Value, ProviderError>> + Send;
}

/// A missing generator always fails, so play falls back to template questions.
impl<G: QuestionGenerator> QuestionGenerator for Option<G> {
    async fn generate(&self, content: &ContentItem) -> Result<Value, ProviderError> {
        match self {
            Some(generator) => generator.generate(content).await,
            None => Err(ProviderError::MissingKey("OpenRouter")),
        }
    }
}

/// `None` for missing or blank strings.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Year part of an ISO date, or "N/A".
pub(crate) fn year_of(date: Option<&str>) -> String {
    date.and_then(|d| d.split('-').next())
        .filter(|y| !y.is_empty())
        .unwrap_or("N/A")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_of() {
        assert_eq!(year_of(Some("2010-07-16")), "2010");
        assert_eq!(year_of(Some("")), "N/A");
        assert_eq!(year_of(None), "N/A");
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("x".to_string())), Some("x".to_string()));
        assert_eq!(non_empty(Some("  ".to_string())), None);
        assert_eq!(non_empty(None), None);
    }

    #[tokio::test]
    async fn test_missing_generator_fails() {
        let generator: Option<OpenRouterClient> = None;
        let content = ContentItem {
            id: "1".to_string(),
            title: "Dune".to_string(),
            year: "2021".to_string(),
            poster: String::new(),
            overview: String::new(),
            genre: String::new(),
            media_type: crate::models::MediaType::Movie,
            source: crate::models::ContentSource::Tmdb,
            sub_type: None,
        };
        assert!(matches!(
            generator.generate(&content).await,
            Err(ProviderError::MissingKey("OpenRouter"))
        ));
    }
}
