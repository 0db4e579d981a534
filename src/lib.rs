//! # pixel-quiz
//!
//! A terminal trivia game about movies, games and music.
//!
//! Search a title, then play one of three modes against it: classic
//! levels, emoji guessing or a rapid-fire round. Each finished run
//! resolves to a badge that can be saved locally.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pixel_quiz::{runtime, App, Catalog, EmojiTable, GameConfig, JsonBadgeStore, MemoryBadgeStore};
//! use pixel_quiz::data::BadgeStore;
//! use pixel_quiz::providers::OpenRouterClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), pixel_quiz::PixelQuizError> {
//!     let http = reqwest::Client::new();
//!     let catalog = Catalog::from_keys(http, None, None);
//!     let generator: Option<OpenRouterClient> = None;
//!     let store = MemoryBadgeStore::default();
//!
//!     let mut app = App::new(GameConfig::default(), EmojiTable::default(), store.load());
//!     runtime::run(&mut app, catalog, generator, store)
//! }
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod engine;
pub mod models;
pub mod providers;
pub mod runtime;
pub mod terminal;
mod ui;

use std::io;

use thiserror::Error;

pub use app::{App, AppEvent, Effect, Screen};
pub use config::{ConfigError, GameConfig};
pub use data::{JsonBadgeStore, MemoryBadgeStore, StoreError};
pub use engine::{EmojiTable, ModeKind};
pub use models::{Badge, ContentItem, Question, QuestionBank};
pub use providers::{Catalog, ProviderError};

/// Error type for setting up and running the game.
#[derive(Debug, Error)]
pub enum PixelQuizError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("badge store error: {0}")]
    Store(#[from] StoreError),
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
