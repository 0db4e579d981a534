//! Game tuning loaded from optional JSON files.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::EmojiTable;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Pacing and scoring knobs shared by all modes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Classic mode time limit per question.
    pub question_time_secs: u64,
    /// Rapid-fire clock for the whole round set.
    pub rapid_fire_secs: u64,
    pub emoji_rounds: usize,
    pub rapid_fire_questions: usize,
    pub emoji_points: usize,
    pub rapid_fire_points: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            question_time_secs: 20,
            rapid_fire_secs: 30,
            emoji_rounds: 5,
            rapid_fire_questions: 5,
            emoji_points: 2,
            rapid_fire_points: 2,
        }
    }
}

impl GameConfig {
    pub fn question_time(&self) -> Duration {
        Duration::from_secs(self.question_time_secs)
    }

    pub fn rapid_fire_time(&self) -> Duration {
        Duration::from_secs(self.rapid_fire_secs)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        load_json(path.as_ref())
    }
}

impl EmojiTable {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        load_json(path.as_ref())
    }
}

fn load_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}
