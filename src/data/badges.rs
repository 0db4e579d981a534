use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use thiserror::Error;

use crate::models::Badge;

pub const DEFAULT_BADGES_PATH: &str = "pixel_badges.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode badges: {0}")]
    Json(#[from] serde_json::Error),
}

/// Append-only history of earned badges.
pub trait BadgeStore {
    /// Every saved badge, oldest first. Unreadable storage is empty.
    fn load(&self) -> Vec<Badge>;

    /// Append `badge` and return the full history.
    fn save(&mut self, badge: Badge) -> Result<Vec<Badge>, StoreError>;
}

/// Badges kept as a pretty-printed JSON array on disk.
pub struct JsonBadgeStore {
    path: PathBuf,
}

impl JsonBadgeStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for JsonBadgeStore {
    fn default() -> Self {
        Self::new(DEFAULT_BADGES_PATH)
    }
}

impl BadgeStore for JsonBadgeStore {
    fn load(&self) -> Vec<Badge> {
        let json_content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Vec::new(),
            Err(err) => {
                warn!("Failed to read {}: {}", self.path.display(), err);
                return Vec::new();
            }
        };

        serde_json::from_str(&json_content).unwrap_or_else(|err| {
            warn!("Failed to parse {}: {}", self.path.display(), err);
            Vec::new()
        })
    }

    fn save(&mut self, badge: Badge) -> Result<Vec<Badge>, StoreError> {
        let mut badges = self.load();
        badges.push(badge);

        let json_content = serde_json::to_string_pretty(&badges)?;
        fs::write(&self.path, json_content).map_err(|source| StoreError::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        debug!("saved badge #{} to {}", badges.len(), self.path.display());
        Ok(badges)
    }
}

#[derive(Debug, Default)]
pub struct MemoryBadgeStore {
    badges: Vec<Badge>,
}

impl BadgeStore for MemoryBadgeStore {
    fn load(&self) -> Vec<Badge> {
        self.badges.clone()
    }

    fn save(&mut self, badge: Badge) -> Result<Vec<Badge>, StoreError> {
        self.badges.push(badge);
        Ok(self.badges.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::resolve;
    use crate::models::BadgeTier;

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("pixel-badges-{}.json", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_missing_file_is_empty() {
        let store = JsonBadgeStore::new(temp_path());
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_json_store_appends() {
        let path = temp_path();
        let mut store = JsonBadgeStore::new(&path);

        let first = store.save(resolve(2, 9)).unwrap();
        assert_eq!(first.len(), 1);
        let second = store.save(resolve(9, 9)).unwrap();
        assert_eq!(second.len(), 2);

        let reopened = JsonBadgeStore::new(&path).load();
        assert_eq!(reopened, second);
        assert_eq!(reopened[1].tier, BadgeTier::Oracle);

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_corrupt_file_is_empty() {
        let path = temp_path();
        fs::write(&path, "not json").unwrap();

        let store = JsonBadgeStore::new(&path);
        assert!(store.load().is_empty());

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryBadgeStore::default();
        let history = store.save(resolve(5, 9)).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(store.load()[0].label, "Cyber Strategist");
    }
}
