use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Achievement tier, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTier {
    Rookie,
    Strategist,
    Oracle,
}

/// Badge awarded at the end of a session. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub tier: BadgeTier,
    pub label: String,
    pub description: String,
    /// Display colour as a `#rrggbb` string.
    pub color: String,
    pub score: usize,
    pub total: usize,
    pub awarded_at: DateTime<Utc>,
}
