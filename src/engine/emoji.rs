//! Emoji hints and lenient title matching.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{ContentItem, MediaType};

/// Guesses and titles must both be at least this many characters before
/// substring containment counts as a match.
pub const FUZZY_MIN_CHARS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordSymbol {
    pub keyword: String,
    pub symbol: String,
}

/// Versioned keyword to symbol mapping used to build hints.
///
/// Keywords are matched in table order, so earlier entries win when the
/// hint list fills up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmojiTable {
    pub version: u32,
    pub media: Vec<(MediaType, String)>,
    pub default_media_symbol: String,
    pub keywords: Vec<KeywordSymbol>,
    pub placeholders: Vec<String>,
    pub min_hints: usize,
    pub max_hints: usize,
}

const BUILTIN_KEYWORDS: &[(&str, &str)] = &[
    ("action", "💥"), ("comedy", "😂"), ("drama", "🎭"), ("horror", "👻"),
    ("sci", "🚀"), ("science", "🔬"), ("fantasy", "✨"), ("romance", "💕"),
    ("thriller", "🔪"), ("adventure", "🗺️"), ("mystery", "🔍"), ("space", "🌌"),
    ("war", "⚔️"), ("family", "👨‍👩‍👧‍👦"), ("crime", "🕵️"), ("superhero", "🦸"),
    ("zombie", "🧟"), ("robot", "🤖"), ("alien", "👽"), ("magic", "🪄"),
    ("gun", "🔫"), ("car", "🚗"), ("plane", "✈️"), ("ship", "🚢"),
    ("train", "🚂"), ("city", "🏙️"), ("forest", "🌲"), ("ocean", "🌊"),
    ("mountain", "⛰️"), ("desert", "🏜️"), ("love", "❤️"), ("heart", "💖"),
    ("star", "⭐"), ("moon", "🌙"), ("sun", "☀️"), ("fire", "🔥"),
    ("water", "💧"), ("earth", "🌍"), ("time", "⏰"), ("money", "💰"),
    ("crown", "👑"), ("trophy", "🏆"), ("key", "🗝️"), ("house", "🏠"),
    ("castle", "🏰"), ("bridge", "🌉"), ("tower", "🗼"), ("knight", "🛡️"),
    ("dragon", "🐉"), ("wizard", "🧙"), ("potion", "🧪"), ("book", "📚"),
    ("treasure", "💎"), ("storm", "⛈️"), ("lightning", "⚡"), ("rainbow", "🌈"),
    ("snow", "❄️"), ("child", "🧒"), ("hero", "🦸"), ("villain", "😈"),
    ("monster", "👹"), ("ghost", "👻"), ("skull", "💀"), ("snake", "🐍"),
    ("spider", "🕷️"), ("wolf", "🐺"), ("cat", "🐱"), ("dog", "🐕"),
    ("horse", "🐴"), ("bird", "🐦"), ("fish", "🐟"), ("bear", "🐻"),
];

impl Default for EmojiTable {
    fn default() -> Self {
        Self {
            version: 1,
            media: vec![
                (MediaType::Movie, "🎬".to_string()),
                (MediaType::Tv, "📺".to_string()),
                (MediaType::Game, "🎮".to_string()),
                (MediaType::Song, "🎵".to_string()),
                (MediaType::Artist, "🎤".to_string()),
            ],
            default_media_symbol: "📀".to_string(),
            keywords: BUILTIN_KEYWORDS
                .iter()
                .map(|(keyword, symbol)| KeywordSymbol {
                    keyword: keyword.to_string(),
                    symbol: symbol.to_string(),
                })
                .collect(),
            placeholders: ["🎬", "⭐", "🎭", "🎪", "🎨", "🎯"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            min_hints: 3,
            max_hints: 6,
        }
    }
}

impl EmojiTable {
    fn media_symbol(&self, media_type: MediaType) -> &str {
        self.media
            .iter()
            .find(|(media, _)| *media == media_type)
            .map(|(_, symbol)| symbol.as_str())
            .unwrap_or(&self.default_media_symbol)
    }

    /// Hint symbols for `item`: its media symbol, then every keyword found
    /// in the title, genre or overview, padded with placeholders.
    pub fn hints(&self, item: &ContentItem) -> Vec<String> {
        let text = format!("{} {} {}", item.title, item.genre, item.overview).to_lowercase();
        let mut hints: Vec<String> = Vec::with_capacity(self.max_hints);

        let push = |symbol: &str, hints: &mut Vec<String>| {
            if hints.len() < self.max_hints && !hints.iter().any(|h| h == symbol) {
                hints.push(symbol.to_string());
            }
        };

        push(self.media_symbol(item.media_type), &mut hints);
        for entry in &self.keywords {
            if text.contains(entry.keyword.as_str()) {
                push(&entry.symbol, &mut hints);
            }
        }
        for placeholder in &self.placeholders {
            if hints.len() >= self.min_hints {
                break;
            }
            push(placeholder, &mut hints);
        }

        hints.truncate(self.max_hints);
        hints
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GuessError {
    #[error("Enter your answer first")]
    Empty,
    #[error("No round is waiting for a guess")]
    NotAccepting,
}

/// Judge a free-text title guess.
///
/// Exact matches ignore case and surrounding whitespace. Containment in
/// either direction also counts, but only when both sides have at least
/// [`FUZZY_MIN_CHARS`] characters.
pub fn check_guess(guess: &str, correct_title: &str) -> Result<bool, GuessError> {
    let guess = guess.trim().to_lowercase();
    if guess.is_empty() {
        return Err(GuessError::Empty);
    }
    let correct = correct_title.trim().to_lowercase();

    if guess == correct {
        return Ok(true);
    }

    let long_enough =
        guess.chars().count() >= FUZZY_MIN_CHARS && correct.chars().count() >= FUZZY_MIN_CHARS;
    Ok(long_enough && (guess.contains(&correct) || correct.contains(&guess)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContentSource;

    fn item(title: &str, genre: &str, overview: &str) -> ContentItem {
        ContentItem {
            id: "1".to_string(),
            title: title.to_string(),
            year: "2010".to_string(),
            poster: String::new(),
            overview: overview.to_string(),
            genre: genre.to_string(),
            media_type: MediaType::Movie,
            source: ContentSource::Tmdb,
            sub_type: None,
        }
    }

    #[test]
    fn test_check_guess() {
        assert_eq!(check_guess("inception", "Inception"), Ok(true));
        assert_eq!(check_guess("  INCEPTION ", "Inception"), Ok(true));
        assert_eq!(check_guess("the", "The Matrix"), Ok(false));
        assert_eq!(check_guess("matrix", "The Matrix"), Ok(true));
        assert_eq!(check_guess("The Matrix Reloaded", "The Matrix"), Ok(true));
        assert_eq!(check_guess("avatar", "Inception"), Ok(false));
        assert_eq!(check_guess("   ", "Inception"), Err(GuessError::Empty));
    }

    #[test]
    fn test_short_title_needs_exact_match() {
        assert_eq!(check_guess("Up", "Up"), Ok(true));
        assert_eq!(check_guess("Up there", "Up"), Ok(false));
    }

    #[test]
    fn test_hints_from_keywords() {
        let table = EmojiTable::default();
        let hints = table.hints(&item("Dragon Castle", "Fantasy", "A knight and a dragon"));
        assert_eq!(hints[0], "🎬");
        assert!(hints.contains(&"🐉".to_string()));
        assert!(hints.contains(&"🏰".to_string()));
        assert!(hints.contains(&"✨".to_string()));
        assert!(hints.len() <= table.max_hints);
    }

    #[test]
    fn test_hints_padded_and_deduplicated() {
        let table = EmojiTable::default();
        let hints = table.hints(&item("Qwz", "", ""));
        assert_eq!(hints.len(), table.min_hints);
        assert_eq!(hints, vec!["🎬", "⭐", "🎭"]);
    }

    #[test]
    fn test_hints_truncated() {
        let table = EmojiTable::default();
        let hints = table.hints(&item(
            "Space war robot alien zombie",
            "Action Comedy Drama Horror",
            "",
        ));
        assert_eq!(hints.len(), table.max_hints);
    }

    #[test]
    fn test_table_roundtrips_through_json() {
        let table = EmojiTable::default();
        let json = serde_json::to_string(&table).unwrap();
        let parsed: EmojiTable = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, table);

        let partial: EmojiTable = serde_json::from_str(r#"{"version": 2, "max_hints": 4}"#).unwrap();
        assert_eq!(partial.version, 2);
        assert_eq!(partial.max_hints, 4);
        assert_eq!(partial.min_hints, 3);
    }
}
