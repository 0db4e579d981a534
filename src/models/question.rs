use serde::{Deserialize, Serialize};

/// Number of answer options every question carries.
pub const OPTIONS_PER_QUESTION: usize = 4;

/// Number of questions a level holds and requires.
pub const QUESTIONS_PER_LEVEL: usize = 3;

/// Difficulty bucket of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Map a declared difficulty or level name onto a bucket.
    ///
    /// Level names are accepted as synonyms: `beginner` is easy,
    /// `intermediate` is medium and `master` is hard.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "easy" | "beginner" => Some(Self::Easy),
            "medium" | "intermediate" => Some(Self::Medium),
            "hard" | "master" => Some(Self::Hard),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    /// The level that collects questions of this difficulty.
    pub fn level(self) -> LevelId {
        match self {
            Self::Easy => LevelId::Beginner,
            Self::Medium => LevelId::Intermediate,
            Self::Hard => LevelId::Master,
        }
    }
}

/// Identifier of one of the three fixed levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelId {
    Beginner,
    Intermediate,
    Master,
}

impl LevelId {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Master => "master",
        }
    }

    pub fn difficulty(self) -> Difficulty {
        match self {
            Self::Beginner => Difficulty::Easy,
            Self::Intermediate => Difficulty::Medium,
            Self::Master => Difficulty::Hard,
        }
    }

    /// Position of the level in play order.
    pub fn ordinal(self) -> usize {
        match self {
            Self::Beginner => 0,
            Self::Intermediate => 1,
            Self::Master => 2,
        }
    }

    pub fn info(self) -> &'static LevelInfo {
        &LEVELS[self.ordinal()]
    }
}

/// Static description of a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelInfo {
    pub id: LevelId,
    pub label: &'static str,
    pub ordinal: usize,
    /// Resolved questions needed before the level shows as unlocked.
    pub unlock_after: usize,
}

/// All levels in play order.
pub const LEVELS: [LevelInfo; 3] = [
    LevelInfo {
        id: LevelId::Beginner,
        label: "Beginner",
        ordinal: 0,
        unlock_after: 0,
    },
    LevelInfo {
        id: LevelId::Intermediate,
        label: "Intermediate",
        ordinal: 1,
        unlock_after: 3,
    },
    LevelInfo {
        id: LevelId::Master,
        label: "Master",
        ordinal: 2,
        unlock_after: 6,
    },
];

/// A multiple choice question.
///
/// `correct_option` is always one of `options`, and `id` is unique within
/// the session that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub options: [String; OPTIONS_PER_QUESTION],
    pub correct_option: String,
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

impl Question {
    pub fn correct_index(&self) -> Option<usize> {
        self.options.iter().position(|o| *o == self.correct_option)
    }
}

/// Where the questions of a bank came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BankOrigin {
    Generated,
    Fallback,
}

/// Questions for a session, bucketed by level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionBank {
    levels: [Vec<Question>; 3],
    origin: BankOrigin,
}

impl QuestionBank {
    /// Build a bank from per-level question lists indexed by level ordinal.
    pub(crate) fn from_levels(levels: [Vec<Question>; 3], origin: BankOrigin) -> Self {
        Self { levels, origin }
    }

    pub fn level(&self, level: LevelId) -> &[Question] {
        &self.levels[level.ordinal()]
    }

    pub fn origin(&self) -> BankOrigin {
        self.origin
    }

    pub fn is_fallback(&self) -> bool {
        self.origin == BankOrigin::Fallback
    }

    /// Sum of all level lengths.
    pub fn total_questions(&self) -> usize {
        self.levels.iter().map(Vec::len).sum()
    }

    /// All questions, level by level.
    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.levels.iter().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_synonyms() {
        assert_eq!(Difficulty::parse("beginner"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::parse(" Intermediate "), Some(Difficulty::Medium));
        assert_eq!(Difficulty::parse("MASTER"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::parse("hard"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::parse("expert"), None);
    }

    #[test]
    fn test_levels_are_ordered() {
        for (index, level) in LEVELS.iter().enumerate() {
            assert_eq!(level.ordinal, index);
            assert_eq!(level.id.ordinal(), index);
            assert_eq!(level.id.difficulty().level(), level.id);
        }
    }
}
