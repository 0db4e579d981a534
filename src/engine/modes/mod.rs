//! Play-mode policies layered on the question-selection substrate.
//!
//! Every mode ends the same way: an [`Outcome`] handed to
//! [`resolve`](crate::engine::badge::resolve).

mod classic;
mod emoji;
mod rapid_fire;

pub use classic::{ClassicGame, ClassicStep};
pub use emoji::{EmojiGame, EmojiRound, EmojiStep, GuessRecord};
pub use rapid_fire::{prepare_rapid_question, RapidFireGame, RapidStep};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModeKind {
    Classic,
    Emoji,
    RapidFire,
}

impl ModeKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Classic => "Classic",
            Self::Emoji => "Emoji Guess",
            Self::RapidFire => "Rapid Fire",
        }
    }

    /// Cycle order on the home screen.
    pub fn next(self) -> Self {
        match self {
            Self::Classic => Self::Emoji,
            Self::Emoji => Self::RapidFire,
            Self::RapidFire => Self::Classic,
        }
    }

    /// Whether the mode plays from a generated question bank.
    pub fn needs_questions(self) -> bool {
        !matches!(self, Self::Emoji)
    }
}

/// Final result of a mode, in that mode's points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub score: usize,
    pub total: usize,
}

/// How a multiple choice question was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    /// `None` when the question timed out.
    pub selected: Option<String>,
    pub correct_option: String,
    pub is_correct: bool,
}
