mod badge;
mod content;
mod question;

pub use badge::{Badge, BadgeTier};
pub use content::{ContentItem, ContentSource, MediaType, MusicKind};
pub use question::{
    BankOrigin, Difficulty, LevelId, LevelInfo, Question, QuestionBank, LEVELS,
    OPTIONS_PER_QUESTION, QUESTIONS_PER_LEVEL,
};
