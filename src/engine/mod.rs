//! Quiz progression and question selection.

pub mod badge;
pub mod clock;
pub mod emoji;
pub mod ids;
pub mod modes;
pub mod normalizer;
pub mod session;

pub use badge::resolve;
pub use clock::{Countdown, TimerToken};
pub use emoji::{check_guess, EmojiTable, GuessError};
pub use ids::QuestionIds;
pub use modes::{ModeKind, Outcome};
pub use normalizer::{fallback_bank, normalize};
pub use session::{AnswerRecord, SessionState};
