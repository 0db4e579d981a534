//! Emoji guessing: identify a title from its hint symbols.

use std::collections::HashSet;

use log::{debug, info};
use uuid::Uuid;

use crate::config::GameConfig;
use crate::engine::emoji::{check_guess, EmojiTable, GuessError};
use crate::models::ContentItem;

use super::Outcome;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessRecord {
    pub title: String,
    pub guess: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmojiRound {
    /// 1-based round number.
    pub number: usize,
    pub subject: ContentItem,
    pub hints: Vec<String>,
    pub resolved: Option<GuessRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmojiStep {
    Round { number: usize, hints: Vec<String> },
    Finished(Outcome),
}

/// Emoji rounds keep their own score and history instead of a
/// [`SessionState`](crate::engine::SessionState): guesses are free text judged
/// by [`check_guess`], which exact-match `record_answer` cannot express.
pub struct EmojiGame {
    id: Uuid,
    table: EmojiTable,
    subjects: Vec<ContentItem>,
    used_titles: HashSet<String>,
    rounds: usize,
    points: usize,
    played: usize,
    score: usize,
    round: Option<EmojiRound>,
    history: Vec<GuessRecord>,
    finished: bool,
}

impl EmojiGame {
    /// `subjects` are played in order; the first is the chosen title and
    /// the rest keep later rounds fresh.
    pub fn new(subjects: Vec<ContentItem>, table: EmojiTable, config: &GameConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            table,
            subjects,
            used_titles: HashSet::new(),
            rounds: config.emoji_rounds,
            points: config.emoji_points,
            played: 0,
            score: 0,
            round: None,
            history: Vec::new(),
            finished: false,
        }
    }

    pub fn round(&self) -> Option<&EmojiRound> {
        self.round.as_ref()
    }

    pub fn history(&self) -> &[GuessRecord] {
        &self.history
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_title_used(&self, title: &str) -> bool {
        self.used_titles.contains(&title.to_lowercase())
    }

    pub fn outcome(&self) -> Outcome {
        Outcome {
            score: self.score,
            total: self.rounds * self.points,
        }
    }

    /// Start the next round, or finish once every round has been played.
    ///
    /// Does nothing while the current round is unanswered.
    pub fn next(&mut self) -> Option<EmojiStep> {
        if self.finished {
            return Some(EmojiStep::Finished(self.outcome()));
        }
        if self.round.as_ref().is_some_and(|r| r.resolved.is_none()) {
            return None;
        }
        if self.played >= self.rounds {
            return Some(self.finish());
        }

        let Some(subject) = self.pick_subject() else {
            return Some(self.finish());
        };
        self.played += 1;
        let hints = self.table.hints(&subject);
        debug!("emoji game {}: round {} uses {:?}", self.id, self.played, hints);

        self.round = Some(EmojiRound {
            number: self.played,
            subject,
            hints: hints.clone(),
            resolved: None,
        });
        Some(EmojiStep::Round {
            number: self.played,
            hints,
        })
    }

    /// Judge a guess for the current round.
    pub fn guess(&mut self, text: &str) -> Result<GuessRecord, GuessError> {
        let Some(round) = self.round.as_mut().filter(|r| r.resolved.is_none()) else {
            return Err(GuessError::NotAccepting);
        };

        let is_correct = check_guess(text, &round.subject.title)?;
        if is_correct {
            self.score += self.points;
        }

        let record = GuessRecord {
            title: round.subject.title.clone(),
            guess: text.trim().to_string(),
            is_correct,
        };
        round.resolved = Some(record.clone());
        self.history.push(record.clone());
        Ok(record)
    }

    pub fn abandon(&mut self) {
        self.finished = true;
    }

    /// First unused subject, or cycle through them once all were used.
    fn pick_subject(&mut self) -> Option<ContentItem> {
        if self.subjects.is_empty() {
            return None;
        }

        let subject = self
            .subjects
            .iter()
            .find(|s| !self.used_titles.contains(&s.title.to_lowercase()))
            .unwrap_or(&self.subjects[self.played % self.subjects.len()])
            .clone();
        self.used_titles.insert(subject.title.to_lowercase());
        Some(subject)
    }

    fn finish(&mut self) -> EmojiStep {
        self.finished = true;
        let outcome = self.outcome();
        info!("emoji game {} finished: {}/{}", self.id, outcome.score, outcome.total);
        EmojiStep::Finished(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContentSource, MediaType};

    fn subject(title: &str) -> ContentItem {
        ContentItem {
            id: title.to_lowercase(),
            title: title.to_string(),
            year: "1999".to_string(),
            poster: String::new(),
            overview: "A hacker learns the truth about his world.".to_string(),
            genre: "Science Fiction, Action".to_string(),
            media_type: MediaType::Movie,
            source: ContentSource::Tmdb,
            sub_type: None,
        }
    }

    fn game(subjects: Vec<ContentItem>) -> EmojiGame {
        EmojiGame::new(subjects, EmojiTable::default(), &GameConfig::default())
    }

    #[test]
    fn test_five_rounds_with_single_subject() {
        let mut game = game(vec![subject("The Matrix")]);
        let mut rounds = 0;
        while let Some(EmojiStep::Round { number, hints }) = game.next() {
            rounds += 1;
            assert_eq!(number, rounds);
            assert!(hints.len() >= 3);
            assert!(game.guess("matrix").unwrap().is_correct);
        }
        assert_eq!(rounds, 5);
        assert_eq!(game.outcome(), Outcome { score: 10, total: 10 });
        assert!(game.is_finished());
    }

    #[test]
    fn test_subjects_not_repeated_while_unused_remain() {
        let mut game = game(vec![subject("Alpha"), subject("Beta"), subject("Gamma")]);
        let mut titles = Vec::new();
        while let Some(EmojiStep::Round { .. }) = game.next() {
            titles.push(game.round().unwrap().subject.title.clone());
            game.guess("nope").unwrap();
        }
        assert_eq!(titles[..3], ["Alpha", "Beta", "Gamma"]);
        assert_eq!(titles.len(), 5);
        assert!(game.is_title_used("gamma"));
        assert_eq!(game.outcome().score, 0);
    }

    #[test]
    fn test_short_guess_is_not_lenient() {
        let mut game = game(vec![subject("The Matrix")]);
        game.next();
        let record = game.guess("the").unwrap();
        assert!(!record.is_correct);
        assert_eq!(record.title, "The Matrix");
    }

    #[test]
    fn test_empty_guess_keeps_round_open() {
        let mut game = game(vec![subject("The Matrix")]);
        game.next();
        assert_eq!(game.guess("  "), Err(GuessError::Empty));
        assert!(game.next().is_none());
        assert!(game.guess("The Matrix").unwrap().is_correct);
        assert_eq!(game.guess("again"), Err(GuessError::NotAccepting));
    }

    #[test]
    fn test_no_subjects_finishes_immediately() {
        let mut game = game(Vec::new());
        assert_eq!(
            game.next(),
            Some(EmojiStep::Finished(Outcome { score: 0, total: 10 }))
        );
    }
}
