//! Per-game progression state.
//!
//! A [`SessionState`] owns its bank, the set of presented question ids and
//! the answer history. All mutation goes through its methods.

use std::collections::HashSet;

use log::debug;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{LevelId, LevelInfo, Question, QuestionBank, LEVELS};

/// One resolved question. `selected` is `None` when the question timed out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerRecord {
    pub level: LevelId,
    pub selected: Option<String>,
    pub correct_option: String,
    pub is_correct: bool,
}

pub struct SessionState {
    id: Uuid,
    bank: QuestionBank,
    level_index: usize,
    /// Questions presented in the current level.
    question_cursor: usize,
    /// Next position to scan from, per level.
    read_cursors: [usize; 3],
    used_question_ids: HashSet<String>,
    score: usize,
    total_questions: usize,
    history: Vec<AnswerRecord>,
}

impl SessionState {
    pub fn new(bank: QuestionBank) -> Self {
        let total_questions = bank.total_questions();
        let id = Uuid::new_v4();
        debug!("session {} created with {} questions", id, total_questions);

        Self {
            id,
            bank,
            level_index: 0,
            question_cursor: 0,
            read_cursors: [0; 3],
            used_question_ids: HashSet::new(),
            score: 0,
            total_questions,
            history: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// The level being played, or `None` once every level is complete.
    pub fn current_level(&self) -> Option<&'static LevelInfo> {
        LEVELS.get(self.level_index)
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn question_cursor(&self) -> usize {
        self.question_cursor
    }

    pub fn is_complete(&self) -> bool {
        self.level_index >= LEVELS.len()
    }

    /// A level unlocks once play has reached it or enough questions were resolved.
    pub fn is_level_unlocked(&self, level: &LevelInfo) -> bool {
        self.level_index >= level.ordinal || self.history.len() >= level.unlock_after
    }

    /// Next unused question of the current level, marked used on return.
    ///
    /// The scan starts at the level's read cursor and wraps around once.
    /// `None` means the level is exhausted and the caller should advance.
    pub fn select_next_question(&mut self) -> Option<Question> {
        let level = self.current_level()?;
        let questions = self.bank.level(level.id);
        let len = questions.len();
        let start = self.read_cursors[level.ordinal];

        for offset in 0..len {
            let index = (start + offset) % len;
            let question = &questions[index];
            if self.used_question_ids.contains(&question.id) {
                continue;
            }

            self.used_question_ids.insert(question.id.clone());
            self.read_cursors[level.ordinal] = index + 1;
            self.question_cursor += 1;
            return Some(question.clone());
        }

        debug!("session {}: level {} exhausted", self.id, level.id.as_str());
        None
    }

    /// Mark an id as already presented, e.g. one carried over from elsewhere.
    pub fn mark_used(&mut self, question_id: &str) {
        self.used_question_ids.insert(question_id.to_string());
    }

    pub fn is_used(&self, question_id: &str) -> bool {
        self.used_question_ids.contains(question_id)
    }

    pub fn used_count(&self) -> usize {
        self.used_question_ids.len()
    }

    /// Record a resolved question and return whether it was correct.
    ///
    /// A `None` selection (timeout) is always incorrect.
    pub fn record_answer(&mut self, selected: Option<&str>, correct_option: &str) -> bool {
        let is_correct = selected == Some(correct_option);
        if is_correct {
            self.score += 1;
        }

        // Past the last level the record is attributed to the final one.
        let level = self
            .current_level()
            .unwrap_or(&LEVELS[LEVELS.len() - 1])
            .id;
        self.history.push(AnswerRecord {
            level,
            selected: selected.map(String::from),
            correct_option: correct_option.to_string(),
            is_correct,
        });
        is_correct
    }

    /// Move to the next level. Returns `true` once every level is complete.
    pub fn advance_level(&mut self) -> bool {
        if !self.is_complete() {
            self.level_index += 1;
            self.question_cursor = 0;
        }
        let complete = self.is_complete();
        debug!(
            "session {}: advanced to level index {} (complete = {})",
            self.id, self.level_index, complete
        );
        complete
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn total_questions(&self) -> usize {
        self.total_questions
    }

    pub fn history(&self) -> &[AnswerRecord] {
        &self.history
    }

    pub fn correct_count(&self) -> usize {
        self.history.iter().filter(|r| r.is_correct).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ids::QuestionIds;
    use crate::engine::normalizer::fallback_bank;
    use crate::models::QUESTIONS_PER_LEVEL;

    fn session() -> SessionState {
        let mut ids = QuestionIds::new();
        SessionState::new(fallback_bank("Arrival", &mut ids))
    }

    #[test]
    fn test_new_session() {
        let state = session();
        assert_eq!(state.score(), 0);
        assert_eq!(state.level_index(), 0);
        assert_eq!(state.question_cursor(), 0);
        assert_eq!(state.total_questions(), 9);
        assert!(state.history().is_empty());
        assert_eq!(state.current_level().map(|l| l.id), Some(LevelId::Beginner));
    }

    #[test]
    fn test_select_marks_used_and_exhausts() {
        let mut state = session();
        let mut seen = HashSet::new();
        for _ in 0..QUESTIONS_PER_LEVEL {
            let q = state.select_next_question().unwrap();
            assert!(state.is_used(&q.id));
            assert!(seen.insert(q.id));
        }
        assert!(state.select_next_question().is_none());
        assert_eq!(state.question_cursor(), QUESTIONS_PER_LEVEL);
    }

    #[test]
    fn test_select_wraps_past_externally_used_ids() {
        let mut state = session();
        let ids: Vec<String> = state
            .bank()
            .level(LevelId::Beginner)
            .iter()
            .map(|q| q.id.clone())
            .collect();
        state.mark_used(&ids[0]);
        state.mark_used(&ids[2]);

        let q = state.select_next_question().unwrap();
        assert_eq!(q.id, ids[1]);
        assert!(state.select_next_question().is_none());
    }

    #[test]
    fn test_select_never_repeats_across_levels() {
        let mut state = session();
        let mut seen = HashSet::new();
        loop {
            while let Some(q) = state.select_next_question() {
                assert!(seen.insert(q.id.clone()));
            }
            if state.advance_level() {
                break;
            }
        }
        assert_eq!(seen.len(), 9);
        assert_eq!(state.used_count(), 9);
        assert!(state.select_next_question().is_none());
    }

    #[test]
    fn test_record_answer() {
        let mut state = session();
        assert!(state.record_answer(Some("Past"), "Past"));
        assert!(!state.record_answer(Some("past"), "Past"));
        assert!(!state.record_answer(None, "Past"));

        assert_eq!(state.score(), 1);
        assert_eq!(state.correct_count(), state.score());
        assert_eq!(state.history().len(), 3);
        assert!(state.score() <= state.history().len());
        assert_eq!(state.history()[2].selected, None);
        for record in state.history().iter().filter(|r| r.is_correct) {
            assert_eq!(record.selected.as_deref(), Some(record.correct_option.as_str()));
        }
    }

    #[test]
    fn test_advance_level_reports_completion_on_last_call() {
        let mut state = session();
        let results: Vec<bool> = (0..LEVELS.len()).map(|_| state.advance_level()).collect();
        assert_eq!(results, vec![false, false, true]);
        assert!(state.current_level().is_none());

        // stays complete and never moves backwards
        assert!(state.advance_level());
        assert_eq!(state.level_index(), LEVELS.len());
    }

    #[test]
    fn test_advance_level_keeps_used_ids() {
        let mut state = session();
        state.select_next_question();
        state.advance_level();
        assert_eq!(state.used_count(), 1);
        assert_eq!(state.question_cursor(), 0);
    }

    #[test]
    fn test_level_locks() {
        let mut state = session();
        assert!(state.is_level_unlocked(&LEVELS[0]));
        assert!(!state.is_level_unlocked(&LEVELS[1]));

        for _ in 0..QUESTIONS_PER_LEVEL {
            state.record_answer(None, "x");
        }
        assert!(state.is_level_unlocked(&LEVELS[1]));
        assert!(!state.is_level_unlocked(&LEVELS[2]));

        state.advance_level();
        state.advance_level();
        assert!(state.is_level_unlocked(&LEVELS[2]));
    }
}
