//! Tiered classic quiz: three timed questions per level, every level played.

use std::time::Duration;

use log::{debug, info};

use crate::config::GameConfig;
use crate::engine::clock::{Countdown, TimerToken};
use crate::engine::session::SessionState;
use crate::models::{LevelInfo, Question, QuestionBank, QUESTIONS_PER_LEVEL};

use super::{AnswerOutcome, Outcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassicStep {
    /// A new question is on screen and its countdown has started.
    Question {
        question: Question,
        level: &'static LevelInfo,
        timer: TimerToken,
        duration: Duration,
    },
    Finished(Outcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    NotStarted,
    Awaiting,
    Resolved,
    Finished,
}

pub struct ClassicGame {
    session: SessionState,
    clock: Countdown,
    question_time: Duration,
    current: Option<Question>,
    last: Option<AnswerOutcome>,
    resolved_in_level: usize,
    phase: Phase,
}

impl ClassicGame {
    pub fn new(bank: QuestionBank, config: &GameConfig) -> Self {
        let session = SessionState::new(bank);
        let clock = Countdown::new(session.id());
        Self {
            session,
            clock,
            question_time: config.question_time(),
            current: None,
            last: None,
            resolved_in_level: 0,
            phase: Phase::NotStarted,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn current(&self) -> Option<&Question> {
        self.current.as_ref()
    }

    /// Resolution of the question on screen, once it has one.
    pub fn last_outcome(&self) -> Option<&AnswerOutcome> {
        self.last.as_ref()
    }

    pub fn is_awaiting_answer(&self) -> bool {
        self.phase == Phase::Awaiting
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub fn remaining(&self) -> Option<Duration> {
        self.clock.remaining()
    }

    pub fn outcome(&self) -> Outcome {
        Outcome {
            score: self.session.score(),
            total: self.session.total_questions(),
        }
    }

    pub fn start(&mut self) -> ClassicStep {
        info!("classic session {} started", self.session.id());
        self.advance()
    }

    /// Resolve the current question with the player's choice.
    ///
    /// Returns `None` when no question is waiting for an answer.
    pub fn answer(&mut self, selected: &str) -> Option<AnswerOutcome> {
        if self.phase != Phase::Awaiting {
            return None;
        }
        self.clock.cancel();
        Some(self.resolve(Some(selected)))
    }

    /// Resolve the current question as a timeout. Stale tokens are ignored.
    pub fn on_timeout(&mut self, token: TimerToken) -> Option<AnswerOutcome> {
        if self.phase != Phase::Awaiting || !self.clock.expire(token) {
            debug!("classic session {}: ignoring stale timer {:?}", self.session.id(), token);
            return None;
        }
        Some(self.resolve(None))
    }

    /// Move on after a resolved question.
    ///
    /// Returns `None` while the current question is still unanswered.
    pub fn next(&mut self) -> Option<ClassicStep> {
        match self.phase {
            Phase::Resolved | Phase::NotStarted => Some(self.advance()),
            Phase::Finished => Some(ClassicStep::Finished(self.outcome())),
            Phase::Awaiting => None,
        }
    }

    /// Stop the countdown; the game accepts nothing afterwards.
    pub fn abandon(&mut self) {
        self.clock.cancel();
        self.phase = Phase::Finished;
    }

    fn resolve(&mut self, selected: Option<&str>) -> AnswerOutcome {
        let correct_option = self
            .current
            .as_ref()
            .map(|q| q.correct_option.clone())
            .unwrap_or_default();
        let is_correct = self.session.record_answer(selected, &correct_option);
        self.resolved_in_level += 1;
        self.phase = Phase::Resolved;

        let outcome = AnswerOutcome {
            selected: selected.map(String::from),
            correct_option,
            is_correct,
        };
        self.last = Some(outcome.clone());
        outcome
    }

    fn advance(&mut self) -> ClassicStep {
        self.last = None;
        loop {
            if self.session.is_complete() {
                return self.finish();
            }

            if self.resolved_in_level >= QUESTIONS_PER_LEVEL {
                self.resolved_in_level = 0;
                if self.session.advance_level() {
                    return self.finish();
                }
                continue;
            }

            match self.session.select_next_question() {
                Some(question) => {
                    // select only returns while a level is current
                    let Some(level) = self.session.current_level() else {
                        return self.finish();
                    };
                    let timer = self.clock.start(self.question_time);
                    self.current = Some(question.clone());
                    self.phase = Phase::Awaiting;
                    return ClassicStep::Question {
                        question,
                        level,
                        timer,
                        duration: self.question_time,
                    };
                }
                None => {
                    self.resolved_in_level = 0;
                    if self.session.advance_level() {
                        return self.finish();
                    }
                }
            }
        }
    }

    fn finish(&mut self) -> ClassicStep {
        self.clock.cancel();
        self.current = None;
        self.phase = Phase::Finished;
        let outcome = self.outcome();
        info!(
            "classic session {} finished: {}/{}",
            self.session.id(),
            outcome.score,
            outcome.total
        );
        ClassicStep::Finished(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ids::QuestionIds;
    use crate::engine::normalizer::fallback_bank;
    use crate::models::LevelId;

    fn game() -> ClassicGame {
        let mut ids = QuestionIds::new();
        ClassicGame::new(fallback_bank("Alien", &mut ids), &GameConfig::default())
    }

    fn expect_question(step: ClassicStep) -> (Question, &'static LevelInfo, TimerToken) {
        match step {
            ClassicStep::Question {
                question,
                level,
                timer,
                ..
            } => (question, level, timer),
            ClassicStep::Finished(outcome) => panic!("unexpected finish: {:?}", outcome),
        }
    }

    #[test]
    fn test_plays_three_levels_of_three() {
        let mut game = game();
        let mut step = game.start();
        let mut levels = Vec::new();

        loop {
            match step {
                ClassicStep::Question { question, level, .. } => {
                    levels.push(level.id);
                    let outcome = game.answer(&question.correct_option).unwrap();
                    assert!(outcome.is_correct);
                    step = game.next().unwrap();
                }
                ClassicStep::Finished(outcome) => {
                    assert_eq!(outcome, Outcome { score: 9, total: 9 });
                    break;
                }
            }
        }

        assert_eq!(levels.len(), 9);
        assert_eq!(levels[..3], [LevelId::Beginner; 3]);
        assert_eq!(levels[3..6], [LevelId::Intermediate; 3]);
        assert_eq!(levels[6..], [LevelId::Master; 3]);
        assert!(game.is_finished());
    }

    #[test]
    fn test_wrong_answers_still_advance() {
        let mut game = game();
        let mut step = game.start();
        let mut asked = 0;
        while let ClassicStep::Question { .. } = step {
            asked += 1;
            let outcome = game.answer("definitely wrong").unwrap();
            assert!(!outcome.is_correct);
            step = game.next().unwrap();
        }
        assert_eq!(asked, 9);
        assert_eq!(game.outcome().score, 0);
        assert_eq!(game.session().history().len(), 9);
    }

    #[test]
    fn test_timeout_records_incorrect() {
        let mut game = game();
        let (question, _, timer) = expect_question(game.start());

        let outcome = game.on_timeout(timer).unwrap();
        assert_eq!(outcome.selected, None);
        assert!(!outcome.is_correct);
        assert_eq!(outcome.correct_option, question.correct_option);

        let record = &game.session().history()[0];
        assert_eq!(record.selected, None);
        assert!(game.next().is_some());
    }

    #[test]
    fn test_stale_timeout_ignored() {
        let mut game = game();
        let (question, _, first_timer) = expect_question(game.start());
        game.answer(&question.correct_option).unwrap();
        let (_, _, _second_timer) = expect_question(game.next().unwrap());

        assert!(game.on_timeout(first_timer).is_none());
        assert!(game.is_awaiting_answer());
        assert_eq!(game.session().history().len(), 1);
    }

    #[test]
    fn test_cannot_answer_twice_or_skip_unanswered() {
        let mut game = game();
        let (question, _, timer) = expect_question(game.start());
        assert!(game.next().is_none());

        game.answer(&question.correct_option).unwrap();
        assert!(game.answer(&question.correct_option).is_none());
        assert!(game.on_timeout(timer).is_none());
        assert_eq!(game.outcome().score, 1);
    }

    #[test]
    fn test_abandon_stops_everything() {
        let mut game = game();
        let (_, _, timer) = expect_question(game.start());
        game.abandon();
        assert!(game.on_timeout(timer).is_none());
        assert!(game.answer("Past").is_none());
        assert!(game.remaining().is_none());
    }
}
