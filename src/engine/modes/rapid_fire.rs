//! Rapid fire: a short run of reshuffled questions against one clock.

use std::time::Duration;

use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::GameConfig;
use crate::engine::clock::{Countdown, TimerToken};
use crate::engine::normalizer::PLACEHOLDER_OPTIONS;
use crate::engine::session::SessionState;
use crate::models::{Question, QuestionBank, OPTIONS_PER_QUESTION};

use super::{AnswerOutcome, Outcome};

const GENERIC_OPTIONS: [&str; 10] = [
    "Iconic characters",
    "Groundbreaking visuals",
    "Memorable soundtrack",
    "Plot twists",
    "Character development",
    "Visual effects",
    "Emotional depth",
    "Action sequences",
    "Dialogue quality",
    "Cinematic style",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RapidStep {
    Question {
        question: Question,
        /// 1-based position in the run.
        number: usize,
        of: usize,
    },
    Finished(Outcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    NotStarted,
    Running,
    Finished,
}

pub struct RapidFireGame {
    session: SessionState,
    clock: Countdown,
    duration: Duration,
    queue: Vec<Question>,
    position: usize,
    points: usize,
    phase: Phase,
}

/// Shuffle a question's options, swapping placeholder options for generic
/// ones first. The correct option text is kept.
pub fn prepare_rapid_question<R: Rng + ?Sized>(question: &Question, rng: &mut R) -> Question {
    let all_placeholders = question
        .options
        .iter()
        .zip(PLACEHOLDER_OPTIONS)
        .all(|(option, placeholder)| option == placeholder);

    let mut options: Vec<String> = if all_placeholders {
        let mut options = vec![question.correct_option.clone()];
        let fillers: Vec<&str> = GENERIC_OPTIONS
            .iter()
            .copied()
            .filter(|o| *o != question.correct_option)
            .collect();
        options.extend(
            fillers
                .choose_multiple(rng, OPTIONS_PER_QUESTION - 1)
                .map(|o| o.to_string()),
        );
        options
    } else {
        question.options.to_vec()
    };
    options.shuffle(rng);

    let mut prepared = question.clone();
    if let Ok(options) = <[String; OPTIONS_PER_QUESTION]>::try_from(options) {
        prepared.options = options;
    }
    prepared
}

impl RapidFireGame {
    /// Draw up to `config.rapid_fire_questions` questions from the whole bank.
    pub fn new<R: Rng + ?Sized>(bank: QuestionBank, config: &GameConfig, rng: &mut R) -> Self {
        let mut pool: Vec<&Question> = bank.iter().collect();
        pool.shuffle(rng);
        let queue: Vec<Question> = pool
            .into_iter()
            .take(config.rapid_fire_questions)
            .map(|q| prepare_rapid_question(q, rng))
            .collect();

        let session = SessionState::new(bank);
        let clock = Countdown::new(session.id());
        Self {
            session,
            clock,
            duration: config.rapid_fire_time(),
            queue,
            position: 0,
            points: config.rapid_fire_points,
            phase: Phase::NotStarted,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn current(&self) -> Option<&Question> {
        match self.phase {
            Phase::Running => self.queue.get(self.position),
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// 1-based number of the question on screen, and the run length.
    pub fn progress(&self) -> (usize, usize) {
        ((self.position + 1).min(self.queue.len()), self.queue.len())
    }

    pub fn remaining(&self) -> Option<Duration> {
        self.clock.remaining()
    }

    pub fn outcome(&self) -> Outcome {
        Outcome {
            score: self.session.score() * self.points,
            total: self.queue.len() * self.points,
        }
    }

    /// Start the single clock and present the first question.
    pub fn start(&mut self) -> (TimerToken, Duration, RapidStep) {
        let timer = self.clock.start(self.duration);
        self.phase = Phase::Running;
        info!("rapid fire session {} started with {} questions", self.session.id(), self.queue.len());
        (timer, self.duration, self.present())
    }

    /// Record an answer and move straight on. `None` when not running.
    pub fn answer(&mut self, selected: &str) -> Option<(AnswerOutcome, RapidStep)> {
        if self.phase != Phase::Running {
            return None;
        }
        let question = self.queue.get(self.position)?;
        let correct_option = question.correct_option.clone();
        let is_correct = self.session.record_answer(Some(selected), &correct_option);
        self.position += 1;

        let outcome = AnswerOutcome {
            selected: Some(selected.to_string()),
            correct_option,
            is_correct,
        };
        Some((outcome, self.present()))
    }

    /// Clock expiry ends the run; the question on screen counts for nothing.
    pub fn on_timeout(&mut self, token: TimerToken) -> Option<Outcome> {
        if self.phase != Phase::Running || !self.clock.expire(token) {
            debug!("rapid fire session {}: ignoring stale timer {:?}", self.session.id(), token);
            return None;
        }
        match self.finish() {
            RapidStep::Finished(outcome) => Some(outcome),
            RapidStep::Question { .. } => None,
        }
    }

    pub fn abandon(&mut self) {
        self.clock.cancel();
        self.phase = Phase::Finished;
    }

    fn present(&mut self) -> RapidStep {
        match self.queue.get(self.position) {
            Some(question) => {
                self.session.mark_used(&question.id);
                RapidStep::Question {
                    question: question.clone(),
                    number: self.position + 1,
                    of: self.queue.len(),
                }
            }
            None => self.finish(),
        }
    }

    fn finish(&mut self) -> RapidStep {
        self.clock.cancel();
        self.phase = Phase::Finished;
        let outcome = self.outcome();
        info!(
            "rapid fire session {} finished: {}/{}",
            self.session.id(),
            outcome.score,
            outcome.total
        );
        RapidStep::Finished(outcome)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::engine::ids::QuestionIds;
    use crate::engine::normalizer::fallback_bank;
    use crate::models::Difficulty;

    fn game(seed: u64) -> RapidFireGame {
        let mut ids = QuestionIds::new();
        let mut rng = StdRng::seed_from_u64(seed);
        RapidFireGame::new(fallback_bank("Tetris", &mut ids), &GameConfig::default(), &mut rng)
    }

    fn placeholder_question() -> Question {
        Question {
            id: "p".to_string(),
            prompt: "?".to_string(),
            options: PLACEHOLDER_OPTIONS.map(String::from),
            correct_option: "Option A".to_string(),
            difficulty: Difficulty::Easy,
            topic: None,
        }
    }

    #[test]
    fn test_prepare_keeps_correct_option() {
        let mut ids = QuestionIds::new();
        let bank = fallback_bank("Tetris", &mut ids);
        let mut rng = StdRng::seed_from_u64(7);
        for question in bank.iter() {
            let prepared = prepare_rapid_question(question, &mut rng);
            assert!(prepared.options.contains(&prepared.correct_option));
            let mut original: Vec<&String> = question.options.iter().collect();
            let mut shuffled: Vec<&String> = prepared.options.iter().collect();
            original.sort();
            shuffled.sort();
            assert_eq!(original, shuffled);
        }
    }

    #[test]
    fn test_prepare_replaces_placeholders() {
        let mut rng = StdRng::seed_from_u64(3);
        let prepared = prepare_rapid_question(&placeholder_question(), &mut rng);
        assert!(prepared.options.contains(&"Option A".to_string()));
        assert!(!prepared.options.contains(&"Option B".to_string()));
        let distinct: HashSet<&String> = prepared.options.iter().collect();
        assert_eq!(distinct.len(), OPTIONS_PER_QUESTION);
    }

    #[test]
    fn test_full_run_awards_points() {
        let mut game = game(1);
        let (_, duration, mut step) = game.start();
        assert_eq!(duration, Duration::from_secs(30));

        let mut seen = HashSet::new();
        while let RapidStep::Question { question, of, .. } = step {
            assert_eq!(of, 5);
            assert!(seen.insert(question.id.clone()));
            let (outcome, next) = game.answer(&question.correct_option).unwrap();
            assert!(outcome.is_correct);
            step = next;
        }
        assert_eq!(step, RapidStep::Finished(Outcome { score: 10, total: 10 }));
        assert!(game.remaining().is_none());
    }

    #[test]
    fn test_clock_expiry_mid_question_ends_run() {
        let mut game = game(2);
        let (timer, _, step) = game.start();

        let RapidStep::Question { question, .. } = step else {
            panic!("expected a question");
        };
        game.answer(&question.correct_option).unwrap();
        let (_, step) = game.answer("wrong").unwrap();
        assert!(matches!(step, RapidStep::Question { number: 3, .. }));

        // third question is on screen when the clock runs out
        let outcome = game.on_timeout(timer).unwrap();
        assert_eq!(outcome, Outcome { score: 2, total: 10 });
        assert_eq!(game.session().history().len(), 2);
        assert!(game.answer("anything").is_none());
        assert!(game.is_finished());
    }

    #[test]
    fn test_timeout_before_start_is_ignored() {
        let mut game = game(4);
        let token = TimerToken {
            session: game.session().id(),
            generation: 1,
        };
        assert!(game.on_timeout(token).is_none());
        assert!(!game.is_finished());
    }
}
