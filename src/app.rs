//! Screen and session state machine.
//!
//! [`App`] performs no I/O. Player actions and [`AppEvent`]s update it and
//! return the [`Effect`]s the runtime has to carry out. Every asynchronous
//! request is tagged with a [`Ticket`] for the current epoch; leaving a game
//! rotates the epoch, so results that arrive late are dropped.

use std::collections::HashSet;
use std::time::Duration;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::Value;
use uuid::Uuid;

use crate::config::GameConfig;
use crate::data::StoreError;
use crate::engine::modes::{
    AnswerOutcome, ClassicGame, ClassicStep, EmojiGame, EmojiStep, RapidFireGame, RapidStep,
};
use crate::engine::{fallback_bank, normalize, resolve, EmojiTable, ModeKind, Outcome, QuestionIds, TimerToken};
use crate::models::{Badge, ContentItem, QuestionBank, OPTIONS_PER_QUESTION};
use crate::providers::ProviderError;

/// Pause between a resolved classic question and the next one.
pub const ADVANCE_DELAY: Duration = Duration::from_millis(1500);

const FALLBACK_STATUS: &str = "Fallback Trivia";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Searching,
    Results,
    Loading,
    Playing,
    Finished,
}

pub enum ActiveGame {
    Classic(ClassicGame),
    Emoji(EmojiGame),
    RapidFire(RapidFireGame),
}

impl ActiveGame {
    pub fn mode(&self) -> ModeKind {
        match self {
            Self::Classic(_) => ModeKind::Classic,
            Self::Emoji(_) => ModeKind::Emoji,
            Self::RapidFire(_) => ModeKind::RapidFire,
        }
    }

    pub fn outcome(&self) -> Outcome {
        match self {
            Self::Classic(game) => game.outcome(),
            Self::Emoji(game) => game.outcome(),
            Self::RapidFire(game) => game.outcome(),
        }
    }

    /// Countdown time left. Emoji rounds are untimed.
    pub fn remaining(&self) -> Option<Duration> {
        match self {
            Self::Classic(game) => game.remaining(),
            Self::Emoji(_) => None,
            Self::RapidFire(game) => game.remaining(),
        }
    }

    fn abandon(&mut self) {
        match self {
            Self::Classic(game) => game.abandon(),
            Self::Emoji(game) => game.abandon(),
            Self::RapidFire(game) => game.abandon(),
        }
    }
}

/// Identifies the epoch an asynchronous request was issued in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    epoch: Uuid,
}

/// Work for the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Search { ticket: Ticket, query: String },
    FetchDetails { ticket: Ticket, item: ContentItem },
    GenerateQuestions { ticket: Ticket, content: ContentItem },
    /// Replaces the running countdown.
    StartTimer { token: TimerToken, duration: Duration },
    /// Deliver [`AppEvent::AdvanceDue`] after `delay`.
    ScheduleAdvance {
        ticket: Ticket,
        resolved: usize,
        delay: Duration,
    },
    /// Abort the countdown and any scheduled advance.
    CancelTimers,
    SaveBadge(Badge),
}

/// Completions fed back by the runtime.
#[derive(Debug)]
pub enum AppEvent {
    SearchCompleted {
        ticket: Ticket,
        result: Result<Vec<ContentItem>, ProviderError>,
    },
    DetailsLoaded {
        ticket: Ticket,
        result: Result<ContentItem, ProviderError>,
    },
    /// `None` when generation failed.
    QuestionsGenerated { ticket: Ticket, payload: Option<Value> },
    TimerExpired(TimerToken),
    AdvanceDue { ticket: Ticket, resolved: usize },
    BadgeSaved(Result<Vec<Badge>, StoreError>),
}

pub struct App {
    pub should_quit: bool,
    screen: Screen,
    config: GameConfig,
    emoji_table: EmojiTable,
    rng: StdRng,
    mode: ModeKind,
    epoch: Uuid,
    query: String,
    results: Vec<ContentItem>,
    selected_result: usize,
    content: Option<ContentItem>,
    bank: Option<QuestionBank>,
    generation_pending: bool,
    game: Option<ActiveGame>,
    selected_option: usize,
    guess_input: String,
    last_rapid: Option<AnswerOutcome>,
    badge: Option<Badge>,
    badge_saved: bool,
    badges: Vec<Badge>,
    status: Option<String>,
}

impl App {
    pub fn new(config: GameConfig, emoji_table: EmojiTable, badges: Vec<Badge>) -> Self {
        Self::with_rng(config, emoji_table, badges, StdRng::from_entropy())
    }

    pub fn with_rng(config: GameConfig, emoji_table: EmojiTable, badges: Vec<Badge>, rng: StdRng) -> Self {
        Self {
            should_quit: false,
            screen: Screen::Home,
            config,
            emoji_table,
            rng,
            mode: ModeKind::Classic,
            epoch: Uuid::new_v4(),
            query: String::new(),
            results: Vec::new(),
            selected_result: 0,
            content: None,
            bank: None,
            generation_pending: false,
            game: None,
            selected_option: 0,
            guess_input: String::new(),
            last_rapid: None,
            badge: None,
            badge_saved: false,
            badges,
            status: None,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn mode(&self) -> ModeKind {
        self.mode
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[ContentItem] {
        &self.results
    }

    pub fn selected_result(&self) -> usize {
        self.selected_result
    }

    pub fn content(&self) -> Option<&ContentItem> {
        self.content.as_ref()
    }

    pub fn game(&self) -> Option<&ActiveGame> {
        self.game.as_ref()
    }

    pub fn selected_option(&self) -> usize {
        self.selected_option
    }

    pub fn guess_input(&self) -> &str {
        &self.guess_input
    }

    /// Most recent rapid-fire answer.
    pub fn last_rapid(&self) -> Option<&AnswerOutcome> {
        self.last_rapid.as_ref()
    }

    pub fn badge(&self) -> Option<&Badge> {
        self.badge.as_ref()
    }

    pub fn is_badge_saved(&self) -> bool {
        self.badge_saved
    }

    pub fn badges(&self) -> &[Badge] {
        &self.badges
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn is_generation_pending(&self) -> bool {
        self.generation_pending
    }

    /// Whether the questions in play came from the fallback templates.
    pub fn is_fallback(&self) -> bool {
        self.bank.as_ref().is_some_and(QuestionBank::is_fallback)
    }

    pub fn fallback_label(&self) -> Option<&'static str> {
        self.is_fallback().then_some(FALLBACK_STATUS)
    }

    pub fn set_mode(&mut self, mode: ModeKind) {
        self.mode = mode;
    }

    pub fn cycle_mode(&mut self) {
        if self.screen == Screen::Home {
            self.mode = self.mode.next();
        }
    }

    pub fn push_query_char(&mut self, c: char) {
        self.status = None;
        self.query.push(c);
    }

    pub fn pop_query_char(&mut self) {
        self.status = None;
        self.query.pop();
    }

    pub fn submit_search(&mut self) -> Vec<Effect> {
        if self.screen != Screen::Home {
            return Vec::new();
        }
        let query = self.query.trim();
        if query.is_empty() {
            self.status = Some(ProviderError::EmptyQuery.to_string());
            return Vec::new();
        }

        let query = query.to_string();
        debug!("searching for {:?}", query);
        self.screen = Screen::Searching;
        self.status = None;
        vec![Effect::Search {
            ticket: self.ticket(),
            query,
        }]
    }

    pub fn select_next_result(&mut self) {
        if !self.results.is_empty() {
            self.selected_result = (self.selected_result + 1) % self.results.len();
        }
    }

    pub fn select_previous_result(&mut self) {
        let len = self.results.len();
        if len > 0 {
            self.selected_result = (self.selected_result + len - 1) % len;
        }
    }

    /// Load the highlighted result and request its questions.
    pub fn choose_result(&mut self) -> Vec<Effect> {
        if self.screen != Screen::Results || self.generation_pending {
            return Vec::new();
        }
        let Some(item) = self.results.get(self.selected_result).cloned() else {
            return Vec::new();
        };

        info!("selected {:?} ({})", item.title, item.media_type.as_str());
        self.content = Some(item.clone());
        self.bank = None;
        self.screen = Screen::Loading;
        self.status = None;
        vec![Effect::FetchDetails {
            ticket: self.ticket(),
            item,
        }]
    }

    pub fn select_next_option(&mut self) {
        self.selected_option = (self.selected_option + 1) % OPTIONS_PER_QUESTION;
    }

    pub fn select_previous_option(&mut self) {
        self.selected_option = (self.selected_option + OPTIONS_PER_QUESTION - 1) % OPTIONS_PER_QUESTION;
    }

    pub fn push_guess_char(&mut self, c: char) {
        self.status = None;
        self.guess_input.push(c);
    }

    pub fn pop_guess_char(&mut self) {
        self.status = None;
        self.guess_input.pop();
    }

    /// Answer the question on screen, or move on once it is resolved.
    pub fn submit(&mut self) -> Vec<Effect> {
        if self.screen != Screen::Playing {
            return Vec::new();
        }
        match self.game.as_ref().map(ActiveGame::mode) {
            Some(ModeKind::Classic) => self.submit_classic(),
            Some(ModeKind::Emoji) => self.submit_emoji(),
            Some(ModeKind::RapidFire) => self.submit_rapid(),
            None => Vec::new(),
        }
    }

    pub fn save_badge(&mut self) -> Vec<Effect> {
        if self.screen != Screen::Finished || self.badge_saved {
            return Vec::new();
        }
        let Some(badge) = self.badge.clone() else {
            return Vec::new();
        };
        self.badge_saved = true;
        vec![Effect::SaveBadge(badge)]
    }

    /// Replay the same content and mode from the start.
    pub fn retry(&mut self) -> Vec<Effect> {
        if !matches!(self.screen, Screen::Playing | Screen::Finished) {
            return Vec::new();
        }
        self.abandon_game();
        self.start_game()
    }

    /// Abandon whatever is in progress and go back to the home screen.
    pub fn reset_to_home(&mut self) -> Vec<Effect> {
        self.abandon_game();
        self.screen = Screen::Home;
        self.results.clear();
        self.selected_result = 0;
        self.content = None;
        self.bank = None;
        self.badge = None;
        self.badge_saved = false;
        self.status = None;
        vec![Effect::CancelTimers]
    }

    pub fn quit(&mut self) -> Vec<Effect> {
        self.abandon_game();
        self.should_quit = true;
        vec![Effect::CancelTimers]
    }

    pub fn handle_event(&mut self, event: AppEvent) -> Vec<Effect> {
        match event {
            AppEvent::SearchCompleted { ticket, result } => {
                if !self.accepts(ticket, "search results") || self.screen != Screen::Searching {
                    return Vec::new();
                }
                self.on_search_completed(result);
                Vec::new()
            }
            AppEvent::DetailsLoaded { ticket, result } => {
                if !self.accepts(ticket, "details") || self.screen != Screen::Loading || self.generation_pending {
                    return Vec::new();
                }
                self.on_details_loaded(result)
            }
            AppEvent::QuestionsGenerated { ticket, payload } => {
                if !self.accepts(ticket, "questions") || !self.generation_pending {
                    return Vec::new();
                }
                self.on_questions_generated(payload)
            }
            AppEvent::TimerExpired(token) => self.on_timer_expired(token),
            AppEvent::AdvanceDue { ticket, resolved } => {
                if !self.accepts(ticket, "advance") {
                    return Vec::new();
                }
                self.on_advance_due(resolved)
            }
            AppEvent::BadgeSaved(result) => {
                match result {
                    Ok(badges) => {
                        self.badges = badges;
                        self.status = Some("Badge saved".to_string());
                    }
                    Err(e) => {
                        warn!("saving badge failed: {}", e);
                        self.badge_saved = false;
                        self.status = Some(format!("Could not save badge: {}", e));
                    }
                }
                Vec::new()
            }
        }
    }

    fn ticket(&self) -> Ticket {
        Ticket { epoch: self.epoch }
    }

    fn accepts(&self, ticket: Ticket, what: &str) -> bool {
        if ticket.epoch == self.epoch {
            true
        } else {
            debug!("discarding stale {} from epoch {}", what, ticket.epoch);
            false
        }
    }

    fn abandon_game(&mut self) {
        if let Some(game) = self.game.as_mut() {
            game.abandon();
            debug!("abandoned {} game", game.mode().label());
        }
        self.game = None;
        self.generation_pending = false;
        self.epoch = Uuid::new_v4();
        self.selected_option = 0;
        self.guess_input.clear();
        self.last_rapid = None;
    }

    fn on_search_completed(&mut self, result: Result<Vec<ContentItem>, ProviderError>) {
        match result {
            Ok(items) if items.is_empty() => {
                self.screen = Screen::Home;
                self.status = Some(ProviderError::NotFound.to_string());
            }
            Ok(items) => {
                debug!("{} search results", items.len());
                self.results = items;
                self.selected_result = 0;
                self.screen = Screen::Results;
            }
            Err(e) => {
                warn!("search failed: {}", e);
                self.screen = Screen::Home;
                self.status = Some(e.to_string());
            }
        }
    }

    fn on_details_loaded(&mut self, result: Result<ContentItem, ProviderError>) -> Vec<Effect> {
        match result {
            Ok(item) => self.content = Some(item),
            Err(e) => {
                // the search record is still enough to play with
                warn!("details failed: {}", e);
                self.status = Some(format!("Could not load details: {}", e));
            }
        }
        let Some(content) = self.content.clone() else {
            return self.reset_to_home();
        };

        if self.mode.needs_questions() {
            self.generation_pending = true;
            vec![Effect::GenerateQuestions {
                ticket: self.ticket(),
                content,
            }]
        } else {
            self.start_game()
        }
    }

    fn on_questions_generated(&mut self, payload: Option<Value>) -> Vec<Effect> {
        self.generation_pending = false;
        let subject = self.content.as_ref().map(|c| c.title.clone()).unwrap_or_default();

        let mut ids = QuestionIds::new();
        let bank = normalize(payload.as_ref(), &subject, &mut ids);
        if bank.is_fallback() {
            self.status = Some(FALLBACK_STATUS.to_string());
        }
        self.bank = Some(bank);
        self.start_game()
    }

    fn on_timer_expired(&mut self, token: TimerToken) -> Vec<Effect> {
        let ticket = self.ticket();
        match self.game.as_mut() {
            Some(ActiveGame::Classic(game)) => {
                if game.on_timeout(token).is_none() {
                    return Vec::new();
                }
                let resolved = game.session().history().len();
                vec![Effect::ScheduleAdvance {
                    ticket,
                    resolved,
                    delay: ADVANCE_DELAY,
                }]
            }
            Some(ActiveGame::RapidFire(game)) => match game.on_timeout(token) {
                Some(outcome) => self.finish(outcome),
                None => Vec::new(),
            },
            _ => {
                debug!("timer {:?} fired with no timed game", token);
                Vec::new()
            }
        }
    }

    fn on_advance_due(&mut self, resolved: usize) -> Vec<Effect> {
        let step = match self.game.as_mut() {
            Some(ActiveGame::Classic(game))
                if !game.is_awaiting_answer()
                    && !game.is_finished()
                    && game.session().history().len() == resolved =>
            {
                game.next()
            }
            _ => None,
        };
        match step {
            Some(step) => self.apply_classic_step(step),
            None => Vec::new(),
        }
    }

    fn submit_classic(&mut self) -> Vec<Effect> {
        let ticket = self.ticket();
        let selected = self.selected_option;
        let Some(ActiveGame::Classic(game)) = self.game.as_mut() else {
            return Vec::new();
        };

        if !game.is_awaiting_answer() {
            return match game.next() {
                Some(step) => self.apply_classic_step(step),
                None => Vec::new(),
            };
        }

        let Some(choice) = game.current().map(|q| q.options[selected].clone()) else {
            return Vec::new();
        };
        if game.answer(&choice).is_none() {
            return Vec::new();
        }
        let resolved = game.session().history().len();
        vec![Effect::ScheduleAdvance {
            ticket,
            resolved,
            delay: ADVANCE_DELAY,
        }]
    }

    fn submit_rapid(&mut self) -> Vec<Effect> {
        let selected = self.selected_option;
        let Some(ActiveGame::RapidFire(game)) = self.game.as_mut() else {
            return Vec::new();
        };
        let Some(choice) = game.current().map(|q| q.options[selected].clone()) else {
            return Vec::new();
        };
        let Some((outcome, step)) = game.answer(&choice) else {
            return Vec::new();
        };

        self.last_rapid = Some(outcome);
        self.apply_rapid_step(step)
    }

    fn submit_emoji(&mut self) -> Vec<Effect> {
        let Some(ActiveGame::Emoji(game)) = self.game.as_mut() else {
            return Vec::new();
        };

        if game.round().is_some_and(|r| r.resolved.is_none()) {
            match game.guess(&self.guess_input) {
                Ok(record) => {
                    debug!("guess {:?} for {:?}: {}", record.guess, record.title, record.is_correct);
                    self.guess_input.clear();
                    self.status = None;
                }
                Err(e) => self.status = Some(e.to_string()),
            }
            return Vec::new();
        }

        match game.next() {
            Some(step) => self.apply_emoji_step(step),
            None => Vec::new(),
        }
    }

    fn start_game(&mut self) -> Vec<Effect> {
        let mut effects = vec![Effect::CancelTimers];
        self.selected_option = 0;
        self.guess_input.clear();
        self.last_rapid = None;
        self.badge = None;
        self.badge_saved = false;
        self.screen = Screen::Playing;

        match self.mode {
            ModeKind::Classic => {
                let mut game = ClassicGame::new(self.session_bank(), &self.config);
                let step = game.start();
                self.game = Some(ActiveGame::Classic(game));
                effects.extend(self.apply_classic_step(step));
            }
            ModeKind::RapidFire => {
                let mut game = RapidFireGame::new(self.session_bank(), &self.config, &mut self.rng);
                let (token, duration, step) = game.start();
                self.game = Some(ActiveGame::RapidFire(game));
                effects.push(Effect::StartTimer { token, duration });
                effects.extend(self.apply_rapid_step(step));
            }
            ModeKind::Emoji => {
                let mut game = EmojiGame::new(self.emoji_subjects(), self.emoji_table.clone(), &self.config);
                let step = game.next();
                self.game = Some(ActiveGame::Emoji(game));
                if let Some(step) = step {
                    effects.extend(self.apply_emoji_step(step));
                }
            }
        }

        info!("{} game started", self.mode.label());
        effects
    }

    /// The bank for the next game, falling back when none was generated.
    fn session_bank(&mut self) -> QuestionBank {
        if let Some(bank) = &self.bank {
            return bank.clone();
        }
        let subject = self.content.as_ref().map(|c| c.title.as_str()).unwrap_or_default();
        let bank = fallback_bank(subject, &mut QuestionIds::new());
        self.bank = Some(bank.clone());
        bank
    }

    /// The chosen title first, then the other results with distinct titles.
    fn emoji_subjects(&self) -> Vec<ContentItem> {
        let Some(content) = self.content.clone() else {
            return Vec::new();
        };
        let mut seen = HashSet::from([content.title.to_lowercase()]);
        let mut subjects = vec![content];
        for item in &self.results {
            if seen.insert(item.title.to_lowercase()) {
                subjects.push(item.clone());
            }
        }
        subjects
    }

    fn apply_classic_step(&mut self, step: ClassicStep) -> Vec<Effect> {
        match step {
            ClassicStep::Question { timer, duration, .. } => {
                self.selected_option = 0;
                vec![Effect::StartTimer { token: timer, duration }]
            }
            ClassicStep::Finished(outcome) => self.finish(outcome),
        }
    }

    fn apply_rapid_step(&mut self, step: RapidStep) -> Vec<Effect> {
        match step {
            RapidStep::Question { .. } => {
                self.selected_option = 0;
                Vec::new()
            }
            RapidStep::Finished(outcome) => self.finish(outcome),
        }
    }

    fn apply_emoji_step(&mut self, step: EmojiStep) -> Vec<Effect> {
        match step {
            EmojiStep::Round { .. } => {
                self.guess_input.clear();
                Vec::new()
            }
            EmojiStep::Finished(outcome) => self.finish(outcome),
        }
    }

    fn finish(&mut self, outcome: Outcome) -> Vec<Effect> {
        let badge = resolve(outcome.score, outcome.total);
        info!(
            "{} finished with {}/{}: {}",
            self.mode.label(),
            outcome.score,
            outcome.total,
            badge.label
        );
        self.badge = Some(badge);
        self.badge_saved = false;
        self.screen = Screen::Finished;
        vec![Effect::CancelTimers]
    }
}
