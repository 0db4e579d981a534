//! Tokio driver for the terminal game.
//!
//! Effects emitted by [`App`] run as spawned tasks that report back over an
//! unbounded channel. The terminal loop drains that channel, draws, then
//! polls the keyboard with a short timeout.

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use log::{debug, warn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::app::{App, AppEvent, Effect, Screen};
use crate::data::BadgeStore;
use crate::engine::ModeKind;
use crate::providers::{ContentProvider, QuestionGenerator};
use crate::terminal::{self, GameTerminal};
use crate::ui;
use crate::PixelQuizError;

const INPUT_POLL: Duration = Duration::from_millis(100);

/// Executes effects against the real collaborators.
pub struct EffectRunner<C, G, S> {
    catalog: Arc<C>,
    generator: Arc<G>,
    store: S,
    tx: mpsc::UnboundedSender<AppEvent>,
    countdown: Option<JoinHandle<()>>,
    scheduled: Vec<JoinHandle<()>>,
}

impl<C, G, S> EffectRunner<C, G, S>
where
    C: ContentProvider + 'static,
    G: QuestionGenerator + 'static,
    S: BadgeStore,
{
    pub fn new(catalog: C, generator: G, store: S, tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self {
            catalog: Arc::new(catalog),
            generator: Arc::new(generator),
            store,
            tx,
            countdown: None,
            scheduled: Vec::new(),
        }
    }

    /// Must be called from within a tokio runtime.
    pub fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::Search { ticket, query } => {
                let catalog = Arc::clone(&self.catalog);
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = catalog.search(&query).await;
                    let _ = tx.send(AppEvent::SearchCompleted { ticket, result });
                });
            }
            Effect::FetchDetails { ticket, item } => {
                let catalog = Arc::clone(&self.catalog);
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = catalog.details(&item).await;
                    let _ = tx.send(AppEvent::DetailsLoaded { ticket, result });
                });
            }
            Effect::GenerateQuestions { ticket, content } => {
                let generator = Arc::clone(&self.generator);
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let payload = match generator.generate(&content).await {
                        Ok(payload) => Some(payload),
                        Err(e) => {
                            warn!("question generation for {:?} failed: {}", content.title, e);
                            None
                        }
                    };
                    let _ = tx.send(AppEvent::QuestionsGenerated { ticket, payload });
                });
            }
            Effect::StartTimer { token, duration } => {
                if let Some(previous) = self.countdown.take() {
                    previous.abort();
                }
                let tx = self.tx.clone();
                self.countdown = Some(tokio::spawn(async move {
                    tokio::time::sleep(duration).await;
                    let _ = tx.send(AppEvent::TimerExpired(token));
                }));
            }
            Effect::ScheduleAdvance {
                ticket,
                resolved,
                delay,
            } => {
                self.scheduled.retain(|handle| !handle.is_finished());
                let tx = self.tx.clone();
                self.scheduled.push(tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = tx.send(AppEvent::AdvanceDue { ticket, resolved });
                }));
            }
            Effect::CancelTimers => self.cancel_timers(),
            Effect::SaveBadge(badge) => {
                let result = self.store.save(badge);
                let _ = self.tx.send(AppEvent::BadgeSaved(result));
            }
        }
    }

    pub fn cancel_timers(&mut self) {
        if let Some(countdown) = self.countdown.take() {
            countdown.abort();
        }
        for handle in self.scheduled.drain(..) {
            handle.abort();
        }
    }
}

/// Run the game in the terminal until the player quits.
///
/// Must be called from within a tokio runtime.
pub fn run<C, G, S>(app: &mut App, catalog: C, generator: G, store: S) -> Result<(), PixelQuizError>
where
    C: ContentProvider + 'static,
    G: QuestionGenerator + 'static,
    S: BadgeStore,
{
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut runner = EffectRunner::new(catalog, generator, store, tx);

    let mut term = terminal::init()?;
    let result = run_event_loop(&mut term, app, &mut runner, &mut rx);
    runner.cancel_timers();
    terminal::restore()?;
    result
}

fn run_event_loop<C, G, S>(
    term: &mut GameTerminal,
    app: &mut App,
    runner: &mut EffectRunner<C, G, S>,
    rx: &mut mpsc::UnboundedReceiver<AppEvent>,
) -> Result<(), PixelQuizError>
where
    C: ContentProvider + 'static,
    G: QuestionGenerator + 'static,
    S: BadgeStore,
{
    while !app.should_quit {
        while let Ok(app_event) = rx.try_recv() {
            for effect in app.handle_event(app_event) {
                runner.execute(effect);
            }
        }

        term.draw(|frame| ui::render(frame, app))?;

        if event::poll(INPUT_POLL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                let effects = if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                    app.quit()
                } else {
                    handle_input(app, key.code)
                };
                for effect in effects {
                    runner.execute(effect);
                }
            }
        }
    }

    debug!("event loop finished");
    Ok(())
}

/// Map a key press to an app action for the current screen.
pub fn handle_input(app: &mut App, key: KeyCode) -> Vec<Effect> {
    match app.screen() {
        Screen::Home => handle_home_input(app, key),
        Screen::Searching | Screen::Loading => match key {
            KeyCode::Esc => app.reset_to_home(),
            _ => Vec::new(),
        },
        Screen::Results => handle_results_input(app, key),
        Screen::Playing if app.mode() == ModeKind::Emoji => handle_guess_input(app, key),
        Screen::Playing => handle_quiz_input(app, key),
        Screen::Finished => handle_finished_input(app, key),
    }
}

fn handle_home_input(app: &mut App, key: KeyCode) -> Vec<Effect> {
    match key {
        KeyCode::Esc => return app.quit(),
        KeyCode::Enter => return app.submit_search(),
        KeyCode::Tab => app.cycle_mode(),
        KeyCode::Backspace => app.pop_query_char(),
        KeyCode::Char(c) => app.push_query_char(c),
        _ => {}
    }
    Vec::new()
}

fn handle_results_input(app: &mut App, key: KeyCode) -> Vec<Effect> {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_result(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_result(),
        KeyCode::Enter => return app.choose_result(),
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => return app.reset_to_home(),
        _ => {}
    }
    Vec::new()
}

fn handle_quiz_input(app: &mut App, key: KeyCode) -> Vec<Effect> {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_option(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_option(),
        KeyCode::Enter | KeyCode::Char(' ') => return app.submit(),
        KeyCode::Char('r') | KeyCode::Char('R') => return app.retry(),
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => return app.reset_to_home(),
        _ => {}
    }
    Vec::new()
}

fn handle_guess_input(app: &mut App, key: KeyCode) -> Vec<Effect> {
    match key {
        KeyCode::Enter => return app.submit(),
        KeyCode::Esc => return app.reset_to_home(),
        KeyCode::Backspace => app.pop_guess_char(),
        KeyCode::Char(c) => app.push_guess_char(c),
        _ => {}
    }
    Vec::new()
}

fn handle_finished_input(app: &mut App, key: KeyCode) -> Vec<Effect> {
    match key {
        KeyCode::Char('s') | KeyCode::Char('S') => app.save_badge(),
        KeyCode::Char('r') | KeyCode::Char('R') => app.retry(),
        KeyCode::Enter | KeyCode::Esc | KeyCode::Char('h') => app.reset_to_home(),
        KeyCode::Char('q') | KeyCode::Char('Q') => app.quit(),
        _ => Vec::new(),
    }
}
