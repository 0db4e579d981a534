use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::{ActiveGame, App};
use crate::engine::modes::AnswerOutcome;
use crate::engine::SessionState;
use crate::models::{Question, LEVELS, QUESTIONS_PER_LEVEL};

use super::{format_remaining, render_controls};

const OPTION_LABELS: [char; 4] = ['A', 'B', 'C', 'D'];

/// What the header and feedback line need from either timed mode.
struct QuizView<'a> {
    question: Option<&'a Question>,
    progress: String,
    score: String,
    resolved: Option<&'a AnswerOutcome>,
}

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(game) = app.game() else {
        return;
    };
    let view = match game {
        ActiveGame::Classic(classic) => {
            let session = classic.session();
            let level = session.current_level().map(|l| l.label).unwrap_or("Complete");
            QuizView {
                question: classic.current(),
                progress: format!(
                    "{}  ·  Q {}/{}",
                    level,
                    session.question_cursor().min(QUESTIONS_PER_LEVEL),
                    QUESTIONS_PER_LEVEL
                ),
                score: format!("Score {}", session.score()),
                resolved: classic.last_outcome(),
            }
        }
        ActiveGame::RapidFire(rapid) => {
            let (number, of) = rapid.progress();
            QuizView {
                question: rapid.current(),
                progress: format!("Rapid Fire  ·  Q {}/{}", number, of),
                score: format!("Points {}", rapid.outcome().score),
                resolved: None,
            }
        }
        ActiveGame::Emoji(_) => return,
    };

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(2),
        Constraint::Length(1),
    ])
    .margin(2)
    .split(area);

    render_header(frame, chunks[0], app, game, &view);
    if let ActiveGame::Classic(classic) = game {
        render_levels(frame, chunks[1], classic.session());
    }

    let Some(question) = view.question else {
        return;
    };
    let widget = Paragraph::new(question.prompt.as_str())
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, chunks[2]);

    render_options(frame, chunks[3], question, app.selected_option(), view.resolved);
    render_feedback(frame, chunks[4], app, view.resolved);

    let controls = if view.resolved.is_some() {
        "enter next  ·  r retry  ·  q home"
    } else {
        "j/k navigate  ·  enter answer  ·  r retry  ·  q home"
    };
    render_controls(frame, chunks[5], controls);
}

fn render_header(frame: &mut Frame, area: Rect, app: &App, game: &ActiveGame, view: &QuizView) {
    let chunks = Layout::horizontal([Constraint::Fill(1), Constraint::Length(24)]).split(area);

    let mut left = vec![Span::styled(view.progress.as_str(), Style::default().fg(Color::Cyan).bold())];
    if let Some(label) = app.fallback_label() {
        left.push(Span::styled(format!("  [{}]", label), Style::default().fg(Color::Yellow)));
    }
    frame.render_widget(Paragraph::new(Line::from(left)), chunks[0]);

    let remaining = game.remaining();
    let timer_color = match remaining {
        Some(left) if left.as_secs() < 5 => Color::Red,
        Some(_) => Color::Green,
        None => Color::DarkGray,
    };
    let right = Line::from(vec![
        Span::styled(view.score.as_str(), Style::default().fg(Color::Gray)),
        Span::styled(format!("  ⏱ {}", format_remaining(remaining)), Style::default().fg(timer_color)),
    ]);
    frame.render_widget(Paragraph::new(right).alignment(Alignment::Right), chunks[1]);
}

fn render_levels(frame: &mut Frame, area: Rect, session: &SessionState) {
    let spans: Vec<Span> = LEVELS
        .iter()
        .flat_map(|level| {
            let unlocked = session.is_level_unlocked(level);
            let current = session.level_index() == level.ordinal;
            let style = match (current, unlocked) {
                (true, _) => Style::default().fg(Color::Black).bg(Color::Magenta).bold(),
                (false, true) => Style::default().fg(Color::Magenta),
                (false, false) => Style::default().fg(Color::DarkGray),
            };
            let text = if unlocked {
                format!(" {} ", level.label)
            } else {
                format!(" {} 🔒 ", level.label)
            };
            [Span::styled(text, style), Span::raw(" ")]
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_options(
    frame: &mut Frame,
    area: Rect,
    question: &Question,
    selected: usize,
    resolved: Option<&AnswerOutcome>,
) {
    let mut lines: Vec<Line> = Vec::with_capacity(question.options.len() * 2);

    for (index, option) in question.options.iter().enumerate() {
        let is_selected = index == selected;
        let style = match resolved {
            Some(outcome) if *option == outcome.correct_option => Style::default().fg(Color::Green).bold(),
            Some(outcome) if outcome.selected.as_deref() == Some(option.as_str()) => {
                Style::default().fg(Color::Red).bold()
            }
            Some(_) => Style::default().fg(Color::DarkGray),
            None if is_selected => Style::default().fg(Color::Cyan).bold(),
            None => Style::default().fg(Color::Gray),
        };
        let marker = if is_selected && resolved.is_none() { ">" } else { " " };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}. ", OPTION_LABELS[index]), style),
            Span::styled(option.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_feedback(frame: &mut Frame, area: Rect, app: &App, resolved: Option<&AnswerOutcome>) {
    let line = match (resolved, app.last_rapid()) {
        (Some(outcome), _) => feedback_line(outcome),
        (None, Some(outcome)) => feedback_line(outcome).patch_style(Style::default().dim()),
        (None, None) => Line::from(""),
    };
    let widget = Paragraph::new(line).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn feedback_line(outcome: &AnswerOutcome) -> Line<'static> {
    match (&outcome.selected, outcome.is_correct) {
        (_, true) => Line::from(Span::styled("Correct!", Style::default().fg(Color::Green).bold())),
        (None, false) => Line::from(Span::styled(
            format!("Time's up! Answer: {}", outcome.correct_option),
            Style::default().fg(Color::Yellow).bold(),
        )),
        (Some(_), false) => Line::from(Span::styled(
            format!("Wrong! Answer: {}", outcome.correct_option),
            Style::default().fg(Color::Red).bold(),
        )),
    }
}
