use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::{ActiveGame, App};

use super::{hex_color, render_controls};

const ANSWER_PREVIEW_LENGTH: usize = 40;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(badge) = app.badge() else {
        return;
    };
    let percentage = calculate_percentage(badge.score, badge.total);

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(9),
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    let badge_color = hex_color(&badge.color).unwrap_or(Color::Cyan);
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("{} COMPLETE", app.mode().label().to_uppercase()),
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} / {}  ({:.0}%)", badge.score, badge.total, percentage),
            Style::default().fg(get_grade_color(percentage)).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(badge.label.as_str(), Style::default().fg(badge_color).bold())),
        Line::from(badge.description.as_str().fg(Color::Gray)),
        Line::from(""),
    ];
    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, chunks[1]);

    render_breakdown(frame, chunks[2], app);

    let status = match (app.status(), app.is_badge_saved()) {
        (Some(status), _) => status.to_string(),
        (None, true) => "Saving badge...".to_string(),
        (None, false) => String::new(),
    };
    frame.render_widget(
        Paragraph::new(status).alignment(Alignment::Center).fg(Color::Yellow),
        chunks[3],
    );

    let controls = if app.is_badge_saved() {
        "r retry  ·  enter home  ·  q quit"
    } else {
        "s save badge  ·  r retry  ·  enter home  ·  q quit"
    };
    render_controls(frame, chunks[4], controls);
}

fn calculate_percentage(score: usize, total: usize) -> f64 {
    if total > 0 {
        (score as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

fn get_grade_color(percentage: f64) -> Color {
    match percentage as u32 {
        90..=100 => Color::Green,
        70..=89 => Color::Cyan,
        50..=69 => Color::Yellow,
        _ => Color::Red,
    }
}

/// One line per resolved question or round.
fn render_breakdown(frame: &mut Frame, area: Rect, app: &App) {
    let rows: Vec<(bool, String, String)> = match app.game() {
        Some(ActiveGame::Classic(game)) => game
            .session()
            .history()
            .iter()
            .map(|r| (r.is_correct, r.level.as_str().to_string(), describe(r.selected.as_deref(), &r.correct_option)))
            .collect(),
        Some(ActiveGame::RapidFire(game)) => game
            .session()
            .history()
            .iter()
            .map(|r| (r.is_correct, "rapid".to_string(), describe(r.selected.as_deref(), &r.correct_option)))
            .collect(),
        Some(ActiveGame::Emoji(game)) => game
            .history()
            .iter()
            .map(|r| (r.is_correct, "emoji".to_string(), describe(Some(&r.guess), &r.title)))
            .collect(),
        None => Vec::new(),
    };

    let lines: Vec<Line> = rows
        .into_iter()
        .enumerate()
        .map(|(index, (is_correct, tag, detail))| {
            let (symbol, color) = if is_correct {
                ("+", Color::Green)
            } else {
                ("-", Color::Red)
            };
            Line::from(vec![
                Span::styled(format!(" {} ", symbol), Style::default().fg(color)),
                Span::styled(format!("{:2}. ", index + 1), Style::default().fg(Color::DarkGray)),
                Span::styled(format!("{:<13}", tag), Style::default().fg(Color::Magenta)),
                Span::styled(detail, Style::default().fg(Color::Gray)),
            ])
        })
        .collect();

    let widget = Paragraph::new(lines).block(Block::default().padding(Padding::horizontal(1)));
    frame.render_widget(widget, area);
}

fn describe(selected: Option<&str>, correct: &str) -> String {
    let answer = truncate(correct);
    match selected {
        None => format!("timed out, answer {}", answer),
        Some(s) if s == correct => answer,
        Some(s) => format!("{} -> {}", truncate(s), answer),
    }
}

fn truncate(text: &str) -> String {
    if text.chars().count() > ANSWER_PREVIEW_LENGTH {
        let truncated: String = text.chars().take(ANSWER_PREVIEW_LENGTH).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}
