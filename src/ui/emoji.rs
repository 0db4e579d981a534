use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::app::{ActiveGame, App};

use super::render_controls;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(ActiveGame::Emoji(game)) = app.game() else {
        return;
    };
    let Some(round) = game.round() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(5),
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(2)
    .split(area);

    let header = Line::from(vec![
        Span::styled(
            format!("Emoji Guess  ·  Round {}/{}", round.number, game.rounds()),
            Style::default().fg(Color::Cyan).bold(),
        ),
        Span::styled(
            format!("    Points {}", game.outcome().score),
            Style::default().fg(Color::Gray),
        ),
    ]);
    frame.render_widget(Paragraph::new(header), chunks[0]);

    let hints = Paragraph::new(vec![
        Line::from("Which title is this?".fg(Color::DarkGray)),
        Line::from(""),
        Line::from(Span::styled(round.hints.join("  "), Style::default().bold())),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(hints, chunks[2]);

    let feedback = match &round.resolved {
        Some(record) if record.is_correct => Line::from(Span::styled(
            format!("Correct! It was {}", record.title),
            Style::default().fg(Color::Green).bold(),
        )),
        Some(record) => Line::from(Span::styled(
            format!("Nope, it was {}", record.title),
            Style::default().fg(Color::Red).bold(),
        )),
        None => Line::from(vec![
            Span::styled("Your guess: ", Style::default().fg(Color::White)),
            Span::styled(app.guess_input(), Style::default().fg(Color::Yellow)),
            Span::styled("_", Style::default().fg(Color::Yellow)),
        ]),
    };
    let mut lines = vec![feedback];
    if let Some(status) = app.status() {
        lines.push(Line::from(Span::styled(status, Style::default().fg(Color::Red))));
    }
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), chunks[3]);

    let controls = if round.resolved.is_some() {
        "enter next round  ·  esc home"
    } else {
        "type a title  ·  enter guess  ·  esc home"
    };
    render_controls(frame, chunks[5], controls);
}
