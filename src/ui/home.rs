use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::app::App;
use crate::engine::ModeKind;

use super::{hex_color, render_controls};

const BADGES_SHOWN: usize = 5;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(12),
        Constraint::Length(BADGES_SHOWN as u16 + 2),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(area);

    render_search_box(frame, chunks[1], app);
    render_badges(frame, chunks[2], app);
    render_controls(frame, chunks[4], "type a title  ·  tab mode  ·  enter search  ·  esc quit");
}

fn render_search_box(frame: &mut Frame, area: Rect, app: &App) {
    let modes = [ModeKind::Classic, ModeKind::Emoji, ModeKind::RapidFire]
        .into_iter()
        .flat_map(|mode| {
            let style = if mode == app.mode() {
                Style::default().fg(Color::Black).bg(Color::Cyan).bold()
            } else {
                Style::default().fg(Color::DarkGray)
            };
            [Span::styled(format!(" {} ", mode.label()), style), Span::raw("  ")]
        })
        .collect::<Vec<_>>();

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled("PIXEL QUIZ", Style::default().fg(Color::Magenta).bold())),
        Line::from("Movies · Shows · Games · Music".fg(Color::DarkGray)),
        Line::from(""),
        Line::from(vec![
            Span::styled("Title: ", Style::default().fg(Color::White)),
            Span::styled(app.query(), Style::default().fg(Color::Yellow)),
            Span::styled("_", Style::default().fg(Color::Yellow)),
        ]),
        Line::from(""),
        Line::from(modes),
        Line::from(""),
    ];

    match app.status() {
        Some(status) => content.push(Line::from(Span::styled(status, Style::default().fg(Color::Red)))),
        None => content.push(Line::from("")),
    }

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_badges(frame: &mut Frame, area: Rect, app: &App) {
    let badges = app.badges();
    let lines: Vec<Line> = if badges.is_empty() {
        vec![Line::from("No badges yet".fg(Color::DarkGray))]
    } else {
        badges
            .iter()
            .rev()
            .take(BADGES_SHOWN)
            .map(|badge| {
                let color = hex_color(&badge.color).unwrap_or(Color::Cyan);
                Line::from(vec![
                    Span::styled(format!("{:<18}", badge.label), Style::default().fg(color).bold()),
                    Span::styled(
                        format!("{:>2}/{:<2}  ", badge.score, badge.total),
                        Style::default().fg(Color::Gray),
                    ),
                    Span::styled(
                        badge.awarded_at.format("%Y-%m-%d %H:%M").to_string(),
                        Style::default().fg(Color::DarkGray),
                    ),
                ])
            })
            .collect()
    };

    let widget = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .title(" Badges ")
            .title_alignment(Alignment::Center)
            .borders(Borders::TOP)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}
