use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::{App, Screen};

use super::render_controls;

const OVERVIEW_PREVIEW_LENGTH: usize = 160;

/// Waiting on a search, a detail lookup or question generation.
pub fn render_busy(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Percentage(40),
        Constraint::Length(5),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(area);

    let message = match (app.screen(), app.content()) {
        (Screen::Searching, _) => format!("Searching for \"{}\"...", app.query().trim()),
        (_, Some(content)) if app.is_generation_pending() => {
            format!("Generating questions for {}...", content.title)
        }
        (_, Some(content)) => format!("Loading {}...", content.title),
        (_, None) => "Loading...".to_string(),
    };

    let content = vec![
        Line::from(Span::styled("PIXEL QUIZ", Style::default().fg(Color::Magenta).bold())),
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(Color::Yellow))),
        Line::from(""),
        Line::from(app.status().unwrap_or_default().fg(Color::DarkGray)),
    ];
    frame.render_widget(Paragraph::new(content).alignment(Alignment::Center), chunks[1]);
    render_controls(frame, chunks[3], "esc cancel");
}

pub fn render_results(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(2),
        Constraint::Fill(1),
        Constraint::Length(6),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    let header = Paragraph::new(format!(
        "{} results for \"{}\"  ·  {}",
        app.results().len(),
        app.query().trim(),
        app.mode().label()
    ))
    .fg(Color::Cyan)
    .bold();
    frame.render_widget(header, chunks[0]);

    let lines: Vec<Line> = app
        .results()
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let is_selected = index == app.selected_result();
            let style = if is_selected {
                Style::default().fg(Color::Cyan).bold()
            } else {
                Style::default().fg(Color::Gray)
            };
            let marker = if is_selected { ">" } else { " " };

            Line::from(vec![
                Span::styled(format!(" {} ", marker), style),
                Span::styled(item.title.as_str(), style),
                Span::styled(
                    format!("  ({})  {}", item.year, item.media_type.label()),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), chunks[1]);

    if let Some(item) = app.results().get(app.selected_result()) {
        let widget = Paragraph::new(vec![
            Line::from(Span::styled(item.genre.as_str(), Style::default().fg(Color::Magenta))),
            Line::from(preview(&item.overview)),
        ])
        .wrap(Wrap { trim: true })
        .fg(Color::Gray)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Color::DarkGray)
                .padding(Padding::horizontal(1)),
        );
        frame.render_widget(widget, chunks[2]);
    }

    render_controls(frame, chunks[3], "j/k navigate  ·  enter play  ·  esc back");
}

fn preview(text: &str) -> String {
    if text.chars().count() > OVERVIEW_PREVIEW_LENGTH {
        let truncated: String = text.chars().take(OVERVIEW_PREVIEW_LENGTH).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}
