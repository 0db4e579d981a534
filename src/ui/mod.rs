mod emoji;
mod home;
mod quiz;
mod result;
mod search;

use std::time::Duration;

use ratatui::{
    prelude::*,
    widgets::{Block, Paragraph},
};

use crate::app::{App, Screen};
use crate::engine::ModeKind;

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    match app.screen() {
        Screen::Home => home::render(frame, area, app),
        Screen::Searching | Screen::Loading => search::render_busy(frame, area, app),
        Screen::Results => search::render_results(frame, area, app),
        Screen::Playing if app.mode() == ModeKind::Emoji => emoji::render(frame, area, app),
        Screen::Playing => quiz::render(frame, area, app),
        Screen::Finished => result::render(frame, area, app),
    }
}

/// Parse a `#rrggbb` badge colour.
fn hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
    Some(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

fn format_remaining(remaining: Option<Duration>) -> String {
    match remaining {
        Some(left) => format!("{:>2}s", left.as_secs() + u64::from(left.subsec_nanos() > 0)),
        None => "--".to_string(),
    }
}

fn render_controls(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text.to_string())
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color() {
        assert_eq!(hex_color("#7b5bff"), Some(Color::Rgb(0x7b, 0x5b, 0xff)));
        assert_eq!(hex_color("7b5bff"), None);
        assert_eq!(hex_color("#xyzxyz"), None);
    }

    #[test]
    fn test_format_remaining_rounds_up() {
        assert_eq!(format_remaining(Some(Duration::from_millis(19_100))), "20s");
        assert_eq!(format_remaining(Some(Duration::from_secs(5))), " 5s");
        assert_eq!(format_remaining(None), "--");
    }
}
