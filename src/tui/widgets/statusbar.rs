use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect) {
    let hints = vec![
        ("[↑↓]", " move  "),
        ("[space]", " toggle  "),
        ("[m]", " mute all  "),
        ("[u]", " unmute all  "),
        ("[Esc]", " quit"),
    ];

    let mut spans = Vec::new();
    for (key, label) in &hints {
        spans.push(Span::styled(*key, theme::gold()));
        spans.push(Span::styled(*label, theme::dim()));
    }

    let line = Line::from(spans);
    let paragraph = Paragraph::new(line).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

/// Last action result, or the scheduler's fatal error which takes precedence.
pub fn render_message(frame: &mut Frame, area: Rect, message: Option<&str>, error: Option<&str>) {
    let line = match (error, message) {
        (Some(err), _) => Line::from(Span::styled(format!("✗ scheduler stopped: {}", err), theme::red())),
        (None, Some(msg)) => Line::from(Span::styled(msg.to_string(), theme::amber())),
        (None, None) => Line::from(""),
    };
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}
