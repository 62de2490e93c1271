use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::Prayer;
use crate::tui::theme;
use crate::utils::format::{format_clock, format_duration_secs};

pub fn render(frame: &mut Frame, area: Rect, next_prayer: Option<&(Prayer, i64)>) {
    let block = Block::default()
        .title(Span::styled(" Next Adhan ", theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());

    let content: Vec<Line> = match next_prayer {
        None => vec![
            Line::from(""),
            Line::from(Span::styled("  Waiting for timetable", theme::dim())),
        ],
        Some((prayer, secs)) => {
            let name = prayer.prayer_type.display_name().to_uppercase();
            let duration = format_duration_secs(*secs);
            let (state, state_style) = if prayer.play {
                ("will play", theme::green())
            } else {
                ("muted", theme::red())
            };
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!("  {}", name),
                    theme::gold().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(format!("  {}", format_clock(&prayer.time)), theme::dim())),
                Line::from(""),
                Line::from(vec![
                    Span::styled("  in  ", theme::dim()),
                    Span::styled(duration, theme::amber().add_modifier(Modifier::BOLD)),
                ]),
                Line::from(""),
                Line::from(Span::styled(format!("  {}", state), state_style)),
            ]
        }
    };

    let paragraph = Paragraph::new(content)
        .block(block)
        .alignment(Alignment::Left);

    frame.render_widget(paragraph, area);
}
