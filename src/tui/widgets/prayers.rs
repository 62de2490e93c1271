use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState},
    Frame,
};

use crate::models::MonthlyTimetable;
use crate::tui::theme;
use crate::utils::format::format_clock;

pub fn render(frame: &mut Frame, area: Rect, timetable: &MonthlyTimetable, focused_idx: usize) {
    let block = Block::default()
        .title(Span::styled(" Prayer Calls ", theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::gold())
        .style(theme::surface());

    let items: Vec<ListItem> = timetable
        .days
        .iter()
        .flat_map(|day| {
            day.events.iter().enumerate().map(move |(i, p)| {
                let date_str = if i == 0 {
                    day.date.format("%a %d %b").to_string()
                } else {
                    String::new()
                };

                let (icon, status_style, status_label) = if p.play {
                    ("●", theme::green(), "on")
                } else {
                    ("○", theme::red(), "muted")
                };

                let line = Line::from(vec![
                    Span::styled(format!(" {:>3} ", p.index), theme::dim()),
                    Span::styled(format!("{:<11}", date_str), theme::amber()),
                    Span::styled(format!("{:<9}", p.prayer_type.display_name()), theme::bold()),
                    Span::styled(format!("{:<13}", format_clock(&p.time)), theme::dim()),
                    Span::styled(icon, status_style),
                    Span::styled(format!("  {}", status_label), theme::dim()),
                ]);

                ListItem::new(line)
            })
        })
        .collect();

    let mut state = ListState::default();
    if !items.is_empty() {
        state.select(Some(focused_idx.min(items.len() - 1)));
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(theme::highlight().add_modifier(Modifier::BOLD))
        .highlight_symbol("▸");
    frame.render_stateful_widget(list, area, &mut state);
}
