//! Plain-text rendering of the timetable for terminals and logs.

use std::io::{self, Write};

use crate::models::MonthlyTimetable;
use crate::utils::format::{format_clock, format_day, play_label};

const HEADERS: [&str; 5] = ["#", "Date", "Adhan", "Time", "Play"];

const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const GOLD: &str = "\x1b[38;2;196;160;68m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Writes one row per call. The date is printed on the first row of each day
/// only, so days read as merged cells.
pub fn write_timetable(w: &mut impl Write, timetable: &MonthlyTimetable, color: bool) -> io::Result<()> {
    let rows: Vec<[String; 5]> = timetable
        .days
        .iter()
        .flat_map(|day| {
            day.events.iter().enumerate().map(|(i, p)| {
                [
                    p.index.to_string(),
                    if i == 0 { format_day(&p.time) } else { String::new() },
                    p.prayer_type.to_string(),
                    format_clock(&p.time),
                    play_label(p.play).to_string(),
                ]
            })
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let paint = |style: &str, text: String| {
        if color {
            format!("{}{}{}", style, text, RESET)
        } else {
            text
        }
    };

    let rule: String = widths
        .iter()
        .map(|w| "-".repeat(w + 2))
        .collect::<Vec<_>>()
        .join("+");
    let rule = format!("+{}+", rule);

    writeln!(w, "{}", paint(DIM, rule.clone()))?;
    let header: Vec<String> = HEADERS
        .iter()
        .zip(widths)
        .map(|(h, width)| format!(" {:<width$} ", h.to_uppercase()))
        .collect();
    writeln!(w, "|{}|", paint(GOLD, header.join("|")))?;
    writeln!(w, "{}", paint(DIM, rule.clone()))?;

    if rows.is_empty() {
        writeln!(w, "  {}", paint(DIM, "No upcoming prayer calls".to_string()))?;
    }

    for (row, prayer) in rows.iter().zip(timetable.events()) {
        let cells: Vec<String> = row
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!(" {:<width$} ", cell))
            .collect();
        let line = cells.join("|");
        let line = if prayer.play {
            paint(BOLD, line)
        } else {
            paint(RED, line)
        };
        writeln!(w, "|{}|", line)?;
    }
    writeln!(w, "{}", paint(DIM, rule))?;
    w.flush()
}
