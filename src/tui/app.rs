use anyhow::Result;
use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};
use std::sync::mpsc;

use crate::models::{MonthlyTimetable, Prayer, PrayerType};
use crate::player::{PlaybackError, Player};
use crate::schedule::PrayerService;
use crate::tui::events::{Event, EventHandler, SchedulerEvent};
use crate::tui::widgets::{header, next_prayer, prayers, statusbar};

/// Passes calls through to the real device (if any) and tells the dashboard.
pub struct AnnouncingPlayer {
    inner: Option<Box<dyn Player>>,
    tx: mpsc::Sender<SchedulerEvent>,
}

impl AnnouncingPlayer {
    pub fn new(inner: Option<Box<dyn Player>>, tx: mpsc::Sender<SchedulerEvent>) -> Self {
        Self { inner, tx }
    }
}

impl Player for AnnouncingPlayer {
    fn play(&self, prayer: PrayerType) -> Result<(), PlaybackError> {
        if let Some(inner) = &self.inner {
            inner.play(prayer)?;
        }
        // The dashboard may already be gone
        let _ = self.tx.send(SchedulerEvent::Played(prayer));
        Ok(())
    }
}

pub struct App {
    pub service: PrayerService,
    pub location: String,
    pub timetable: MonthlyTimetable,
    pub focus_idx: usize,
    pub next_prayer: Option<(Prayer, i64)>,
    pub message: Option<String>,
    pub scheduler_error: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(service: PrayerService, location: String) -> Self {
        App {
            service,
            location,
            timetable: MonthlyTimetable::default(),
            focus_idx: 0,
            next_prayer: None,
            message: None,
            scheduler_error: None,
            should_quit: false,
        }
    }

    /// Re-read the shared timetable; the scheduler may have rolled months.
    pub fn refresh(&mut self) {
        self.timetable = self.service.timetable();
        self.focus_idx = self.focus_idx.min(self.timetable.len().saturating_sub(1));

        let now = Utc::now();
        self.next_prayer = self.service.next_prayer(&now).map(|p| {
            let secs = (p.time.with_timezone(&Utc) - now).num_seconds();
            (p, secs)
        });
    }

    pub fn handle_scheduler_event(&mut self, event: SchedulerEvent) {
        match event {
            SchedulerEvent::Played(prayer) => {
                self.message = Some(format!("Played {} adhan", prayer));
            }
            SchedulerEvent::Stopped(err) => {
                self.scheduler_error = Some(err);
            }
        }
        self.refresh();
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        // Only handle actual key presses; ignore release/repeat events from some terminals
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.focus_idx = self.focus_idx.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let max = self.timetable.len().saturating_sub(1);
                if self.focus_idx < max {
                    self.focus_idx += 1;
                }
            }
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_focused(),
            KeyCode::Char('m') => {
                self.timetable = self.service.mute_all();
                self.message = Some("All prayer calls muted".to_string());
            }
            KeyCode::Char('u') => {
                self.timetable = self.service.unmute_all();
                self.message = Some("All prayer calls will play".to_string());
            }
            _ => return,
        }
        self.refresh();
    }

    fn toggle_focused(&mut self) {
        let Some(index) = self.timetable.events().nth(self.focus_idx).map(|p| p.index) else {
            return;
        };
        self.message = Some(match self.service.toggle(index) {
            Ok(p) if p.play => format!("{} at {} will play", p.prayer_type, p.time.format("%a %H:%M")),
            Ok(p) => format!("{} at {} muted", p.prayer_type, p.time.format("%a %H:%M")),
            // The scheduler replaced the month underneath us
            Err(e) => e.to_string(),
        });
    }

    pub fn draw(&self, frame: &mut Frame) {
        let area = frame.area();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Min(8),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(area);

        header::render(frame, rows[0], &self.location, self.timetable.len());

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(28), Constraint::Min(40)])
            .split(rows[1]);

        next_prayer::render(frame, body[0], self.next_prayer.as_ref());
        prayers::render(frame, body[1], &self.timetable, self.focus_idx);

        statusbar::render_message(
            frame,
            rows[2],
            self.message.as_deref(),
            self.scheduler_error.as_deref(),
        );
        statusbar::render(frame, rows[3]);
    }
}

/// Run the dashboard until the user quits. The scheduler keeps its own thread.
pub fn run(
    service: PrayerService,
    location: String,
    scheduler: mpsc::Receiver<SchedulerEvent>,
) -> Result<()> {
    let mut app = App::new(service, location);
    app.refresh();

    let mut terminal = ratatui::init();
    let events = EventHandler::new(500, scheduler);

    loop {
        terminal.draw(|frame| app.draw(frame))?;

        match events.next()? {
            Event::Key(key) => {
                app.handle_key(key);
                if app.should_quit {
                    break;
                }
            }
            Event::Scheduler(event) => app.handle_scheduler_event(event),
            Event::Tick => app.refresh(),
        }
    }

    ratatui::restore();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DailyTimetable, Prayer};
    use crate::schedule::PrayerStore;
    use chrono::{DateTime, Duration, NaiveDate};
    use crossterm::event::KeyModifiers;
    use std::sync::Arc;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app_with_future_calls() -> (App, Arc<PrayerStore>) {
        let start = Utc::now() + Duration::hours(1);
        let events = PrayerType::all()
            .into_iter()
            .enumerate()
            .map(|(i, prayer_type)| Prayer {
                index: i as u32,
                prayer_type,
                time: DateTime::from(start + Duration::hours(i as i64)),
                play: true,
            })
            .collect();
        let store = Arc::new(PrayerStore::new());
        store.replace(MonthlyTimetable::new(vec![DailyTimetable {
            date: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
            events,
        }]));

        let mut app = App::new(PrayerService::new(Arc::clone(&store)), "Auckland, NewZealand".into());
        app.refresh();
        (app, store)
    }

    #[test]
    fn space_toggles_focused_call() {
        let (mut app, store) = app_with_future_calls();
        app.handle_key(press(KeyCode::Down));
        app.handle_key(press(KeyCode::Char(' ')));

        assert!(!store.get(1).unwrap().play);
        assert!(store.get(0).unwrap().play);
        assert!(app.message.as_deref().unwrap().contains("muted"));
    }

    #[test]
    fn bulk_keys_mute_and_unmute() {
        let (mut app, store) = app_with_future_calls();
        app.handle_key(press(KeyCode::Char('m')));
        assert!(store.snapshot().events().all(|p| !p.play));
        assert!(app.timetable.events().all(|p| !p.play));

        app.handle_key(press(KeyCode::Char('u')));
        assert!(store.snapshot().events().all(|p| p.play));
    }

    #[test]
    fn focus_stays_inside_timetable() {
        let (mut app, store) = app_with_future_calls();
        for _ in 0..10 {
            app.handle_key(press(KeyCode::Down));
        }
        assert_eq!(app.focus_idx, 4);

        store.replace(MonthlyTimetable::default());
        app.refresh();
        assert_eq!(app.focus_idx, 0);
        // Nothing to toggle, nothing happens
        app.handle_key(press(KeyCode::Enter));
    }

    #[test]
    fn toggle_on_stale_copy_leaves_new_month_alone() {
        let (mut app, store) = app_with_future_calls();

        // The scheduler rolls over before the dashboard refreshes
        let rolled: Vec<Prayer> = store
            .snapshot()
            .events()
            .map(|p| Prayer {
                index: store.next_index() + p.index,
                ..p.clone()
            })
            .collect();
        store.replace(MonthlyTimetable::new(vec![DailyTimetable {
            date: NaiveDate::from_ymd_opt(2021, 2, 1).unwrap(),
            events: rolled,
        }]));

        app.handle_key(press(KeyCode::Char(' ')));

        assert!(store.snapshot().events().all(|p| p.play));
        assert!(app.message.as_deref().unwrap().contains("index 0"));
    }

    #[test]
    fn next_prayer_counts_down() {
        let (app, _) = app_with_future_calls();
        let (prayer, secs) = app.next_prayer.clone().unwrap();
        assert_eq!(prayer.index, 0);
        assert!(secs > 3500 && secs <= 3600);
    }

    #[test]
    fn scheduler_stop_is_kept_for_display() {
        let (mut app, _) = app_with_future_calls();
        app.handle_scheduler_event(SchedulerEvent::Stopped("playing adhan failed".into()));
        assert_eq!(app.scheduler_error.as_deref(), Some("playing adhan failed"));
    }

    #[test]
    fn announcing_player_reports_plays() {
        let (tx, rx) = mpsc::channel();
        let player = AnnouncingPlayer::new(None, tx);
        player.play(PrayerType::Asr).unwrap();
        assert!(matches!(rx.try_recv(), Ok(SchedulerEvent::Played(PrayerType::Asr))));
    }
}
