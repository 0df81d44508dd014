use crate::calendar::{Booking, DatePicker, MonthView};
use crate::clock::Clock;
use crate::help::Help;
use crate::theme::{BASE_STYLE, STATUS_STYLE};
use crossterm::event::{read, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::Rect,
    text::Line,
    widgets::{StatefulWidget, Widget},
    Terminal,
};
use std::io::{self, Write};
use time::{Date, Duration};
use tracing::{debug, info};

static DEFAULT_STATUS: &str = "Press ? for help";

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct App<C> {
    picker: DatePicker,
    clock: C,
    cursor: Date,
    status: String,
    state: AppState,
}

impl<C: Clock> App<C> {
    pub(crate) fn new(picker: DatePicker, clock: C) -> App<C> {
        let mut app = App {
            picker,
            clock,
            cursor: Date::MIN,
            status: String::from(DEFAULT_STATUS),
            state: AppState::Picking,
        };
        app.cursor = app.default_cursor();
        app
    }

    /// Run the event loop until the user quits, then return the bookings
    /// made during the session
    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<Vec<Booking>> {
        while !self.quitting() {
            self.draw(&mut terminal)?;
            self.handle_input()?;
        }
        Ok(self.picker.into_bookings())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = read()?
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        }
        // else: Redraw on resize, and we might as well redraw on other stuff
        // too
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key or the requested
    // action could not be performed
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match self.state {
            AppState::Picking => match key {
                KeyCode::Char('h') | KeyCode::Left => self.move_cursor(-1),
                KeyCode::Char('l') | KeyCode::Right => self.move_cursor(1),
                KeyCode::Char('k') | KeyCode::Up => self.move_cursor(-7),
                KeyCode::Char('j') | KeyCode::Down => self.move_cursor(7),
                KeyCode::Char('p') | KeyCode::PageUp => self.previous_month(),
                KeyCode::Char('n') | KeyCode::PageDown => self.next_month(),
                KeyCode::Char(' ') | KeyCode::Enter => self.toggle(),
                KeyCode::Char('r') => self.reserve(),
                KeyCode::Char('0') | KeyCode::Home => {
                    self.reset();
                    true
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Picking;
                true
            }
            AppState::Quitting => false,
        }
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }

    // Today if it is in the active month, otherwise the first of the month
    fn default_cursor(&self) -> Date {
        let today = self.clock.today();
        let month = self.picker.active_month();
        if month.contains(today) {
            today
        } else {
            month.first_day()
        }
    }

    /// Move the cursor by `days`, changing the month if the new date is not
    /// shown in the current grid
    fn move_cursor(&mut self, days: i64) -> bool {
        let Some(target) = self.cursor.checked_add(Duration::days(days)) else {
            return false;
        };
        let grid = self.picker.month_grid();
        if !grid.contains(target) {
            let moved = if days < 0 {
                self.picker.go_to_previous_month(self.clock.today())
            } else {
                self.picker.go_to_next_month().is_ok()
            };
            if !moved {
                return false;
            }
        }
        self.cursor = target;
        true
    }

    fn previous_month(&mut self) -> bool {
        if self.picker.go_to_previous_month(self.clock.today()) {
            self.cursor = self.default_cursor();
            true
        } else {
            false
        }
    }

    fn next_month(&mut self) -> bool {
        if self.picker.go_to_next_month().is_ok() {
            self.cursor = self.default_cursor();
            true
        } else {
            false
        }
    }

    fn toggle(&mut self) -> bool {
        if self.cursor < self.clock.today() {
            // Past days cannot be booked
            return false;
        }
        self.picker.toggle_day_selection(self.cursor)
    }

    fn reserve(&mut self) -> bool {
        // Days selected before midnight may have become past days since
        let today = self.clock.today();
        let expired = self
            .picker
            .selected_dates()
            .iter()
            .copied()
            .filter(|&d| d < today)
            .collect::<Vec<_>>();
        for date in expired {
            self.picker.toggle_day_selection(date);
            debug!(%date, "Dropped past date from selection");
        }
        match self.picker.commit_booking() {
            Some(booking) => {
                info!(
                    booking = %booking,
                    unavailable = self.picker.unavailable_dates().len(),
                    session_bookings = self.picker.bookings().len(),
                    "Reserved dates"
                );
                let qty = booking.dates().len();
                self.status = format!(
                    "Reservation #{} confirmed: {} {}",
                    booking.seq(),
                    qty,
                    if qty == 1 { "night" } else { "nights" }
                );
                true
            }
            None => {
                self.status = String::from("Select at least one available day to reserve");
                false
            }
        }
    }

    fn reset(&mut self) {
        self.picker.go_to_initial_month();
        self.cursor = self.default_cursor();
    }
}

impl<C: Clock> Widget for &mut App<C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        let weeks = u16::try_from(self.picker.month_grid().weeks().len()).unwrap_or(u16::MAX);
        let view = MonthView::new(self.clock.today()).cursor(self.cursor);
        view.render(area, buf, &mut self.picker);
        let status_y = MonthView::height(weeks).saturating_add(1);
        if status_y < area.height {
            Line::styled(self.status.as_str(), STATUS_STYLE)
                .centered()
                .render(
                    Rect {
                        y: area.y + status_y,
                        height: 1,
                        ..area
                    },
                    buf,
                );
        }
        if self.state == AppState::Helping {
            Help(BASE_STYLE).render(area, buf);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Picking,
    Helping,
    Quitting,
}
