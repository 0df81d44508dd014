use super::grid::DayCell;
use super::picker::DatePicker;
use super::util::WeekdayExt;
use crate::theme::{
    legend::{AVAILABLE_SWATCH, BOOKED_SWATCH, SELECTED_SWATCH},
    BOOKED_STYLE, CURSOR_STYLE, DISABLED_STYLE, OTHER_MONTH_STYLE, PAST_STYLE, RESERVE_STYLE,
    SELECTED_STYLE, TITLE_STYLE, WEEKDAY_STYLE,
};
use ratatui::{prelude::*, widgets::*};
use time::{Date, Weekday};

static HEADER: &str = "  Su    Mo    Tu    We    Th    Fr    Sa  ";

static LEGEND: &[(&str, Style)] = &[
    ("Booked", BOOKED_SWATCH),
    ("Available", AVAILABLE_SWATCH),
    ("Selected", SELECTED_SWATCH),
];

const SWATCH: &str = "■";

/// Number of columns between legend entries
const LEGEND_GAP: u16 = 3;

/// Number of columns per day of week
const DAY_WIDTH: u16 = 6;

/// Offset of a day's text from the left edge of its column
const DAY_INSET: u16 = 1;

/// Width of the calendar in columns
const MAIN_WIDTH: u16 = DAY_WIDTH * 7;

const TITLE_LINE: u16 = 0;

const WEEKDAY_LINE: u16 = 1;

/// Line on which the first week is drawn; the line above it is a rule
const GRID_TOP: u16 = 3;

const ACS_HLINE: char = '─';

/// Renders the active month of a `DatePicker`: a title with the adjacent
/// months, a weekday header, one line per week, a legend, and the reserve
/// control
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct MonthView {
    today: Date,
    cursor: Option<Date>,
}

impl MonthView {
    pub(crate) fn new(today: Date) -> MonthView {
        MonthView {
            today,
            cursor: None,
        }
    }

    pub(crate) fn cursor(mut self, date: Date) -> MonthView {
        self.cursor = Some(date);
        self
    }

    /// Total number of lines drawn for a month with `weeks` weeks
    pub(crate) fn height(weeks: u16) -> u16 {
        // title, weekdays, rule, weeks, rule, legend, blank, reserve
        GRID_TOP + weeks + 4
    }

    fn day_style(&self, cell: &DayCell, picker: &DatePicker) -> Style {
        let mut style = if cell.is_current_month {
            Style::new()
        } else {
            OTHER_MONTH_STYLE
        };
        if cell.is_booked {
            style = style.patch(BOOKED_STYLE);
        } else if cell.date < self.today {
            style = style.patch(PAST_STYLE);
        } else if picker.is_day_selected(cell.date) {
            style = style.patch(SELECTED_STYLE);
        }
        if self.cursor == Some(cell.date) {
            style = style.patch(CURSOR_STYLE);
        }
        style
    }

    fn show_day(&self, cell: &DayCell) -> String {
        if cell.date == self.today {
            format!("[{:2}]", cell.day_of_month)
        } else {
            format!(" {:2} ", cell.day_of_month)
        }
    }
}

impl StatefulWidget for MonthView {
    type State = DatePicker;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let left = area.width.saturating_sub(MAIN_WIDTH) / 2;
        let [_, area, _] = Layout::horizontal([
            Constraint::Length(left),
            Constraint::Length(MAIN_WIDTH.min(area.width)),
            Constraint::Min(0),
        ])
        .areas(area);
        let grid = state.month_grid();
        let month = grid.month();
        let mut canvas = BufferCanvas::new(area, buf);
        let prev = month.pred().map(|m| format!("< {}", m.short_name()));
        let next = month.succ().map(|m| format!("{} >", m.short_name()));
        let prev_style = if state.is_previous_month_available(self.today) {
            TITLE_STYLE
        } else {
            DISABLED_STYLE
        };
        canvas.draw_title(month.to_string(), prev.map(|s| (s, prev_style)), next);
        canvas.draw_weekdays();
        let mut bottom = GRID_TOP;
        for (i, week) in std::iter::zip(0u16.., grid.weeks()) {
            for cell in week {
                let s = self.show_day(cell);
                canvas.draw_day(i, cell.date.weekday(), s, self.day_style(cell, state));
            }
            bottom = GRID_TOP + i + 1;
        }
        canvas.hline(bottom, 0, ACS_HLINE, MAIN_WIDTH);
        canvas.draw_legend(bottom + 1);
        canvas.draw_reserve(bottom + 3, state.selected_dates().len());
    }
}

#[derive(Debug, Eq, PartialEq)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer) -> Self {
        Self { area, buf }
    }

    fn draw_title(&mut self, title: String, prev: Option<(String, Style)>, next: Option<String>) {
        if let Some((s, style)) = prev {
            self.mvprint(TITLE_LINE, 0, s, style);
        }
        let x = centered(&title);
        self.mvprint(TITLE_LINE, x, title, TITLE_STYLE);
        if let Some(s) = next {
            self.mvprint(TITLE_LINE, MAIN_WIDTH.saturating_sub(width(&s)), s, TITLE_STYLE);
        }
    }

    fn draw_weekdays(&mut self) {
        self.mvprint(WEEKDAY_LINE, 0, HEADER, WEEKDAY_STYLE);
        self.hline(WEEKDAY_LINE + 1, 0, ACS_HLINE, MAIN_WIDTH);
    }

    fn draw_day(&mut self, week_no: u16, wd: Weekday, s: String, style: Style) {
        self.mvprint(
            GRID_TOP + week_no,
            DAY_WIDTH * wd.index0() + DAY_INSET,
            s,
            style,
        );
    }

    fn draw_legend(&mut self, y: u16) {
        let total = LEGEND
            .iter()
            .map(|(label, _)| width(SWATCH) + 1 + width(label))
            .sum::<u16>()
            + LEGEND_GAP * 2;
        let mut x = MAIN_WIDTH.saturating_sub(total) / 2;
        for &(label, swatch_style) in LEGEND {
            self.mvprint(y, x, SWATCH, swatch_style);
            x += width(SWATCH) + 1;
            self.mvprint(y, x, label, Style::new());
            x += width(label) + LEGEND_GAP;
        }
    }

    fn draw_reserve(&mut self, y: u16, selected_qty: usize) {
        let (s, style) = if selected_qty == 0 {
            (String::from("[ Reserve ]"), DISABLED_STYLE)
        } else {
            (format!("[ Reserve ({selected_qty}) ]"), RESERVE_STYLE)
        };
        let x = centered(&s);
        self.mvprint(y, x, s, style);
    }

    fn mvprint<S: AsRef<str>>(&mut self, y: u16, x: u16, s: S, style: Style) {
        if y < self.area.height && x < self.area.width {
            let text = Text::styled(s.as_ref(), style);
            let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
            // Using a Paragraph lets us truncate text that extends beyond the
            // calendar's area, though we need to be sure that the Rect passed
            // to the Paragraph is entirely within the frame lest a panic
            // result.
            Paragraph::new(text).render(
                Rect {
                    x: x + self.area.x,
                    y: y + self.area.y,
                    width: (self.area.width - x).min(width),
                    height: 1,
                },
                self.buf,
            );
        }
    }

    fn hline(&mut self, y: u16, x: u16, ch: char, length: u16) {
        self.mvprint(y, x, String::from(ch).repeat(length.into()), Style::new());
    }
}

fn width(s: &str) -> u16 {
    u16::try_from(s.chars().count()).unwrap_or(u16::MAX)
}

fn centered(s: &str) -> u16 {
    MAIN_WIDTH.saturating_sub(width(s)) / 2
}
