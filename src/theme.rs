use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub(crate) const TITLE_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const WEEKDAY_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const DISABLED_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

pub(crate) const STATUS_STYLE: Style = BASE_STYLE.add_modifier(Modifier::ITALIC);

pub(crate) const RESERVE_STYLE: Style = BASE_STYLE
    .fg(Color::LightGreen)
    .add_modifier(Modifier::BOLD);

// The day styles below are patched onto whatever is already in the buffer,
// so they only set what they change.

pub(crate) const OTHER_MONTH_STYLE: Style = Style::new().fg(Color::DarkGray);

pub(crate) const BOOKED_STYLE: Style = Style::new()
    .fg(Color::Red)
    .add_modifier(Modifier::CROSSED_OUT);

pub(crate) const PAST_STYLE: Style = Style::new()
    .fg(Color::DarkGray)
    .add_modifier(Modifier::DIM);

pub(crate) const SELECTED_STYLE: Style = Style::new()
    .fg(Color::Black)
    .bg(Color::LightGreen)
    .add_modifier(Modifier::BOLD);

pub(crate) const CURSOR_STYLE: Style = Style::new().add_modifier(Modifier::REVERSED);

pub(crate) mod legend {
    use super::*;

    pub(crate) const BOOKED_SWATCH: Style = BASE_STYLE.fg(Color::Red);

    pub(crate) const AVAILABLE_SWATCH: Style = BASE_STYLE;

    pub(crate) const SELECTED_SWATCH: Style = BASE_STYLE.fg(Color::LightGreen);
}
