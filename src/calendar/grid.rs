use super::util::{DateSet, WeekdayExt, YearMonth};
use std::slice::ChunksExact;
use time::Date;

pub(crate) const DAYS_IN_WEEK: usize = 7;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct DayCell {
    pub(crate) date: Date,
    pub(crate) day_of_month: u8,
    pub(crate) is_current_month: bool,
    pub(crate) is_booked: bool,
}

impl DayCell {
    fn new(date: Date, is_current_month: bool, unavailable: &DateSet) -> DayCell {
        DayCell {
            date,
            day_of_month: date.day(),
            is_current_month,
            is_booked: unavailable.contains(date),
        }
    }
}

/// The cells of a month laid out Sunday-first in rows of seven: the tail of
/// the previous month, every day of the month itself, and the head of the
/// next month.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct MonthGrid {
    month: YearMonth,
    cells: Vec<DayCell>,
}

impl MonthGrid {
    pub(crate) fn month(&self) -> YearMonth {
        self.month
    }

    #[cfg(test)]
    pub(crate) fn cells(&self) -> &[DayCell] {
        &self.cells
    }

    pub(crate) fn weeks(&self) -> ChunksExact<'_, DayCell> {
        self.cells.chunks_exact(DAYS_IN_WEEK)
    }

    pub(crate) fn first_date(&self) -> Option<Date> {
        self.cells.first().map(|c| c.date)
    }

    pub(crate) fn last_date(&self) -> Option<Date> {
        self.cells.last().map(|c| c.date)
    }

    pub(crate) fn contains(&self, date: Date) -> bool {
        self.first_date().is_some_and(|d| d <= date) && self.last_date().is_some_and(|d| date <= d)
    }
}

pub(crate) fn build_month_grid(month: YearMonth, unavailable: &DateSet) -> MonthGrid {
    let active = build_active_month_days(month, unavailable);
    let mut cells = build_leading_days(month, &active, unavailable);
    let trailing = build_trailing_days(month, &active, unavailable);
    cells.extend(active);
    cells.extend(trailing);
    MonthGrid { month, cells }
}

pub(crate) fn build_active_month_days(month: YearMonth, unavailable: &DateSet) -> Vec<DayCell> {
    month
        .days()
        .map(|d| DayCell::new(d, true, unavailable))
        .collect()
}

/// Returns the days at the end of the month before `month` that share a week
/// with the first of `active_days`
pub(crate) fn build_leading_days(
    month: YearMonth,
    active_days: &[DayCell],
    unavailable: &DateSet,
) -> Vec<DayCell> {
    let (Some(first), Some(prev)) = (active_days.first(), month.pred()) else {
        return Vec::new();
    };
    let qty = usize::from(first.date.weekday().index0());
    prev.days()
        .skip(usize::from(prev.len()).saturating_sub(qty))
        .map(|d| DayCell::new(d, false, unavailable))
        .collect()
}

/// Returns the days at the start of the month after `month` that share a
/// week with the last of `active_days`
pub(crate) fn build_trailing_days(
    month: YearMonth,
    active_days: &[DayCell],
    unavailable: &DateSet,
) -> Vec<DayCell> {
    let (Some(last), Some(next)) = (active_days.last(), month.succ()) else {
        return Vec::new();
    };
    let qty = DAYS_IN_WEEK - 1 - usize::from(last.date.weekday().index0());
    next.days()
        .take(qty)
        .map(|d| DayCell::new(d, false, unavailable))
        .collect()
}
