use super::grid::{build_month_grid, MonthGrid};
use super::util::{DateSet, YearMonth};
use std::fmt;
use thiserror::Error;
use time::Date;
use tracing::{debug, info};

/// Selection & navigation state for the booking calendar.
///
/// Operations that depend on the current date take it as a `today`
/// argument; the picker never consults the system clock itself.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct DatePicker {
    initial_month: YearMonth,
    active_month: YearMonth,
    unavailable: DateSet,
    // Invariant: disjoint from `unavailable`
    selected: DateSet,
    bookings: Vec<Booking>,
}

impl DatePicker {
    /// Create a picker opened `months_in_advance` months after the month
    /// containing `today`
    pub(crate) fn new<I>(today: Date, months_in_advance: u32, unavailable: I) -> DatePicker
    where
        I: IntoIterator<Item = Date>,
    {
        let initial_month = YearMonth::containing(today).saturating_add(months_in_advance);
        DatePicker {
            initial_month,
            active_month: initial_month,
            unavailable: unavailable.into_iter().collect(),
            selected: DateSet::new(),
            bookings: Vec::new(),
        }
    }

    pub(crate) fn active_month(&self) -> YearMonth {
        self.active_month
    }

    /// Build the grid for the active month from the current unavailable set
    pub(crate) fn month_grid(&self) -> MonthGrid {
        build_month_grid(self.active_month, &self.unavailable)
    }

    pub(crate) fn selected_dates(&self) -> &DateSet {
        &self.selected
    }

    pub(crate) fn unavailable_dates(&self) -> &DateSet {
        &self.unavailable
    }

    pub(crate) fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    pub(crate) fn into_bookings(self) -> Vec<Booking> {
        self.bookings
    }

    pub(crate) fn is_previous_month_available(&self, today: Date) -> bool {
        self.active_month
            .pred()
            .is_some_and(|prev| prev >= YearMonth::containing(today))
    }

    /// Move to the previous month unless that would go before the month
    /// containing `today`.  Returns `false` if nothing changed.
    pub(crate) fn go_to_previous_month(&mut self, today: Date) -> bool {
        match self.active_month.pred() {
            Some(prev) if prev >= YearMonth::containing(today) => {
                debug!(month = %prev, "Moved to previous month");
                self.active_month = prev;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn go_to_next_month(&mut self) -> Result<(), OutOfTimeError> {
        let next = self.active_month.succ().ok_or(OutOfTimeError)?;
        debug!(month = %next, "Moved to next month");
        self.active_month = next;
        Ok(())
    }

    pub(crate) fn go_to_initial_month(&mut self) {
        self.active_month = self.initial_month;
    }

    pub(crate) fn is_day_unavailable(&self, date: Date) -> bool {
        self.unavailable.contains(date)
    }

    pub(crate) fn is_day_selected(&self, date: Date) -> bool {
        self.selected.contains(date)
    }

    /// Select `date` if it is not selected, or deselect it if it is.
    /// Unavailable dates cannot be selected, and `false` is returned for
    /// them without changing anything.
    pub(crate) fn toggle_day_selection(&mut self, date: Date) -> bool {
        if self.is_day_unavailable(date) {
            return false;
        }
        if self.selected.remove(date) {
            debug!(%date, "Deselected date");
        } else {
            self.selected.insert(date);
            debug!(%date, "Selected date");
        }
        true
    }

    /// Book every selected date: the dates become unavailable, the
    /// selection is cleared, and the new booking is recorded in the log and
    /// returned.  Returns `None` if nothing is selected.
    pub(crate) fn commit_booking(&mut self) -> Option<Booking> {
        if self.selected.is_empty() {
            return None;
        }
        let mut dates = self.selected.take();
        self.unavailable.extend(dates.iter().copied());
        dates.sort_unstable();
        let booking = Booking {
            seq: self.bookings.len() + 1,
            dates,
        };
        info!(seq = booking.seq, qty = booking.dates.len(), "Committed booking");
        self.bookings.push(booking.clone());
        debug_assert!(self.selected.is_disjoint(&self.unavailable));
        Some(booking)
    }
}

/// A set of dates reserved together by a single commit
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Booking {
    seq: usize,
    // Sorted ascending
    dates: Vec<Date>,
}

impl Booking {
    pub(crate) fn seq(&self) -> usize {
        self.seq
    }

    pub(crate) fn dates(&self) -> &[Date] {
        &self.dates
    }
}

impl fmt::Display for Booking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}:", self.seq)?;
        let Some((first, rest)) = self.dates.split_first() else {
            return Ok(());
        };
        write!(f, " {first}")?;
        for d in rest {
            write!(f, ", {d}")?;
        }
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("reached the end of time")]
pub(crate) struct OutOfTimeError;

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn april_2022_picker(today: Date) -> DatePicker {
        DatePicker::new(
            today,
            0,
            [
                date!(2022 - 04 - 11),
                date!(2022 - 04 - 12),
                date!(2022 - 04 - 14),
                date!(2022 - 04 - 15),
            ],
        )
    }

    #[test]
    fn test_opens_months_in_advance() {
        let picker = DatePicker::new(date!(2022 - 11 - 20), 2, []);
        assert_eq!(picker.active_month().to_string(), "January 2023");
        let picker = DatePicker::new(date!(2022 - 11 - 20), 0, []);
        assert_eq!(picker.active_month().to_string(), "November 2022");
    }

    #[test]
    fn test_cannot_go_before_current_month() {
        let today = date!(2022 - 04 - 05);
        let mut picker = april_2022_picker(today);
        assert!(!picker.is_previous_month_available(today));
        let before = picker.clone();
        assert!(!picker.go_to_previous_month(today));
        assert_eq!(picker, before);
        picker.go_to_next_month().unwrap();
        assert_eq!(picker.active_month().to_string(), "May 2022");
        assert!(picker.is_previous_month_available(today));
        assert!(picker.go_to_previous_month(today));
        assert_eq!(picker.active_month().to_string(), "April 2022");
    }

    #[test]
    fn test_previous_month_guard_uses_given_today() {
        let mut picker = DatePicker::new(date!(2022 - 04 - 05), 1, []);
        assert!(picker.is_previous_month_available(date!(2022 - 04 - 30)));
        // A month later, May is the earliest month that can be shown
        assert!(!picker.is_previous_month_available(date!(2022 - 05 - 01)));
        assert!(!picker.go_to_previous_month(date!(2022 - 05 - 01)));
        assert_eq!(picker.active_month().to_string(), "May 2022");
    }

    #[test]
    fn test_previous_month_guard_across_years() {
        let today = date!(2022 - 12 - 15);
        let mut picker = DatePicker::new(today, 1, []);
        assert_eq!(picker.active_month().to_string(), "January 2023");
        assert!(picker.go_to_previous_month(today));
        assert_eq!(picker.active_month().to_string(), "December 2022");
        assert!(!picker.go_to_previous_month(today));
    }

    #[test]
    fn test_next_month_is_unbounded() {
        let today = date!(2022 - 04 - 05);
        let mut picker = april_2022_picker(today);
        for _ in 0..36 {
            picker.go_to_next_month().unwrap();
        }
        assert_eq!(picker.active_month().to_string(), "April 2025");
        picker.go_to_initial_month();
        assert_eq!(picker.active_month().to_string(), "April 2022");
    }

    #[test]
    fn test_next_month_at_end_of_time() {
        let mut picker = DatePicker::new(Date::MAX, 0, []);
        assert_eq!(picker.go_to_next_month(), Err(OutOfTimeError));
    }

    #[test]
    fn test_toggle_selection() {
        let mut picker = april_2022_picker(date!(2022 - 04 - 05));
        let may1 = date!(2022 - 05 - 01);
        assert!(!picker.is_day_selected(may1));
        assert!(picker.toggle_day_selection(may1));
        assert!(picker.is_day_selected(may1));
        assert!(picker.toggle_day_selection(may1));
        assert!(!picker.is_day_selected(may1));
        assert!(picker.selected_dates().is_empty());
    }

    #[test]
    fn test_toggle_unavailable_is_noop() {
        let mut picker = april_2022_picker(date!(2022 - 04 - 05));
        let before = picker.clone();
        assert!(picker.is_day_unavailable(date!(2022 - 04 - 11)));
        assert!(!picker.toggle_day_selection(date!(2022 - 04 - 11)));
        assert!(!picker.is_day_selected(date!(2022 - 04 - 11)));
        assert_eq!(picker, before);
    }

    #[test]
    fn test_commit_booking() {
        let mut picker = april_2022_picker(date!(2022 - 04 - 05));
        assert_eq!(picker.commit_booking(), None);
        assert!(picker.bookings().is_empty());
        picker.toggle_day_selection(date!(2022 - 04 - 21));
        picker.toggle_day_selection(date!(2022 - 04 - 20));
        let booking = picker.commit_booking().unwrap();
        assert_eq!(booking.seq(), 1);
        assert_eq!(
            booking.dates(),
            [date!(2022 - 04 - 20), date!(2022 - 04 - 21)]
        );
        assert_eq!(booking.to_string(), "#1: 2022-04-20, 2022-04-21");
        assert!(picker.selected_dates().is_empty());
        assert!(picker.is_day_unavailable(date!(2022 - 04 - 20)));
        assert!(picker.is_day_unavailable(date!(2022 - 04 - 21)));
        // Booked dates are now terminal for selection
        assert!(!picker.toggle_day_selection(date!(2022 - 04 - 20)));
        let grid = picker.month_grid();
        assert!(grid.cells().iter().any(|c| c.date == date!(2022 - 04 - 21) && c.is_booked));
        picker.toggle_day_selection(date!(2022 - 04 - 30));
        assert_eq!(picker.commit_booking().map(|b| b.seq()), Some(2));
        assert_eq!(picker.bookings().len(), 2);
        assert_eq!(picker.into_bookings()[1].dates(), [date!(2022 - 04 - 30)]);
    }

    #[test]
    fn test_unavailable_set_holds_only_dates() {
        let mut picker = april_2022_picker(date!(2022 - 04 - 05));
        picker.toggle_day_selection(date!(2022 - 04 - 28));
        picker.commit_booking();
        assert_eq!(
            picker.unavailable.iter().copied().collect::<Vec<_>>(),
            [
                date!(2022 - 04 - 11),
                date!(2022 - 04 - 12),
                date!(2022 - 04 - 14),
                date!(2022 - 04 - 15),
                date!(2022 - 04 - 28),
            ]
        );
    }

    #[test]
    fn test_selected_and_unavailable_stay_disjoint() {
        let today = date!(2022 - 04 - 05);
        let mut picker = april_2022_picker(today);
        let days = picker
            .month_grid()
            .cells()
            .iter()
            .map(|c| c.date)
            .collect::<Vec<_>>();
        for (i, &d) in days.iter().enumerate() {
            picker.toggle_day_selection(d);
            if i % 3 == 0 {
                picker.toggle_day_selection(d);
            }
            if i % 11 == 0 {
                picker.commit_booking();
            }
            if i % 7 == 0 {
                picker.go_to_next_month().unwrap();
            } else if i % 5 == 0 {
                picker.go_to_previous_month(today);
            }
            assert!(picker.selected.is_disjoint(&picker.unavailable));
        }
    }
}
