use std::collections::HashSet;
use std::fmt;
use std::iter::successors;
use thiserror::Error;
use time::{
    format_description::FormatItem, macros::format_description, Date, Duration, Month, Weekday,
};

static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

pub(crate) trait WeekdayExt {
    fn index0(&self) -> u16;
}

impl WeekdayExt for Weekday {
    fn index0(&self) -> u16 {
        self.number_days_from_sunday().into()
    }
}

/// Parse a date in `YYYY-MM-DD` form
pub(crate) fn parse_iso_date(s: &str) -> Result<Date, ParseDateError> {
    Date::parse(s, &YMD_FMT).map_err(|_| ParseDateError {
        value: s.to_owned(),
    })
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("invalid date {value:?}; expected YYYY-MM-DD")]
pub(crate) struct ParseDateError {
    value: String,
}

/// A year & month, stored as the first day of the month
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct YearMonth(Date);

impl YearMonth {
    pub(crate) fn containing(date: Date) -> YearMonth {
        YearMonth(date - Duration::days(i64::from(date.day()) - 1))
    }

    pub(crate) fn year(self) -> i32 {
        self.0.year()
    }

    pub(crate) fn month(self) -> Month {
        self.0.month()
    }

    /// Number of days in the month, accounting for leap years
    pub(crate) fn len(self) -> u8 {
        self.month().length(self.year())
    }

    pub(crate) fn first_day(self) -> Date {
        self.0
    }

    pub(crate) fn last_day(self) -> Date {
        self.0 + Duration::days(i64::from(self.len()) - 1)
    }

    pub(crate) fn contains(self, date: Date) -> bool {
        YearMonth::containing(date) == self
    }

    /// Iterate over every day of the month in ascending order
    pub(crate) fn days(self) -> impl Iterator<Item = Date> {
        let month = self.month();
        successors(Some(self.0), |d| d.next_day()).take_while(move |d| d.month() == month)
    }

    // Returns `None` at the ends of representable time
    pub(crate) fn pred(self) -> Option<YearMonth> {
        self.0.previous_day().map(YearMonth::containing)
    }

    pub(crate) fn succ(self) -> Option<YearMonth> {
        self.last_day().next_day().map(YearMonth)
    }

    /// Advance by `months`, stopping at the last representable month
    pub(crate) fn saturating_add(self, months: u32) -> YearMonth {
        let mut ym = self;
        for _ in 0..months {
            match ym.succ() {
                Some(next) => ym = next,
                None => break,
            }
        }
        ym
    }

    /// Three-letter month name, e.g., "Oct"
    pub(crate) fn short_name(self) -> String {
        self.month().to_string().chars().take(3).collect()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month(), self.year())
    }
}

/// A set of dates that remembers the order in which members were inserted
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct DateSet {
    order: Vec<Date>,
    members: HashSet<Date>,
}

impl DateSet {
    pub(crate) fn new() -> DateSet {
        DateSet::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub(crate) fn contains(&self, date: Date) -> bool {
        self.members.contains(&date)
    }

    /// Returns `false` if `date` was already present
    pub(crate) fn insert(&mut self, date: Date) -> bool {
        if self.members.insert(date) {
            self.order.push(date);
            true
        } else {
            false
        }
    }

    /// Returns `false` if `date` was not present
    pub(crate) fn remove(&mut self, date: Date) -> bool {
        if self.members.remove(&date) {
            self.order.retain(|&d| d != date);
            true
        } else {
            false
        }
    }

    /// Remove & return all members in insertion order
    pub(crate) fn take(&mut self) -> Vec<Date> {
        self.members.clear();
        std::mem::take(&mut self.order)
    }

    pub(crate) fn iter(&self) -> std::slice::Iter<'_, Date> {
        self.order.iter()
    }

    pub(crate) fn is_disjoint(&self, other: &DateSet) -> bool {
        self.members.is_disjoint(&other.members)
    }
}

impl Extend<Date> for DateSet {
    fn extend<I: IntoIterator<Item = Date>>(&mut self, iter: I) {
        for date in iter {
            self.insert(date);
        }
    }
}

impl FromIterator<Date> for DateSet {
    fn from_iter<I: IntoIterator<Item = Date>>(iter: I) -> DateSet {
        let mut set = DateSet::new();
        set.extend(iter);
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(parse_iso_date("2022-04-11"), Ok(date!(2022 - 04 - 11)));
        assert_eq!(
            parse_iso_date("2022-4-11"),
            Err(ParseDateError {
                value: String::from("2022-4-11")
            })
        );
        assert!(parse_iso_date("2022-02-30").is_err());
        assert!(parse_iso_date("").is_err());
        assert!(parse_iso_date("April 11").is_err());
    }

    #[test]
    fn test_display_is_parseable() {
        for d in [date!(2022 - 04 - 01), date!(900 - 12 - 31)] {
            assert_eq!(parse_iso_date(&d.to_string()), Ok(d));
        }
        assert_eq!(date!(900 - 12 - 31).to_string(), "0900-12-31");
    }

    #[test]
    fn test_month_lengths() {
        let ym = |d| YearMonth::containing(d).len();
        assert_eq!(ym(date!(2022 - 01 - 15)), 31);
        assert_eq!(ym(date!(2022 - 02 - 15)), 28);
        assert_eq!(ym(date!(2024 - 02 - 15)), 29);
        assert_eq!(ym(date!(2000 - 02 - 15)), 29);
        assert_eq!(ym(date!(1900 - 02 - 15)), 28);
        assert_eq!(ym(date!(2022 - 04 - 15)), 30);
    }

    #[test]
    fn test_year_month_rollover() {
        let dec = YearMonth::containing(date!(2022 - 12 - 25));
        assert_eq!(dec.first_day(), date!(2022 - 12 - 01));
        assert_eq!(dec.last_day(), date!(2022 - 12 - 31));
        let jan = dec.succ().unwrap();
        assert_eq!(jan.first_day(), date!(2023 - 01 - 01));
        assert_eq!(jan.pred(), Some(dec));
        assert_eq!(jan.to_string(), "January 2023");
        assert_eq!(dec.short_name(), "Dec");
        assert!(dec < jan);
    }

    #[test]
    fn test_saturating_add() {
        let ym = YearMonth::containing(date!(2022 - 11 - 30));
        assert_eq!(ym.saturating_add(0), ym);
        assert_eq!(
            ym.saturating_add(3),
            YearMonth::containing(date!(2023 - 02 - 01))
        );
        let end = YearMonth::containing(Date::MAX);
        assert_eq!(end.succ(), None);
        assert_eq!(end.saturating_add(5), end);
    }

    #[test]
    fn test_days() {
        let feb = YearMonth::containing(date!(2024 - 02 - 10));
        let days = feb.days().collect::<Vec<_>>();
        assert_eq!(days.len(), 29);
        assert_eq!(days.first(), Some(&date!(2024 - 02 - 01)));
        assert_eq!(days.last(), Some(&date!(2024 - 02 - 29)));
        assert!(feb.contains(date!(2024 - 02 - 29)));
        assert!(!feb.contains(date!(2024 - 03 - 01)));
    }

    #[test]
    fn test_date_set_keeps_insertion_order() {
        let mut set = DateSet::new();
        assert!(set.insert(date!(2022 - 04 - 12)));
        assert!(set.insert(date!(2022 - 04 - 11)));
        assert!(!set.insert(date!(2022 - 04 - 12)));
        assert_eq!(set.len(), 2);
        assert_eq!(
            set.iter().copied().collect::<Vec<_>>(),
            [date!(2022 - 04 - 12), date!(2022 - 04 - 11)]
        );
        assert!(set.remove(date!(2022 - 04 - 12)));
        assert!(!set.remove(date!(2022 - 04 - 12)));
        assert!(!set.contains(date!(2022 - 04 - 12)));
        assert_eq!(set.take(), [date!(2022 - 04 - 11)]);
        assert!(set.is_empty());
    }
}
