//! Calendar months and the time windows they cover.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, Duration, Month, Months, NaiveDate, NaiveTime};
use chrono_tz::Tz;

use crate::error::{CalGridError, CalGridResult};
use crate::event::localize;

/// A calendar month (year + month number).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    first: NaiveDate,
    /// First day of the following month
    next_first: NaiveDate,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> CalGridResult<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| CalGridError::InvalidMonth(format!("{year}-{month:02}")))?;

        let next_first = first
            .checked_add_months(Months::new(1))
            .ok_or_else(|| CalGridError::InvalidMonth(format!("{year}-{month:02}")))?;

        Ok(YearMonth { first, next_first })
    }

    /// The month containing `date`.
    pub fn containing(date: NaiveDate) -> CalGridResult<Self> {
        Self::new(date.year(), date.month())
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    /// 1-based month number
    pub fn month(&self) -> u32 {
        self.first.month()
    }

    /// English month name, e.g. "January"
    pub fn name(&self) -> &'static str {
        u8::try_from(self.month())
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map_or("", |m| m.name())
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn last_day(&self) -> NaiveDate {
        self.next_first - Days::new(1)
    }

    pub fn days_in_month(&self) -> u32 {
        (self.next_first - self.first).num_days() as u32
    }

    /// The following month, wrapping December into January of the next year.
    pub fn next(&self) -> Option<Self> {
        Self::new(self.next_first.year(), self.next_first.month()).ok()
    }

    /// `months` months later.
    pub fn plus_months(&self, months: u32) -> Option<Self> {
        let first = self.first.checked_add_months(Months::new(months))?;
        Self::new(first.year(), first.month()).ok()
    }

    /// Closed window from the first instant of the month in `tz` to one second
    /// before the next month starts. A repeated hour on the last evening stays
    /// inside the window.
    pub fn window(&self, tz: Tz) -> MonthWindow {
        let start = localize(tz, self.first.and_time(NaiveTime::MIN));
        let end = localize(tz, self.next_first.and_time(NaiveTime::MIN)) - Duration::seconds(1);

        MonthWindow { start, end }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year(), self.month())
    }
}

impl FromStr for YearMonth {
    type Err = CalGridError;

    /// Parse `YYYY-MM`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CalGridError::InvalidMonth(format!("'{s}'. Expected YYYY-MM"));

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;

        Self::new(year, month)
    }
}

/// Inclusive time window covered by one month page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl MonthWindow {
    pub fn timezone(&self) -> Tz {
        self.start.timezone()
    }

    /// Inclusive of both boundaries.
    pub fn contains(&self, dt: &DateTime<Tz>) -> bool {
        *dt >= self.start && *dt <= self.end
    }
}

/// Inclusive range of months, iterated in calendar order.
#[derive(Debug, Clone)]
pub struct MonthRange {
    next: Option<YearMonth>,
    last: YearMonth,
}

impl MonthRange {
    /// Empty if `from` is after `to`.
    pub fn new(from: YearMonth, to: YearMonth) -> Self {
        MonthRange {
            next: (from <= to).then_some(from),
            last: to,
        }
    }
}

impl Iterator for MonthRange {
    type Item = YearMonth;

    fn next(&mut self) -> Option<YearMonth> {
        let current = self.next?;
        self.next = if current < self.last {
            current.next()
        } else {
            None
        };
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike, Utc};
    use chrono_tz::Africa::Cairo;
    use chrono_tz::America::New_York;

    #[test]
    fn rejects_invalid_month_numbers() {
        assert!(YearMonth::new(2024, 0).is_err());
        assert!(YearMonth::new(2024, 13).is_err());
    }

    #[test]
    fn parses_year_month() {
        let ym: YearMonth = "2024-02".parse().unwrap();
        assert_eq!(ym.year(), 2024);
        assert_eq!(ym.month(), 2);
        assert_eq!(ym.to_string(), "2024-02");
        assert!("2024/02".parse::<YearMonth>().is_err());
        assert!("february".parse::<YearMonth>().is_err());
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(YearMonth::new(2024, 2).unwrap().days_in_month(), 29);
        assert_eq!(YearMonth::new(2023, 2).unwrap().days_in_month(), 28);
        assert_eq!(YearMonth::new(1900, 2).unwrap().days_in_month(), 28);
        assert_eq!(YearMonth::new(2000, 2).unwrap().days_in_month(), 29);
        assert_eq!(YearMonth::new(2024, 4).unwrap().days_in_month(), 30);
        assert_eq!(YearMonth::new(2024, 12).unwrap().days_in_month(), 31);
    }

    #[test]
    fn month_names() {
        assert_eq!(YearMonth::new(2024, 1).unwrap().name(), "January");
        assert_eq!(YearMonth::new(2024, 12).unwrap().name(), "December");
    }

    #[test]
    fn window_covers_whole_month_in_timezone() {
        let window = YearMonth::new(2024, 1).unwrap().window(New_York);

        assert_eq!(window.start.naive_local().to_string(), "2024-01-01 00:00:00");
        assert_eq!(window.end.naive_local().to_string(), "2024-01-31 23:59:59");
        // New York is UTC-5 in January
        assert_eq!(window.start.with_timezone(&Utc).hour(), 5);
    }

    #[test]
    fn window_is_inclusive() {
        let window = YearMonth::new(2024, 1).unwrap().window(New_York);
        assert!(window.contains(&window.start));
        assert!(window.contains(&window.end));
        assert!(!window.contains(&(window.end + chrono::Duration::seconds(1))));
        assert!(!window.contains(&(window.start - chrono::Duration::seconds(1))));
    }

    #[test]
    fn window_keeps_repeated_hour_on_last_evening() {
        // Cairo falls back from 24:00 to 23:00 on Thursday 2024-10-31
        let window = YearMonth::new(2024, 10).unwrap().window(Cairo);
        assert_eq!(window.end.naive_local().to_string(), "2024-10-31 23:59:59");
        assert_eq!(window.end.with_timezone(&Utc).to_string(), "2024-10-31 21:59:59 UTC");

        // 23:30 the second time round
        let repeated = Utc.with_ymd_and_hms(2024, 10, 31, 21, 30, 0).unwrap().with_timezone(&Cairo);
        assert_eq!(repeated.hour(), 23);
        assert!(window.contains(&repeated));
    }

    #[test]
    fn consecutive_windows_meet_without_gaps() {
        for tz in [New_York, Cairo, Tz::UTC] {
            let mut month = YearMonth::new(2024, 1).unwrap();
            for _ in 0..12 {
                let next = month.next().unwrap();
                let window = month.window(tz);
                assert_eq!(window.end + chrono::Duration::seconds(1), next.window(tz).start);
                month = next;
            }
        }
    }

    #[test]
    fn range_wraps_year_boundary() {
        let from = YearMonth::new(2024, 11).unwrap();
        let to = YearMonth::new(2025, 2).unwrap();
        let months: Vec<String> = MonthRange::new(from, to).map(|m| m.to_string()).collect();
        assert_eq!(months, vec!["2024-11", "2024-12", "2025-01", "2025-02"]);
    }

    #[test]
    fn range_with_single_month() {
        let m = YearMonth::new(2024, 6).unwrap();
        assert_eq!(MonthRange::new(m, m).count(), 1);
    }

    #[test]
    fn reversed_range_is_empty() {
        let from = YearMonth::new(2025, 1).unwrap();
        let to = YearMonth::new(2024, 1).unwrap();
        assert_eq!(MonthRange::new(from, to).count(), 0);
    }

    #[test]
    fn plus_months_wraps() {
        let m = YearMonth::new(2024, 10).unwrap();
        assert_eq!(m.plus_months(12).unwrap().to_string(), "2025-10");
        assert_eq!(m.plus_months(3).unwrap().to_string(), "2025-01");
    }
}
