//! Per-day buckets of formatted occurrences for one month page.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike};
use chrono_tz::Tz;

use crate::event::Event;
use crate::recurrence::Occurrence;

/// One line in a day cell.
#[derive(Debug, Clone, PartialEq)]
pub struct DayEntry {
    pub start: DateTime<Tz>,
    /// `"HH:MM - Summary @ Location"`
    pub text: String,
}

/// Day-of-month → entries.
///
/// Entries within a day are chronological. Entries starting at the same
/// instant keep the order their occurrences were indexed in.
#[derive(Debug, Clone, Default)]
pub struct DayBuckets {
    days: BTreeMap<u32, Vec<DayEntry>>,
}

impl DayBuckets {
    /// Bucket occurrences by the day of month of their start. No entries are
    /// deduplicated.
    pub fn index<'a>(occurrences: impl IntoIterator<Item = Occurrence<'a>>) -> Self {
        let mut days: BTreeMap<u32, Vec<DayEntry>> = BTreeMap::new();

        for occurrence in occurrences {
            days.entry(occurrence.start.day()).or_default().push(DayEntry {
                start: occurrence.start,
                text: display_line(occurrence.event, &occurrence.start),
            });
        }

        // Stable: equal starts keep indexing order
        for entries in days.values_mut() {
            entries.sort_by_key(|entry| entry.start);
        }

        DayBuckets { days }
    }

    pub fn entries(&self, day: u32) -> &[DayEntry] {
        self.days.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn lines(&self, day: u32) -> impl Iterator<Item = &str> {
        self.entries(day).iter().map(|entry| entry.text.as_str())
    }

    /// Days that have at least one entry, ascending.
    pub fn days(&self) -> impl Iterator<Item = u32> + '_ {
        self.days.keys().copied()
    }

    /// Total number of entries across all days.
    pub fn len(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Format an occurrence as `"HH:MM - Summary @ Location"`.
pub fn display_line(event: &Event, start: &DateTime<Tz>) -> String {
    format!(
        "{} - {} @ {}",
        start.format("%H:%M"),
        event.summary_or_default(),
        event.location_or_default()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventTime, Recurrence};
    use crate::month::YearMonth;
    use crate::recurrence::collect_occurrences;
    use chrono::NaiveDate;
    use chrono_tz::America::New_York;

    fn floating(d: u32, h: u32, min: u32) -> Option<EventTime> {
        Some(EventTime::DateTimeFloating(
            NaiveDate::from_ymd_opt(2024, 1, d)
                .unwrap()
                .and_hms_opt(h, min, 0)
                .unwrap(),
        ))
    }

    fn event(summary: Option<&str>, location: Option<&str>, start: Option<EventTime>) -> Event {
        Event {
            uid: summary.unwrap_or("untitled").to_string(),
            summary: summary.map(String::from),
            location: location.map(String::from),
            start,
            end: None,
            recurrence: None,
        }
    }

    fn index(events: &[Event]) -> DayBuckets {
        let window = YearMonth::new(2024, 1).unwrap().window(New_York);
        DayBuckets::index(collect_occurrences(events, &window).unwrap())
    }

    #[test]
    fn single_event_lands_in_its_day() {
        let buckets = index(&[event(Some("Standup"), Some("Room A"), floating(3, 9, 0))]);

        assert_eq!(buckets.days().collect::<Vec<_>>(), vec![3]);
        assert_eq!(
            buckets.lines(3).collect::<Vec<_>>(),
            vec!["09:00 - Standup @ Room A"]
        );
    }

    #[test]
    fn missing_summary_and_location_use_placeholders() {
        let buckets = index(&[event(None, None, floating(5, 14, 5))]);
        assert_eq!(
            buckets.lines(5).collect::<Vec<_>>(),
            vec!["14:05 - No Title @ No Location"]
        );
    }

    #[test]
    fn duplicates_are_kept() {
        let e = event(Some("Standup"), Some("Room A"), floating(3, 9, 0));
        let buckets = index(&[e.clone(), e]);
        assert_eq!(buckets.entries(3).len(), 2);
        assert_eq!(buckets.len(), 2);
    }

    #[test]
    fn empty_day_has_no_entries() {
        let buckets = index(&[]);
        assert!(buckets.is_empty());
        assert!(buckets.entries(12).is_empty());
    }

    #[test]
    fn day_entries_are_chronological_across_sources() {
        // The recurring event is expanded first but starts later in the day
        let mut weekly = event(Some("Weekly"), Some("Hall"), floating(1, 9, 0));
        weekly.recurrence = Some(Recurrence {
            rrule: "FREQ=WEEKLY".to_string(),
            ..Recurrence::default()
        });
        let early = event(Some("Early"), Some("Cafe"), floating(1, 8, 0));

        let buckets = index(&[weekly, early]);
        assert_eq!(
            buckets.lines(1).collect::<Vec<_>>(),
            vec!["08:00 - Early @ Cafe", "09:00 - Weekly @ Hall"]
        );
        assert_eq!(buckets.entries(8).len(), 1);
    }

    #[test]
    fn equal_start_times_keep_processing_order() {
        let first = event(Some("First"), Some("A"), floating(10, 12, 0));
        let second = event(Some("Second"), Some("B"), floating(10, 12, 0));

        let buckets = index(&[first, second]);
        assert_eq!(
            buckets.lines(10).collect::<Vec<_>>(),
            vec!["12:00 - First @ A", "12:00 - Second @ B"]
        );
    }
}
