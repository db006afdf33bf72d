//! Calendar event types.
//!
//! These are the records handed to the layout pipeline by ingestion. They keep
//! times exactly as the source expressed them; normalization into the target
//! timezone happens on demand through [`EventTime::in_timezone`].

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Shown when an event has no SUMMARY.
pub const NO_TITLE: &str = "No Title";

/// Shown when an event has no LOCATION.
pub const NO_LOCATION: &str = "No Location";

/// A calendar event (one VEVENT)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub uid: String,
    pub summary: Option<String>,
    /// Venue key for color coding
    pub location: Option<String>,
    pub start: Option<EventTime>,
    pub end: Option<EventTime>,
    pub recurrence: Option<Recurrence>,
}

/// RRULE plus the dates explicitly removed from or added to it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recurrence {
    /// RRULE value, e.g. `FREQ=WEEKLY;BYDAY=MO`
    pub rrule: String,
    /// EXDATE values
    pub exdates: Vec<EventTime>,
    /// RDATE values
    pub rdates: Vec<EventTime>,
}

/// A DTSTART/DTEND-style value, preserving how the source expressed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventTime {
    /// All-day value without a time of day
    Date(NaiveDate),
    DateTimeUtc(DateTime<Utc>),
    /// No timezone; read as wall-clock time in the target timezone
    DateTimeFloating(NaiveDateTime),
    DateTimeZoned {
        datetime: NaiveDateTime,
        tzid: String,
    },
}

/// Everything ingestion extracts from one calendar file.
#[derive(Debug, Clone, Default)]
pub struct CalendarData {
    /// Events without a RECURRENCE-ID
    pub events: Vec<Event>,
    /// Instance overrides, keyed by the occurrence they replace (wall-clock
    /// time in the target timezone). Not applied by the renderer.
    pub overrides: OverrideMap,
    /// Distinct LOCATION values across all VEVENTs
    pub venues: BTreeSet<String>,
}

pub type OverrideMap = BTreeMap<NaiveDateTime, Event>;

impl Event {
    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_some()
    }

    pub fn summary_or_default(&self) -> &str {
        self.summary.as_deref().unwrap_or(NO_TITLE)
    }

    pub fn location_or_default(&self) -> &str {
        self.location.as_deref().unwrap_or(NO_LOCATION)
    }

    /// DTEND if present, otherwise one hour after a timed start.
    /// All-day events without an end have no effective end.
    pub fn effective_end(&self) -> Option<EventTime> {
        if let Some(end) = &self.end {
            return Some(end.clone());
        }

        let hour = Duration::hours(1);
        match self.start.as_ref()? {
            EventTime::Date(_) => None,
            EventTime::DateTimeUtc(dt) => Some(EventTime::DateTimeUtc(*dt + hour)),
            EventTime::DateTimeFloating(dt) => Some(EventTime::DateTimeFloating(*dt + hour)),
            EventTime::DateTimeZoned { datetime, tzid } => Some(EventTime::DateTimeZoned {
                datetime: *datetime + hour,
                tzid: tzid.clone(),
            }),
        }
    }
}

impl EventTime {
    /// Whether this value carries a time of day.
    pub fn has_time(&self) -> bool {
        !matches!(self, EventTime::Date(_))
    }

    /// Normalize into `tz`. Returns `None` for all-day values.
    ///
    /// Floating times are read as wall-clock time in `tz`; UTC and zoned times
    /// are converted. A TZID chrono-tz doesn't know is treated as floating.
    pub fn in_timezone(&self, tz: Tz) -> Option<DateTime<Tz>> {
        match self {
            EventTime::Date(_) => None,
            EventTime::DateTimeUtc(dt) => Some(dt.with_timezone(&tz)),
            EventTime::DateTimeFloating(naive) => Some(localize(tz, *naive)),
            EventTime::DateTimeZoned { datetime, tzid } => match Tz::from_str(tzid) {
                Ok(source) => Some(localize(source, *datetime).with_timezone(&tz)),
                Err(_) => {
                    warn!(tzid = %tzid, "Unknown TZID, reading time as local to the target timezone");
                    Some(localize(tz, *datetime))
                }
            },
        }
    }
}

/// Pin a wall-clock time to `tz`.
///
/// Ambiguous times (DST fold) take the earlier instant. Times inside a DST gap
/// move forward by one hour, the way clocks do.
pub fn localize(tz: Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => tz
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
            .unwrap_or_else(|| tz.from_utc_datetime(&naive)),
    }
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventTime::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            EventTime::DateTimeUtc(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M UTC")),
            EventTime::DateTimeFloating(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M")),
            EventTime::DateTimeZoned { datetime, tzid } => {
                write!(f, "{} ({})", datetime.format("%Y-%m-%d %H:%M"), tzid)
            }
        }
    }
}
