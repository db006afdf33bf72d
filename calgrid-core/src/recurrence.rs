//! RRULE expansion for recurring events.
//!
//! Materializes events into concrete occurrence starts inside a month window,
//! respecting EXDATEs and RDATEs. All times are normalized into the window's
//! timezone before the rule set is built.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use rrule::{RRule, RRuleSet, Unvalidated};
use tracing::{debug, warn};

use crate::error::{CalGridError, CalGridResult};
use crate::event::{Event, EventTime, Recurrence, localize};
use crate::month::MonthWindow;

/// Upper bound on occurrences generated per event per window.
pub const MAX_OCCURRENCES_PER_WINDOW: u16 = 4096;

/// One concrete instance of an event.
#[derive(Debug, Clone, Copy)]
pub struct Occurrence<'a> {
    pub event: &'a Event,
    /// Start in the target timezone
    pub start: DateTime<Tz>,
}

/// Expand one event into the sorted occurrence starts inside `window`.
///
/// - Events without a time of day yield nothing.
/// - Events without an RRULE yield their own start if it lies in the window.
/// - A recurring event without a start is a configuration error.
pub fn expand(event: &Event, window: &MonthWindow) -> CalGridResult<Vec<DateTime<Tz>>> {
    let tz = window.timezone();

    let Some(recurrence) = &event.recurrence else {
        return Ok(expand_single(event, window));
    };

    let start = event
        .start
        .as_ref()
        .ok_or_else(|| CalGridError::MissingAnchor(event.uid.clone()))?;

    let Some(anchor) = start.in_timezone(tz) else {
        debug!(uid = %event.uid, "Skipping all-day recurring event");
        return Ok(Vec::new());
    };

    expand_recurring(event, recurrence, anchor, window)
}

fn expand_single(event: &Event, window: &MonthWindow) -> Vec<DateTime<Tz>> {
    let Some(start) = event.start.as_ref().and_then(|s| s.in_timezone(window.timezone())) else {
        debug!(uid = %event.uid, "Skipping event without a start time");
        return Vec::new();
    };

    if window.contains(&start) {
        vec![start]
    } else {
        Vec::new()
    }
}

fn expand_recurring(
    event: &Event,
    recurrence: &Recurrence,
    anchor: DateTime<Tz>,
    window: &MonthWindow,
) -> CalGridResult<Vec<DateTime<Tz>>> {
    let tz = window.timezone();
    let rrule_tz: rrule::Tz = tz.into();

    let invalid = |message: String| CalGridError::Recurrence {
        uid: event.uid.clone(),
        message,
    };

    let rule = until_as_utc(&recurrence.rrule, tz)
        .parse::<RRule<Unvalidated>>()
        .map_err(|e| invalid(e.to_string()))?;
    let mut rrule_set: RRuleSet = rule
        .build(anchor.with_timezone(&rrule_tz))
        .map_err(|e| invalid(e.to_string()))?;

    let exdates = normalize_dates(&recurrence.exdates, tz, &event.uid, "EXDATE");
    for exdate in &exdates {
        rrule_set = rrule_set.exdate(exdate.with_timezone(&rrule_tz));
    }

    for rdate in normalize_dates(&recurrence.rdates, tz, &event.uid, "RDATE") {
        rrule_set = rrule_set.rdate(rdate.with_timezone(&rrule_tz));
    }

    // Widen by a second on each side so both window boundaries are included
    // whether or not the rrule bounds are exclusive.
    let after = (window.start - Duration::seconds(1)).with_timezone(&rrule_tz);
    let before = (window.end + Duration::seconds(1)).with_timezone(&rrule_tz);

    let result = rrule_set
        .after(after)
        .before(before)
        .all(MAX_OCCURRENCES_PER_WINDOW);

    if result.limited {
        warn!(
            uid = %event.uid,
            limit = MAX_OCCURRENCES_PER_WINDOW,
            "Recurring event hit the per-month occurrence limit"
        );
    }

    let mut occurrences: Vec<DateTime<Tz>> = result
        .dates
        .iter()
        .map(|dt| dt.with_timezone(&tz))
        .filter(|dt| window.contains(dt) && !exdates.contains(dt))
        .collect();

    occurrences.sort();
    occurrences.dedup();

    Ok(occurrences)
}

/// Rewrite a floating or date-only UNTIL as a UTC instant.
///
/// The anchor is always built in `tz`, and the rule set only accepts a UTC
/// UNTIL next to it. A floating value is wall-clock time in `tz`; a date-only
/// value covers the whole of that day. Values that don't parse are left alone
/// for the rrule parser to report.
fn until_as_utc(rrule: &str, tz: Tz) -> String {
    rrule
        .split(';')
        .map(|part| match part.split_once('=') {
            Some((key, value)) if key.trim().eq_ignore_ascii_case("UNTIL") => {
                match local_until(value.trim()) {
                    Some(naive) => {
                        let utc = localize(tz, naive).with_timezone(&Utc);
                        format!("UNTIL={}", utc.format("%Y%m%dT%H%M%SZ"))
                    }
                    None => part.to_string(),
                }
            }
            _ => part.to_string(),
        })
        .collect::<Vec<_>>()
        .join(";")
}

fn local_until(value: &str) -> Option<NaiveDateTime> {
    if value.ends_with(['Z', 'z']) {
        return None;
    }
    if value.len() == 8 {
        let end_of_day = NaiveTime::from_hms_opt(23, 59, 59)?;
        return NaiveDate::parse_from_str(value, "%Y%m%d")
            .ok()
            .map(|date| date.and_time(end_of_day));
    }
    NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S").ok()
}

/// Normalize EXDATE/RDATE values into `tz`, skipping date-only values.
fn normalize_dates(dates: &[EventTime], tz: Tz, uid: &str, kind: &str) -> Vec<DateTime<Tz>> {
    dates
        .iter()
        .filter_map(|date| {
            let normalized = date.in_timezone(tz);
            if normalized.is_none() {
                warn!(uid = %uid, kind, value = %date, "Skipping date-only value on timed recurrence");
            }
            normalized
        })
        .collect()
}

/// Expand every event for one window.
///
/// Recurring events are expanded first, in input order, then single events in
/// input order. Each event's own occurrences are chronological.
pub fn collect_occurrences<'a>(
    events: &'a [Event],
    window: &MonthWindow,
) -> CalGridResult<Vec<Occurrence<'a>>> {
    let (recurring, single): (Vec<&Event>, Vec<&Event>) =
        events.iter().partition(|e| e.is_recurring());

    let mut occurrences = Vec::new();
    for event in recurring.into_iter().chain(single) {
        occurrences.extend(
            expand(event, window)?
                .into_iter()
                .map(|start| Occurrence { event, start }),
        );
    }

    Ok(occurrences)
}
