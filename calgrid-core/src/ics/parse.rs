//! ICS parsing using the icalendar crate's parser.

use chrono::{NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use icalendar::{
    CalendarDateTime, DatePerhapsTime,
    parser::{Component, Property, read_calendar, unfold},
};
use tracing::{debug, warn};

use crate::error::{CalGridError, CalGridResult};
use crate::event::{CalendarData, Event, EventTime, Recurrence};

/// Parse ICS content into events, instance overrides and venues.
///
/// VEVENTs carrying a RECURRENCE-ID become overrides keyed by that
/// recurrence-id as wall-clock time in `tz`; every other VEVENT becomes an
/// event. Venues are collected from all VEVENTs.
pub fn load_calendar(content: &str, tz: Tz) -> CalGridResult<CalendarData> {
    let unfolded = unfold(content);
    let calendar =
        read_calendar(&unfolded).map_err(|e| CalGridError::IcsParse(e.to_string()))?;

    let mut vevents = Vec::new();
    collect_vevents(&calendar.components, &mut vevents);

    let mut data = CalendarData::default();
    for (index, vevent) in vevents.into_iter().enumerate() {
        let event = parse_event(vevent, index);

        if let Some(venue) = &event.location {
            data.venues.insert(venue.clone());
        }

        match vevent.find_prop("RECURRENCE-ID") {
            Some(prop) => match recurrence_key(prop, tz) {
                Some(key) => {
                    data.overrides.insert(key, event);
                }
                None => debug!(uid = %event.uid, "Dropping override without a usable RECURRENCE-ID"),
            },
            None => data.events.push(event),
        }
    }

    debug!(
        events = data.events.len(),
        overrides = data.overrides.len(),
        venues = data.venues.len(),
        "Loaded calendar"
    );

    Ok(data)
}

/// Depth-first collection of VEVENT components, wherever they are nested.
fn collect_vevents<'c, 'a>(components: &'c [Component<'a>], out: &mut Vec<&'c Component<'a>>) {
    for component in components {
        if component.name == "VEVENT" {
            out.push(component);
        } else {
            collect_vevents(&component.components, out);
        }
    }
}

fn parse_event(vevent: &Component, index: usize) -> Event {
    let uid = vevent
        .find_prop("UID")
        .map(|p| p.val.to_string())
        .filter(|uid| !uid.trim().is_empty())
        .unwrap_or_else(|| format!("event-{index}"));

    let summary = text_value(vevent, "SUMMARY");
    let location = text_value(vevent, "LOCATION");

    let start = date_value(vevent, "DTSTART", &uid);
    let end = date_value(vevent, "DTEND", &uid);

    let recurrence = vevent.find_prop("RRULE").map(|p| Recurrence {
        rrule: p.val.to_string(),
        exdates: date_lists(vevent, "EXDATE", &uid),
        rdates: date_lists(vevent, "RDATE", &uid),
    });

    Event {
        uid,
        summary,
        location,
        start,
        end,
        recurrence,
    }
}

/// A TEXT property, unescaped and trimmed. Blank values count as absent.
fn text_value(vevent: &Component, name: &str) -> Option<String> {
    vevent
        .find_prop(name)
        .map(|p| unescape_text(p.val.as_ref()).trim().to_string())
        .filter(|value| !value.is_empty())
}

fn date_value(vevent: &Component, name: &str, uid: &str) -> Option<EventTime> {
    let prop = vevent.find_prop(name)?;
    match DatePerhapsTime::try_from(prop) {
        Ok(dpt) => Some(to_event_time(dpt)),
        Err(_) => {
            warn!(uid, property = name, value = %prop.val.as_ref(), "Ignoring unparseable date");
            None
        }
    }
}

/// Convert icalendar's DatePerhapsTime to our EventTime, preserving timezone info
fn to_event_time(dpt: DatePerhapsTime) -> EventTime {
    match dpt {
        DatePerhapsTime::Date(d) => EventTime::Date(d),
        DatePerhapsTime::DateTime(cal_dt) => match cal_dt {
            CalendarDateTime::Utc(dt) => EventTime::DateTimeUtc(dt),
            CalendarDateTime::Floating(naive) => EventTime::DateTimeFloating(naive),
            CalendarDateTime::WithTimezone { date_time, tzid } => EventTime::DateTimeZoned {
                datetime: date_time,
                tzid,
            },
        },
    }
}

/// The occurrence an override replaces, as wall-clock time in `tz`.
/// Date-only recurrence-ids have no time of day and yield `None`.
fn recurrence_key(prop: &Property, tz: Tz) -> Option<NaiveDateTime> {
    let time = to_event_time(DatePerhapsTime::try_from(prop).ok()?);
    time.in_timezone(tz).map(|dt| dt.naive_local())
}

/// All values of every `name` property (EXDATE or RDATE) of a VEVENT.
fn date_lists(vevent: &Component, name: &str, uid: &str) -> Vec<EventTime> {
    vevent
        .properties
        .iter()
        .filter(|p| p.name == name)
        .flat_map(|p| parse_date_list(p, uid))
        .collect()
}

/// Parse a comma-separated EXDATE/RDATE value.
///
/// Handles:
/// - TZID parameter: `EXDATE;TZID=America/New_York:20240108T100000`
/// - VALUE=DATE: `EXDATE;VALUE=DATE:20240108`
/// - UTC: `EXDATE:20240108T100000Z`
/// - Floating: `EXDATE:20240108T100000`
///
/// Malformed items are skipped one by one. VALUE=PERIOD lists are skipped
/// entirely.
fn parse_date_list(prop: &Property, uid: &str) -> Vec<EventTime> {
    let value_type = param(prop, "VALUE");
    if value_type.as_deref() == Some("PERIOD") {
        warn!(uid, property = %prop.name.as_ref(), "Skipping PERIOD values");
        return Vec::new();
    }
    let is_date = value_type.as_deref() == Some("DATE");
    let tzid = param(prop, "TZID");

    prop.val
        .as_ref()
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .filter_map(|item| {
            let parsed = parse_date_item(item, is_date, tzid.as_deref());
            if parsed.is_none() {
                warn!(uid, property = %prop.name.as_ref(), value = item, "Skipping malformed date");
            }
            parsed
        })
        .collect()
}

fn parse_date_item(item: &str, is_date: bool, tzid: Option<&str>) -> Option<EventTime> {
    const DATE_TIME: &str = "%Y%m%dT%H%M%S";

    if is_date {
        return NaiveDate::parse_from_str(item, "%Y%m%d")
            .ok()
            .map(EventTime::Date);
    }

    if let Some(utc) = item.strip_suffix('Z') {
        return NaiveDateTime::parse_from_str(utc, DATE_TIME)
            .ok()
            .map(|dt| EventTime::DateTimeUtc(dt.and_utc()));
    }

    let datetime = NaiveDateTime::parse_from_str(item, DATE_TIME).ok()?;
    Some(match tzid {
        Some(tzid) => EventTime::DateTimeZoned {
            datetime,
            tzid: tzid.to_string(),
        },
        None => EventTime::DateTimeFloating(datetime),
    })
}

fn param(prop: &Property, key: &str) -> Option<String> {
    prop.params
        .iter()
        .find(|p| p.key == key)
        .and_then(|p| p.val.as_ref().map(|v| v.to_string()))
}

/// Undo RFC 5545 TEXT escaping (`\\`, `\;`, `\,`, `\n`).
fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n' | 'N') => out.push('\n'),
            Some(escaped) => out.push(escaped),
            None => out.push('\\'),
        }
    }
    out
}
