//! ICS ingestion.
//!
//! Reads an RFC 5545 calendar into the records the layout pipeline consumes.

mod parse;

pub use parse::load_calendar;
