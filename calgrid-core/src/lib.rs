//! Core of calgrid: printable month grids from iCalendar data.
//!
//! The pipeline runs leaves first:
//! - `recurrence` expands events into occurrences inside a month window
//! - `day_index` buckets occurrences by day of month
//! - `layout` computes the 7×6 grid geometry
//! - `text_fit` wraps event lines to cell width
//! - `render` draws one month as a PDF page
//!
//! `page::CalendarPrinter` ties them together per month, `ics` reads the
//! input calendar and `calgrid_config` the user's settings.

pub mod calgrid_config;
pub mod color;
pub mod day_index;
pub mod error;
pub mod event;
pub mod ics;
pub mod layout;
pub mod month;
pub mod page;
pub mod recurrence;
pub mod render;
pub mod text_fit;

// Re-export the types callers need at crate root for convenience
pub use calgrid_config::CalgridConfig;
pub use color::{Color, ColorRegistry};
pub use error::{CalGridError, CalGridResult};
pub use event::{CalendarData, Event, EventTime, Recurrence};
pub use month::{MonthRange, YearMonth};
pub use page::{CalendarPrinter, MIME_TYPE, MonthPage};
