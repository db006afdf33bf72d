//! Error types for calgrid.

use thiserror::Error;

/// Errors that can occur while expanding, laying out or rendering a calendar.
#[derive(Error, Debug)]
pub enum CalGridError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Recurring event '{0}' has no start to anchor its RRULE")]
    MissingAnchor(String),

    #[error("Invalid RRULE for event '{uid}': {message}")]
    Recurrence { uid: String, message: String },

    #[error("ICS parse error: {0}")]
    IcsParse(String),

    #[error("Unknown timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid color '{0}'. Expected #RRGGBB")]
    InvalidColor(String),

    #[error("Invalid month: {0}")]
    InvalidMonth(String),

    #[error("PDF generation error: {0}")]
    Pdf(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<lopdf::Error> for CalGridError {
    fn from(err: lopdf::Error) -> Self {
        CalGridError::Pdf(err.to_string())
    }
}

/// Result type alias for calgrid operations.
pub type CalGridResult<T> = Result<T, CalGridError>;
