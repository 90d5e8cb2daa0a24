use thiserror::Error;

/// Reasons a birth date could not be resolved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BirthDateError {
    #[error("No birth date information supplied")]
    MissingInput,

    #[error("Unrecognized month: {0}")]
    InvalidMonth(String),

    #[error("Invalid {field}: {value}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Not a calendar date: {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    #[error("Unparseable date: {0}")]
    Unparseable(String),
}
