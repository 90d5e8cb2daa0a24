use thiserror::Error;

use bossreport_age::BirthDateError;
use bossreport_narrative::StructuredParseError;

#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid birth date: {0}")]
    InvalidBirthDate(#[from] BirthDateError),

    #[error("Malformed narrative response: {0}")]
    MalformedNarrative(#[from] StructuredParseError),
}

impl AnalyzeError {
    /// True for errors caused by the caller's payload
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AnalyzeError::MissingField(_) | AnalyzeError::InvalidBirthDate(_)
        )
    }
}
