use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while delivering a report
#[derive(Error, Debug)]
pub enum MailError {
    #[error("Invalid mail address '{address}': {reason}")]
    Address { address: String, reason: String },

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("SMTP transport error: {0}")]
    Transport(String),
}

/// An assembled report ready to send
#[derive(Debug, Clone)]
pub struct MailReport {
    pub subject: String,
    pub html: String,
}

impl MailReport {
    pub fn new(subject: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            html: html.into(),
        }
    }
}

/// Report delivery backend
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Backend name (for logs)
    fn name(&self) -> &str;

    /// Deliver the report. Callers treat failures as non-fatal.
    async fn send_report(&self, report: &MailReport) -> Result<(), MailError>;
}
