use async_trait::async_trait;
use tracing::debug;

use crate::{MailError, MailReport, Mailer};

/// Mailer used when SMTP credentials are not configured. Drops every report.
#[derive(Debug, Default)]
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    fn name(&self) -> &str {
        "noop"
    }

    async fn send_report(&self, report: &MailReport) -> Result<(), MailError> {
        debug!(
            subject = %report.subject,
            html_len = report.html.len(),
            "Mail delivery disabled, dropping report"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_always_succeeds() {
        let mailer = NoopMailer;
        let report = MailReport::new("Subject", "<p>body</p>");
        assert!(mailer.send_report(&report).await.is_ok());
        assert_eq!(mailer.name(), "noop");
    }
}
