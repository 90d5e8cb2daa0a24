use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info};

use crate::{MailError, MailReport, Mailer};

pub const DEFAULT_SMTP_SERVER: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Connection and addressing settings for [`SmtpMailer`]
#[derive(Clone)]
pub struct SmtpSettings {
    pub server: String,
    pub port: u16,
    /// Login name; also used as the sender address
    pub username: String,
    pub password: String,
    /// Recipients. Empty means "send to the sender address".
    pub recipients: Vec<String>,
}

impl std::fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("recipients", &self.recipients)
            .finish()
    }
}

/// STARTTLS SMTP delivery of HTML reports
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Vec<Mailbox>,
}

impl SmtpMailer {
    pub fn new(settings: SmtpSettings) -> Result<Self, MailError> {
        let from = parse_mailbox(&settings.username)?;
        let to = if settings.recipients.is_empty() {
            vec![from.clone()]
        } else {
            settings
                .recipients
                .iter()
                .map(|address| parse_mailbox(address))
                .collect::<Result<Vec<_>, _>>()?
        };

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.server)
            .map_err(|e| MailError::Transport(e.to_string()))?
            .port(settings.port)
            .credentials(Credentials::new(settings.username, settings.password))
            .build();

        Ok(Self {
            transport,
            from,
            to,
        })
    }

    fn build_message(&self, report: &MailReport) -> Result<Message, MailError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(report.subject.as_str())
            .header(ContentType::TEXT_HTML);
        for recipient in &self.to {
            builder = builder.to(recipient.clone());
        }

        builder
            .body(report.html.clone())
            .map_err(|e| MailError::Build(e.to_string()))
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address.trim().parse::<Mailbox>().map_err(|e| MailError::Address {
        address: address.to_string(),
        reason: e.to_string(),
    })
}

#[async_trait]
impl Mailer for SmtpMailer {
    fn name(&self) -> &str {
        "smtp"
    }

    async fn send_report(&self, report: &MailReport) -> Result<(), MailError> {
        let message = self.build_message(report)?;

        debug!(
            recipients = self.to.len(),
            html_len = report.html.len(),
            "Sending report"
        );

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        info!(code = %response.code(), "Report delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(recipients: Vec<String>) -> SmtpSettings {
        SmtpSettings {
            server: DEFAULT_SMTP_SERVER.to_string(),
            port: DEFAULT_SMTP_PORT,
            username: "reports@example.com".to_string(),
            password: "hunter2".to_string(),
            recipients,
        }
    }

    #[tokio::test]
    async fn test_defaults_to_sender_as_recipient() {
        let mailer = SmtpMailer::new(settings(vec![])).unwrap();
        assert_eq!(mailer.to.len(), 1);
        assert_eq!(mailer.to[0].email.to_string(), "reports@example.com");
    }

    #[tokio::test]
    async fn test_invalid_recipient_rejected() {
        let result = SmtpMailer::new(settings(vec!["not-an-address".to_string()]));
        assert!(matches!(result, Err(MailError::Address { .. })));
    }

    #[tokio::test]
    async fn test_message_headers() {
        let mailer = SmtpMailer::new(settings(vec![
            "a@example.com".to_string(),
            "b@example.com".to_string(),
        ]))
        .unwrap();
        let report = MailReport::new("Your Workplace Performance Report", "<p>hello</p>");

        let message = mailer.build_message(&report).unwrap();
        let formatted = String::from_utf8_lossy(&message.formatted()).to_string();

        assert!(formatted.contains("Subject: Your Workplace Performance Report"));
        assert!(formatted.contains("From: reports@example.com"));
        assert!(formatted.contains("a@example.com"));
        assert!(formatted.contains("b@example.com"));
        assert!(formatted.contains("Content-Type: text/html; charset=utf-8"));
    }

    #[test]
    fn test_debug_redacts_password() {
        let rendered = format!("{:?}", settings(vec![]));
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }
}
