mod noop;
mod smtp;
mod traits;

pub use noop::NoopMailer;
pub use smtp::{SmtpMailer, SmtpSettings, DEFAULT_SMTP_PORT, DEFAULT_SMTP_SERVER};
pub use traits::{MailError, MailReport, Mailer};
