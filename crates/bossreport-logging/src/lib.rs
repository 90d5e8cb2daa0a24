//! # bossreport-logging
//!
//! Logging for the bossreport service.
//!
//! ## Key Types
//!
//! - [`Logger`] - Per-request structured event logging
//! - [`LogEvent`] - Log event types
//! - [`LogFormat`] - Output formats (Pretty, JSON, Compact)
//!
//! Submitter e-mail addresses never reach the logs; [`submitter_digest`]
//! produces a short stable identifier instead.

mod events;

pub use events::{LogEvent, LogFormat, Logger};

use sha2::{Digest, Sha256};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing for the application
pub fn init_tracing(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_target(false))
                .init();
        }
        LogFormat::Pretty | LogFormat::Compact => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_target(false))
                .init();
        }
    }
}

/// Short, stable, non-reversible identifier for a submitter e-mail.
pub fn submitter_digest(email: &str) -> String {
    let normalized = email.trim().to_lowercase();
    if normalized.is_empty() {
        return "-".to_string();
    }

    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    let hash = hex::encode(hasher.finalize());
    hash[..10].to_string()
}
