use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use uuid::Uuid;

/// Structured log events for one report request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LogEvent {
    RequestReceived {
        request_id: Uuid,
        lang: String,
        /// Digest of the submitter e-mail, never the address itself
        submitter: String,
    },
    RequestRejected {
        request_id: Uuid,
        reason: String,
    },
    AgeResolved {
        request_id: Uuid,
        age: u32,
        fallback: bool,
    },
    NarrativeCompleted {
        request_id: Uuid,
        kind: String,
        duration_secs: f64,
        chars: usize,
    },
    NarrativeFailed {
        request_id: Uuid,
        kind: String,
        error: String,
    },
    MailQueued {
        request_id: Uuid,
        mailer: String,
    },
    MailFailed {
        request_id: Uuid,
        error: String,
    },
    RequestCompleted {
        request_id: Uuid,
        metrics: usize,
        analysis_chars: usize,
        duration_secs: f64,
    },
}

impl LogEvent {
    pub fn request_id(&self) -> Uuid {
        match self {
            LogEvent::RequestReceived { request_id, .. }
            | LogEvent::RequestRejected { request_id, .. }
            | LogEvent::AgeResolved { request_id, .. }
            | LogEvent::NarrativeCompleted { request_id, .. }
            | LogEvent::NarrativeFailed { request_id, .. }
            | LogEvent::MailQueued { request_id, .. }
            | LogEvent::MailFailed { request_id, .. }
            | LogEvent::RequestCompleted { request_id, .. } => *request_id,
        }
    }

    /// Add a timestamp to serialize with the event
    fn with_timestamp(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        if let Some(obj) = value.as_object_mut() {
            obj.insert(
                "timestamp".to_string(),
                serde_json::Value::String(chrono::Utc::now().to_rfc3339()),
            );
        }
        value
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with colors
    #[default]
    Pretty,
    /// JSON lines format for machine consumption
    Json,
    /// Compact single-line format
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

/// Logger for request events - handles both console output and file logging
pub struct Logger {
    format: LogFormat,
    file_writer: Option<Mutex<File>>,
}

impl Logger {
    pub fn new(format: LogFormat) -> Self {
        Self {
            format,
            file_writer: None,
        }
    }

    /// Create a logger with file output in addition to console
    pub fn with_file(format: LogFormat, log_path: &Path) -> std::io::Result<Self> {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        Ok(Self {
            format,
            file_writer: Some(Mutex::new(file)),
        })
    }

    pub fn format(&self) -> LogFormat {
        self.format
    }

    pub fn log(&self, event: &LogEvent) {
        // File output is always JSON
        if let Some(ref writer) = self.file_writer {
            if let Ok(mut file) = writer.lock() {
                let json = event.with_timestamp();
                let _ = writeln!(file, "{}", json);
            }
        }

        match self.format {
            LogFormat::Json => self.log_json(event),
            LogFormat::Pretty => self.log_pretty(event),
            LogFormat::Compact => self.log_compact(event),
        }
    }

    fn log_json(&self, event: &LogEvent) {
        let _ = writeln!(std::io::stderr(), "{}", event.with_timestamp());
    }

    fn log_pretty(&self, event: &LogEvent) {
        let mut stderr = std::io::stderr();
        let id = short_id(event.request_id());
        let tag = format!("[{}]", id).dimmed();

        match event {
            LogEvent::RequestReceived {
                lang, submitter, ..
            } => {
                let _ = writeln!(
                    stderr,
                    "{} {} {} lang={} submitter={}",
                    tag,
                    "▶".bright_cyan(),
                    "REPORT".bright_cyan().bold(),
                    lang,
                    submitter.dimmed()
                );
            }
            LogEvent::RequestRejected { reason, .. } => {
                let _ = writeln!(
                    stderr,
                    "{}   {} Rejected: {}",
                    tag,
                    "✗".bright_red(),
                    reason.bright_red()
                );
            }
            LogEvent::AgeResolved { age, fallback, .. } => {
                if *fallback {
                    let _ = writeln!(
                        stderr,
                        "{}   {} Age: {} {}",
                        tag,
                        "⚠".bright_yellow(),
                        age,
                        "(birth date unresolved)".dimmed()
                    );
                } else {
                    let _ = writeln!(stderr, "{}   {} Age: {}", tag, "✓".bright_green(), age);
                }
            }
            LogEvent::NarrativeCompleted {
                kind,
                duration_secs,
                chars,
                ..
            } => {
                let _ = writeln!(
                    stderr,
                    "{}   {} {} ({} chars, {:.1}s)",
                    tag,
                    "✓".bright_green(),
                    kind,
                    chars,
                    duration_secs
                );
            }
            LogEvent::NarrativeFailed { kind, error, .. } => {
                let _ = writeln!(
                    stderr,
                    "{}   {} {} failed: {}",
                    tag,
                    "⚠".bright_yellow(),
                    kind,
                    error.bright_yellow()
                );
            }
            LogEvent::MailQueued { mailer, .. } => {
                let _ = writeln!(
                    stderr,
                    "{}   {} Mail queued via {}",
                    tag,
                    "✉".bright_blue(),
                    mailer
                );
            }
            LogEvent::MailFailed { error, .. } => {
                let _ = writeln!(
                    stderr,
                    "{}   {} Mail failed: {}",
                    tag,
                    "✗".bright_red(),
                    error.bright_red()
                );
            }
            LogEvent::RequestCompleted {
                metrics,
                analysis_chars,
                duration_secs,
                ..
            } => {
                let _ = writeln!(
                    stderr,
                    "{} {} {} ({} metrics, {} chars, {:.1}s)",
                    tag,
                    "✓".bright_green(),
                    "DONE".bright_green().bold(),
                    metrics,
                    analysis_chars,
                    duration_secs
                );
            }
        }
    }

    fn log_compact(&self, event: &LogEvent) {
        let mut stderr = std::io::stderr();
        let timestamp = chrono::Utc::now().format("%H:%M:%S");
        let id = short_id(event.request_id());
        let msg = match event {
            LogEvent::RequestReceived { lang, .. } => {
                format!("[{}] {} req:start lang={}", timestamp, id, lang)
            }
            LogEvent::RequestRejected { reason, .. } => {
                format!("[{}] {} req:reject {}", timestamp, id, reason)
            }
            LogEvent::AgeResolved { age, fallback, .. } => format!(
                "[{}] {} age:{}{}",
                timestamp,
                id,
                age,
                if *fallback { " fallback" } else { "" }
            ),
            LogEvent::NarrativeCompleted {
                kind,
                duration_secs,
                ..
            } => format!(
                "[{}] {} narrative:done:{} {:.1}s",
                timestamp, id, kind, duration_secs
            ),
            LogEvent::NarrativeFailed { kind, error, .. } => {
                format!("[{}] {} narrative:fail:{} {}", timestamp, id, kind, error)
            }
            LogEvent::MailQueued { mailer, .. } => {
                format!("[{}] {} mail:queued:{}", timestamp, id, mailer)
            }
            LogEvent::MailFailed { error, .. } => {
                format!("[{}] {} mail:fail {}", timestamp, id, error)
            }
            LogEvent::RequestCompleted { duration_secs, .. } => {
                format!("[{}] {} req:done {:.1}s", timestamp, id, duration_secs)
            }
        };
        let _ = writeln!(stderr, "{}", msg);
    }
}

fn short_id(id: Uuid) -> String {
    id.simple().to_string()[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("json".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("PRETTY".parse::<LogFormat>(), Ok(LogFormat::Pretty));
        assert_eq!("compact".parse::<LogFormat>(), Ok(LogFormat::Compact));
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_event_serializes_with_tag() {
        let id = Uuid::new_v4();
        let event = LogEvent::AgeResolved {
            request_id: id,
            age: 24,
            fallback: false,
        };
        let value = event.with_timestamp();
        assert_eq!(value["event"], "age_resolved");
        assert_eq!(value["age"], 24);
        assert!(value["timestamp"].is_string());
        assert_eq!(event.request_id(), id);
    }

    #[test]
    fn test_file_output_is_json_lines() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("logs").join("requests.jsonl");
        let logger = Logger::with_file(LogFormat::Compact, &path).unwrap();
        let id = Uuid::new_v4();

        logger.log(&LogEvent::MailQueued {
            request_id: id,
            mailer: "noop".into(),
        });
        logger.log(&LogEvent::MailFailed {
            request_id: id,
            error: "connection refused".into(),
        });

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<serde_json::Value> = content
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"], "mail_queued");
        assert_eq!(lines[1]["error"], "connection refused");
        assert_eq!(lines[1]["request_id"], id.to_string());
    }
}
