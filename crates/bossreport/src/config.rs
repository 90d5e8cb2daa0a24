//! Service configuration.
//!
//! Settings come from an optional `bossreport.toml`, secrets from the
//! environment. Command-line flags are applied on top by the caller.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use bossreport_core::{MetricMode, MetricRange, MetricSynthesizer};
use bossreport_mailer::{SmtpSettings, DEFAULT_SMTP_PORT, DEFAULT_SMTP_SERVER};
use bossreport_narrative::{NarrativeMode, DEFAULT_BASE_URL, DEFAULT_MODEL};

/// The config file name
pub const CONFIG_FILE_NAME: &str = "bossreport.toml";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;

/// Contents of `bossreport.toml`
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub narrative: NarrativeSection,
    #[serde(default)]
    pub mail: MailSection,
    #[serde(default)]
    pub metrics: MetricsSection,
    #[serde(default)]
    pub age: AgeSection,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct NarrativeSection {
    /// Chat-completions API root, e.g. `https://api.openai.com/v1`
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub mode: Option<NarrativeMode>,
    /// Per-request timeout such as `"30s"`; none when unset
    #[serde(default, with = "humantime_serde")]
    pub timeout: Option<Duration>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct MailSection {
    pub server: Option<String>,
    pub port: Option<u16>,
    /// SMTP login, also the sender address
    pub username: Option<String>,
    /// Report recipients; the sender itself when empty
    #[serde(default)]
    pub to: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    pub mode: Option<MetricMode>,
    /// Inclusive `[min, max]`
    pub segment: Option<[u32; 2]>,
    pub regional: Option<[u32; 2]>,
    pub global: Option<[u32; 2]>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct AgeSection {
    /// Reject unusable birth dates with 400 instead of reporting age 0
    #[serde(default)]
    pub strict: bool,
}

impl FileConfig {
    /// Load configuration from `path`.
    ///
    /// Returns:
    /// - `Ok(Some(config))` if file exists and parses successfully
    /// - `Ok(None)` if file does not exist
    /// - `Err(...)` if file exists but fails to parse (hard error)
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let config: FileConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        Ok(Some(config))
    }
}

/// Settings for the chat-completions client
#[derive(Debug, Clone)]
pub struct NarrativeSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub mode: NarrativeMode,
    pub timeout: Option<Duration>,
}

/// Fully resolved configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub narrative: NarrativeSettings,
    /// `None` when SMTP credentials are incomplete; reports are then dropped
    pub mail: Option<SmtpSettings>,
    pub metrics: MetricSynthesizer,
    pub strict_age: bool,
}

impl AppConfig {
    /// Combine the file config with environment lookups.
    ///
    /// `env` is `std::env::var` in production; tests pass a map.
    pub fn from_parts<F>(file: FileConfig, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let Some(api_key) = env("OPENAI_API_KEY") else {
            bail!("OPENAI_API_KEY not set");
        };

        let port = match env("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("Invalid PORT value '{}'", raw))?,
            None => file.server.port.unwrap_or(DEFAULT_PORT),
        };

        let narrative = NarrativeSettings {
            api_key,
            base_url: file
                .narrative
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: file
                .narrative
                .model
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            mode: file.narrative.mode.unwrap_or_default(),
            timeout: file.narrative.timeout,
        };

        let username = env("SMTP_USERNAME").or(file.mail.username);
        let mail = match (username, env("SMTP_PASSWORD")) {
            (Some(username), Some(password)) => Some(SmtpSettings {
                server: file
                    .mail
                    .server
                    .unwrap_or_else(|| DEFAULT_SMTP_SERVER.to_string()),
                port: file.mail.port.unwrap_or(DEFAULT_SMTP_PORT),
                username,
                password,
                recipients: file.mail.to,
            }),
            _ => None,
        };

        Ok(Self {
            host: file.server.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            narrative,
            mail,
            metrics: build_synthesizer(&file.metrics)?,
            strict_age: file.age.strict,
        })
    }
}

fn build_synthesizer(section: &MetricsSection) -> Result<MetricSynthesizer> {
    let defaults = MetricSynthesizer::default();
    let [segment, regional, global] = defaults.ranges();

    let range = |name: &str, value: Option<[u32; 2]>, default: MetricRange| match value {
        Some([min, max]) => MetricRange::new(min, max).with_context(|| {
            format!(
                "Invalid [metrics] {} range [{}, {}]: expected min <= max <= 100",
                name, min, max
            )
        }),
        None => Ok(default),
    };

    Ok(MetricSynthesizer::new(
        range("segment", section.segment, segment)?,
        range("regional", section.regional, regional)?,
        range("global", section.global, global)?,
        section.mode.unwrap_or_default(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env_with(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let config = FileConfig::load(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert!(config.is_none());
    }

    #[test]
    fn test_load_full_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            r#"
[server]
host = "127.0.0.1"
port = 8080

[narrative]
base_url = "http://localhost:11434/v1"
model = "gpt-4o-mini"
mode = "structured"
timeout = "45s"

[mail]
username = "reports@example.com"
to = ["team@example.com"]

[metrics]
mode = "static"
segment = [50, 70]

[age]
strict = true
"#,
        )
        .unwrap();

        let file = FileConfig::load(&path).unwrap().unwrap();
        assert_eq!(file.server.port, Some(8080));
        assert_eq!(file.narrative.mode, Some(NarrativeMode::Structured));
        assert_eq!(file.narrative.timeout, Some(Duration::from_secs(45)));
        assert_eq!(file.metrics.segment, Some([50, 70]));
        assert!(file.age.strict);

        let config = AppConfig::from_parts(
            file,
            env_with(&[("OPENAI_API_KEY", "sk-test"), ("SMTP_PASSWORD", "secret")]),
        )
        .unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.narrative.model, "gpt-4o-mini");
        assert_eq!(config.metrics.mode(), MetricMode::Static);
        assert_eq!(config.metrics.ranges()[0], MetricRange::new(50, 70).unwrap());

        let mail = config.mail.unwrap();
        assert_eq!(mail.server, DEFAULT_SMTP_SERVER);
        assert_eq!(mail.port, DEFAULT_SMTP_PORT);
        assert_eq!(mail.recipients, vec!["team@example.com".to_string()]);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[server]\nhots = \"0.0.0.0\"\n").unwrap();

        let err = FileConfig::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("hots"));
    }

    #[test]
    fn test_defaults_without_file() {
        let config =
            AppConfig::from_parts(FileConfig::default(), env_with(&[("OPENAI_API_KEY", "sk")]))
                .unwrap();

        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.narrative.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.narrative.model, DEFAULT_MODEL);
        assert_eq!(config.narrative.mode, NarrativeMode::Prose);
        assert!(config.narrative.timeout.is_none());
        assert!(config.mail.is_none());
        assert!(!config.strict_age);
    }

    #[test]
    fn test_api_key_required() {
        let err = AppConfig::from_parts(FileConfig::default(), env_with(&[])).unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));

        let blank = AppConfig::from_parts(FileConfig::default(), env_with(&[("OPENAI_API_KEY", " ")]));
        assert!(blank.is_err());
    }

    #[test]
    fn test_port_from_env_overrides_file() {
        let file = FileConfig {
            server: ServerSection {
                host: None,
                port: Some(8080),
            },
            ..Default::default()
        };
        let config =
            AppConfig::from_parts(file, env_with(&[("OPENAI_API_KEY", "sk"), ("PORT", "9000")]))
                .unwrap();
        assert_eq!(config.port, 9000);

        let bad = AppConfig::from_parts(
            FileConfig::default(),
            env_with(&[("OPENAI_API_KEY", "sk"), ("PORT", "http")]),
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_mail_needs_username_and_password() {
        let config = AppConfig::from_parts(
            FileConfig::default(),
            env_with(&[("OPENAI_API_KEY", "sk"), ("SMTP_PASSWORD", "secret")]),
        )
        .unwrap();
        assert!(config.mail.is_none());

        let config = AppConfig::from_parts(
            FileConfig::default(),
            env_with(&[
                ("OPENAI_API_KEY", "sk"),
                ("SMTP_USERNAME", "reports@example.com"),
                ("SMTP_PASSWORD", "secret"),
            ]),
        )
        .unwrap();
        let mail = config.mail.unwrap();
        assert_eq!(mail.username, "reports@example.com");
        assert!(mail.recipients.is_empty());
    }

    #[test]
    fn test_invalid_metric_range() {
        let file = FileConfig {
            metrics: MetricsSection {
                regional: Some([90, 10]),
                ..Default::default()
            },
            ..Default::default()
        };
        let err = AppConfig::from_parts(file, env_with(&[("OPENAI_API_KEY", "sk")])).unwrap_err();
        assert!(err.to_string().contains("regional"));
    }
}
