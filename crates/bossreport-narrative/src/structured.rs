//! Parsing for structured (`{metrics, analysis}`) completions.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// A metric as returned by the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeMetric {
    pub title: String,
    #[serde(default)]
    pub labels: Vec<String>,
    pub values: Vec<u32>,
}

/// The whole structured answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredNarrative {
    pub metrics: Vec<NarrativeMetric>,
    pub analysis: String,
}

#[derive(Error, Debug)]
pub enum StructuredParseError {
    #[error("No JSON object found in completion")]
    NoJsonFound,

    #[error("Failed to parse completion JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid structured completion: {0}")]
    InvalidFormat(String),
}

impl StructuredNarrative {
    /// Parse a structured answer out of raw completion text.
    ///
    /// The model sometimes wraps the object in a ```json fence or adds a
    /// sentence before it; everything outside the outermost braces is
    /// ignored.
    pub fn parse(raw: &str) -> Result<Self, StructuredParseError> {
        debug!(output_len = raw.len(), "Parsing structured narrative");

        let body = extract_object(raw).ok_or(StructuredParseError::NoJsonFound)?;
        let parsed: StructuredNarrative = serde_json::from_str(body)?;

        if parsed.analysis.trim().is_empty() {
            return Err(StructuredParseError::InvalidFormat(
                "analysis is empty".to_string(),
            ));
        }
        if parsed.metrics.is_empty() {
            return Err(StructuredParseError::InvalidFormat(
                "metrics array is empty".to_string(),
            ));
        }
        if let Some(metric) = parsed.metrics.iter().find(|m| m.values.iter().any(|v| *v > 100)) {
            return Err(StructuredParseError::InvalidFormat(format!(
                "metric '{}' has a value above 100",
                metric.title
            )));
        }

        Ok(parsed)
    }
}

fn extract_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (start < end).then(|| &raw[start..=end])
}
