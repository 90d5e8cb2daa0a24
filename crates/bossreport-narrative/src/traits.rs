use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while requesting a narrative
#[derive(Error, Debug)]
pub enum NarrativeError {
    #[error("Narrative client configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Completion API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Completion API returned no content")]
    EmptyResponse,

    #[error("Failed to decode completion response: {0}")]
    Decode(String),
}

/// Which section of the report a narrative feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeKind {
    GlobalAnalysis,
    CreativeApproaches,
    StructuredReport,
}

impl std::fmt::Display for NarrativeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NarrativeKind::GlobalAnalysis => write!(f, "global-analysis"),
            NarrativeKind::CreativeApproaches => write!(f, "creative-approaches"),
            NarrativeKind::StructuredReport => write!(f, "structured-report"),
        }
    }
}

/// How the model is asked to answer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NarrativeMode {
    /// Two free-text requests (global analysis + creative approaches)
    #[default]
    Prose,
    /// One request answered with a `{metrics, analysis}` JSON object
    Structured,
}

/// A single prompt sent to the completion API
#[derive(Debug, Clone)]
pub struct NarrativeRequest {
    pub kind: NarrativeKind,
    pub prompt: String,
    pub temperature: f32,
}

impl NarrativeRequest {
    pub fn new(kind: NarrativeKind, prompt: String, temperature: f32) -> Self {
        Self {
            kind,
            prompt,
            temperature,
        }
    }
}

/// Anything that can turn a prompt into generated text
#[async_trait]
pub trait NarrativeRequester: Send + Sync {
    /// Human-readable name of the backend (for logs)
    fn name(&self) -> &str;

    /// Send the prompt and return the raw completion text
    async fn request_narrative(&self, request: &NarrativeRequest)
        -> Result<String, NarrativeError>;
}
