use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{NarrativeError, NarrativeRequest, NarrativeRequester};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Chat-completions backed narrative requester.
#[derive(Clone)]
pub struct OpenAiNarrator {
    http_client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl OpenAiNarrator {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Point at a compatible endpoint (proxy, Azure, local gateway).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Bound every request by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, NarrativeError> {
        self.http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NarrativeError::Config(e.to_string()))?;
        Ok(self)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn chat_request<'a>(&'a self, request: &'a NarrativeRequest) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            temperature: request.temperature,
        }
    }
}

#[async_trait]
impl NarrativeRequester for OpenAiNarrator {
    fn name(&self) -> &str {
        "openai"
    }

    async fn request_narrative(
        &self,
        request: &NarrativeRequest,
    ) -> Result<String, NarrativeError> {
        let start = Instant::now();

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&self.chat_request(request))
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, kind = %request.kind, "Completion request failed");
                NarrativeError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, kind = %request.kind, "Completion API error");
            return Err(NarrativeError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| NarrativeError::Decode(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(NarrativeError::EmptyResponse)?;

        debug!(
            model = %self.model,
            kind = %request.kind,
            duration_ms = start.elapsed().as_millis() as u64,
            response_len = content.len(),
            "Completion received"
        );

        Ok(content)
    }
}
