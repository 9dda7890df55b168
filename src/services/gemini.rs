//! Gemini `generateContent` client.
//!
//! A session keeps its own copy of the conversation; every call posts the
//! whole history followed by the new user turn.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::model::{ChatSession, GenerativeModel, ModelReply, UpstreamError};
use crate::config::GeminiConfig;
use crate::message::Turn;

const API_KEY_HEADER: &str = "x-goog-api-key";

struct ClientInner {
    http: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<ClientInner>,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, config: &GeminiConfig) -> reqwest::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let endpoint = format!(
            "{}/models/{}:generateContent",
            config.api_base.trim_end_matches('/'),
            config.model
        );

        Ok(Self {
            inner: Arc::new(ClientInner {
                http: builder.build()?,
                endpoint,
                api_key: api_key.into(),
                model: config.model.clone(),
            }),
        })
    }

    pub fn model(&self) -> &str {
        &self.inner.model
    }
}

impl GenerativeModel for GeminiClient {
    fn start_chat(&self, history: Vec<Turn>) -> Box<dyn ChatSession> {
        Box::new(GeminiSession { inner: Arc::clone(&self.inner), history })
    }
}

pub struct GeminiSession {
    inner: Arc<ClientInner>,
    history: Vec<Turn>,
}

#[async_trait]
impl ChatSession for GeminiSession {
    async fn send_message(&mut self, text: &str) -> Result<ModelReply, UpstreamError> {
        let user_turn = text_turn("user", text);

        let mut contents = self.history.clone();
        contents.push(user_turn.clone());

        tracing::debug!(
            model = %self.inner.model,
            history_len = self.history.len(),
            message_len = text.len(),
            "Sending request to Gemini API"
        );

        let response = self
            .inner
            .http
            .post(&self.inner.endpoint)
            .header(API_KEY_HEADER, &self.inner.api_key)
            .json(&GenerateContentRequest { contents: &contents })
            .send()
            .await
            .map_err(|e| UpstreamError::Network(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status, &body));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::InvalidResponse(e.without_url().to_string()))?;
        let reply = parsed.reply_text()?;

        self.history.push(user_turn);
        self.history.push(text_turn("model", &reply));

        Ok(ModelReply { text: reply })
    }

    fn history(&self) -> &[Turn] {
        &self.history
    }
}

fn text_turn(role: &str, text: &str) -> Turn {
    json!({ "role": role, "parts": [{ "text": text }] })
}

fn classify_failure(status: StatusCode, body: &str) -> UpstreamError {
    let detail = serde_json::from_str::<ErrorEnvelope>(body).ok().map(|e| e.error);

    let exhausted = detail
        .as_ref()
        .and_then(|d| d.status.as_deref())
        .is_some_and(|s| s == "RESOURCE_EXHAUSTED");

    let message = match detail {
        Some(d) if !d.message.is_empty() => d.message,
        _ if !body.trim().is_empty() => body.trim().to_string(),
        _ => status.canonical_reason().unwrap_or("Unknown error").to_string(),
    };

    if status == StatusCode::TOO_MANY_REQUESTS || exhausted {
        UpstreamError::RateLimited { message }
    } else {
        UpstreamError::Api { status: status.as_u16(), message }
    }
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: &'a [Turn],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

impl GenerateContentResponse {
    /// Text of the first candidate with all of its text parts joined.
    fn reply_text(self) -> Result<String, UpstreamError> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(UpstreamError::Blocked(reason));
        }

        let candidate = self.candidates.into_iter().next().ok_or(UpstreamError::EmptyReply)?;
        let texts: Vec<String> = candidate
            .content
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|p| p.text)
            .collect();

        if texts.is_empty() {
            return match candidate.finish_reason.as_deref() {
                Some(reason @ ("SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT")) => {
                    Err(UpstreamError::Blocked(reason.to_string()))
                }
                _ => Err(UpstreamError::EmptyReply),
            };
        }

        Ok(texts.concat())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}
