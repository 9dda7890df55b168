// src/message.rs
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One prior exchange in a conversation. Opaque to the gateway and handed to
/// the upstream model exactly as received.
pub type Turn = Value;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatRequest {
    #[serde(alias = "prompt")]
    pub message: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub history: Vec<Turn>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub status: ReplyStatus,
}

impl ChatResponse {
    pub fn success(reply: impl Into<String>) -> Self {
        Self { reply: reply.into(), status: ReplyStatus::Success }
    }

    /// Envelope used for every failed request.
    pub fn error(detail: impl AsRef<str>) -> Self {
        Self {
            reply: format!("Error: {}", detail.as_ref()),
            status: ReplyStatus::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub engine: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Turn>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Turn>>::deserialize(deserializer)?.unwrap_or_default())
}
