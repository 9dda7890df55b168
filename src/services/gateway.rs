// src/services/gateway.rs
use std::sync::Arc;

use crate::config::GeminiConfig;
use crate::error::AppError;
use crate::message::{ChatRequest, ChatResponse, HealthResponse};

use super::gemini::GeminiClient;
use super::model::GenerativeModel;

/// Forwards one chat message to the upstream model and shapes the result.
///
/// `model` is `None` when no API key was configured; every chat then fails
/// with [`AppError::MissingApiKey`] without touching the network.
#[derive(Clone)]
pub struct ChatGateway {
    engine_name: String,
    model: Option<Arc<dyn GenerativeModel>>,
}

impl ChatGateway {
    pub fn new(engine_name: impl Into<String>, model: Option<Arc<dyn GenerativeModel>>) -> Self {
        Self { engine_name: engine_name.into(), model }
    }

    pub fn from_config(config: &GeminiConfig) -> anyhow::Result<Self> {
        let model: Option<Arc<dyn GenerativeModel>> = match &config.api_key {
            Some(key) => {
                let client = GeminiClient::new(key.as_str(), config)?;
                tracing::info!(model = %client.model(), "Gemini client configured");
                Some(Arc::new(client))
            }
            None => {
                tracing::warn!("GEMINI_API_KEY environment variable not set.");
                None
            }
        };

        Ok(Self::new(config.engine_name.clone(), model))
    }

    pub fn is_configured(&self) -> bool {
        self.model.is_some()
    }

    pub fn health_check(&self) -> HealthResponse {
        HealthResponse {
            status: "online".to_string(),
            engine: self.engine_name.clone(),
        }
    }

    pub async fn handle_chat(&self, request: ChatRequest) -> Result<ChatResponse, AppError> {
        let Some(model) = &self.model else {
            tracing::error!("Chat request rejected: API key not configured");
            return Err(AppError::MissingApiKey);
        };

        let ChatRequest { message, history } = request;
        let mut chat = model.start_chat(history);

        match chat.send_message(&message).await {
            Ok(reply) => Ok(ChatResponse::success(reply.text)),
            Err(err) => {
                tracing::error!(error = %err, "Gemini API Error");
                Err(err.into())
            }
        }
    }
}
