// src/state.rs
use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::services::gateway::ChatGateway;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub gateway: ChatGateway,
}

impl AppState {
    pub fn new(gateway: ChatGateway) -> Self {
        Self { gateway }
    }

    pub fn from_config(config: &GatewayConfig) -> anyhow::Result<Self> {
        Ok(Self::new(ChatGateway::from_config(&config.gemini)?))
    }
}
