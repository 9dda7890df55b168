//! Generative model abstraction.
//!
//! The gateway only needs two things from an upstream model: open a chat
//! seeded with prior turns, and send one message into it. Keeping that
//! behind traits lets the HTTP layer run against stubs in tests.

use async_trait::async_trait;
use thiserror::Error;

use crate::message::Turn;

/// Failure reported by an upstream model.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Quota or rate limit exhausted (HTTP 429 / `RESOURCE_EXHAUSTED`).
    #[error("429 {message}")]
    RateLimited { message: String },

    #[error("{status} {message}")]
    Api { status: u16, message: String },

    #[error("request to model API failed: {0}")]
    Network(String),

    #[error("invalid response from model API: {0}")]
    InvalidResponse(String),

    #[error("response blocked: {0}")]
    Blocked(String),

    #[error("model returned no text")]
    EmptyReply,

    /// Failure from a client that cannot say more than a message.
    #[error("{0}")]
    Other(String),
}

impl UpstreamError {
    pub fn is_quota_exhausted(&self) -> bool {
        match self {
            UpstreamError::RateLimited { .. } => true,
            other => other.to_string().contains("429"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelReply {
    pub text: String,
}

#[async_trait]
pub trait ChatSession: Send {
    /// Send one user message and wait for the model's reply.
    async fn send_message(&mut self, text: &str) -> Result<ModelReply, UpstreamError>;

    /// Turns the session currently holds, oldest first.
    fn history(&self) -> &[Turn];
}

pub trait GenerativeModel: Send + Sync {
    /// Open a chat whose history starts as `history`, in order.
    fn start_chat(&self, history: Vec<Turn>) -> Box<dyn ChatSession>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limited_is_quota() {
        let err = UpstreamError::RateLimited { message: "Resource exhausted".into() };
        assert!(err.is_quota_exhausted());
        assert_eq!(err.to_string(), "429 Resource exhausted");
    }

    #[test]
    fn untyped_failures_fall_back_to_message() {
        assert!(UpstreamError::Other("got 429 from upstream".into()).is_quota_exhausted());
        assert!(!UpstreamError::Other("connection reset".into()).is_quota_exhausted());
    }

    #[test]
    fn typed_failures_mentioning_429_are_quota() {
        let err = UpstreamError::Api { status: 503, message: "backend returned 429".into() };
        assert!(err.is_quota_exhausted());
        assert!(UpstreamError::Network("proxy answered 429".into()).is_quota_exhausted());
    }

    #[test]
    fn other_typed_failures_are_not_quota() {
        let err = UpstreamError::Api { status: 400, message: "API key not valid".into() };
        assert!(!err.is_quota_exhausted());
        assert!(!UpstreamError::EmptyReply.is_quota_exhausted());
    }
}
