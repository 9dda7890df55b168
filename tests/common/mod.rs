#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use gemini_chat_gateway::message::Turn;
use gemini_chat_gateway::routes::create_router;
use gemini_chat_gateway::services::gateway::ChatGateway;
use gemini_chat_gateway::services::model::{
    ChatSession, GenerativeModel, ModelReply, UpstreamError,
};
use gemini_chat_gateway::state::AppState;
use serde_json::Value;

pub const ENGINE: &str = "Gemini-3-Flash";

type Responder = dyn Fn(&str) -> Result<String, UpstreamError> + Send + Sync;

struct Shared {
    respond: Box<Responder>,
    seeded: Mutex<Vec<Vec<Turn>>>,
    sent: Mutex<Vec<String>>,
}

/// Model double that records what it was asked and answers from a closure.
#[derive(Clone)]
pub struct StubModel {
    shared: Arc<Shared>,
}

impl StubModel {
    pub fn new<F>(respond: F) -> Self
    where
        F: Fn(&str) -> Result<String, UpstreamError> + Send + Sync + 'static,
    {
        Self {
            shared: Arc::new(Shared {
                respond: Box::new(respond),
                seeded: Mutex::new(Vec::new()),
                sent: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn replying(text: &str) -> Self {
        let text = text.to_string();
        Self::new(move |_| Ok(text.clone()))
    }

    pub fn failing<F>(make_err: F) -> Self
    where
        F: Fn() -> UpstreamError + Send + Sync + 'static,
    {
        Self::new(move |_| Err(make_err()))
    }

    pub fn seeded_histories(&self) -> Vec<Vec<Turn>> {
        self.shared.seeded.lock().unwrap().clone()
    }

    pub fn sent_messages(&self) -> Vec<String> {
        self.shared.sent.lock().unwrap().clone()
    }
}

impl GenerativeModel for StubModel {
    fn start_chat(&self, history: Vec<Turn>) -> Box<dyn ChatSession> {
        self.shared.seeded.lock().unwrap().push(history.clone());
        Box::new(StubSession { shared: Arc::clone(&self.shared), history })
    }
}

struct StubSession {
    shared: Arc<Shared>,
    history: Vec<Turn>,
}

#[async_trait]
impl ChatSession for StubSession {
    async fn send_message(&mut self, text: &str) -> Result<ModelReply, UpstreamError> {
        self.shared.sent.lock().unwrap().push(text.to_string());
        (self.shared.respond)(text).map(|text| ModelReply { text })
    }

    fn history(&self) -> &[Turn] {
        &self.history
    }
}

pub fn gateway_with(model: Option<StubModel>) -> ChatGateway {
    ChatGateway::new(ENGINE, model.map(|m| Arc::new(m) as Arc<dyn GenerativeModel>))
}

pub fn app_with(gateway: ChatGateway) -> Router {
    create_router().with_state(Arc::new(AppState::new(gateway)))
}

pub fn post_chat(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/chat")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
