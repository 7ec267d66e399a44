//! Client side of the chat-completion gateway that backs every AI-assisted workflow.
//!
//! Requests are a system prompt plus the conversation; replies are free text that callers
//! either use verbatim or mine for an embedded JSON object via [`parse`].

mod http;
pub mod parse;
mod retry;

#[cfg(test)]
pub(crate) mod testing;

pub use http::HttpChatGateway;
pub use retry::RetryPolicy;

use async_trait::async_trait;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// One chat-completion call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f32>,
    /// Ask the gateway to ground the answer with web search.
    pub web_search: bool,
}

impl ChatRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            temperature: None,
            web_search: false,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_web_search(mut self) -> Self {
        self.web_search = true;
        self
    }

    pub fn system_prompt(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|message| message.role == ChatRole::System)
            .map(|message| message.content.as_str())
    }

    pub fn last_user_prompt(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|message| message.role == ChatRole::User)
            .map(|message| message.content.as_str())
    }
}

/// Anything able to answer a chat-completion request with the assistant's text.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    async fn complete(&self, request: ChatRequest) -> Result<String, GatewayError>;
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("AI gateway is not configured (set AI_GATEWAY_API_KEY)")]
    NotConfigured,
    #[error("AI gateway rate limit exceeded, try again shortly")]
    RateLimited,
    #[error("AI gateway credits exhausted")]
    PaymentRequired,
    #[error("AI gateway returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("AI gateway transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("AI gateway returned an empty reply")]
    EmptyResponse,
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            GatewayError::PaymentRequired => StatusCode::PAYMENT_REQUIRED,
            GatewayError::Status { .. }
            | GatewayError::Transport(_)
            | GatewayError::EmptyResponse => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::RateLimited
            | GatewayError::Transport(_)
            | GatewayError::EmptyResponse => true,
            GatewayError::Status { status, .. } => *status >= 500,
            GatewayError::NotConfigured | GatewayError::PaymentRequired => false,
        }
    }
}
