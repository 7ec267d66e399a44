//! Conversational help desk for the platform and for procurement questions.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Response, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::gateway::{ChatGateway, ChatMessage, ChatRequest, ChatRole, GatewayError};
use crate::workflows::http::{respond, ErrorStatus};

/// Most recent turns forwarded to the gateway.
pub const MAX_HISTORY: usize = 20;

const ASSISTANT_SYSTEM_PROMPT: &str = "Você é a Assistente IA da Licicontrol, especialista em \
Licitações, Contratos e Controle Interno na Gestão Pública Brasileira (Lei 14.133/2021). Ajude \
os usuários a usar o sistema (painel de riscos, auditor de pareceres, análise de transparência, \
impugnações, pesquisa de preços no PNCP, geração e assinatura de documentos) e esclareça dúvidas \
jurídicas e técnicas. Seja profissional e conciso e use Markdown.";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatConversation {
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssistantReply {
    pub reply: String,
}

pub struct AssistantService {
    gateway: Arc<dyn ChatGateway>,
}

impl AssistantService {
    pub fn new(gateway: Arc<dyn ChatGateway>) -> Self {
        Self { gateway }
    }

    /// Client-sent system turns are dropped; the assistant persona always leads.
    pub async fn chat(
        &self,
        conversation: ChatConversation,
    ) -> Result<AssistantReply, AssistantError> {
        let mut turns: Vec<ChatMessage> = conversation
            .messages
            .into_iter()
            .filter(|message| message.role != ChatRole::System)
            .collect();
        match turns.last() {
            None => return Err(AssistantError::EmptyConversation),
            Some(last) if last.role != ChatRole::User || last.content.trim().is_empty() => {
                return Err(AssistantError::AwaitingUser)
            }
            Some(_) => {}
        }
        if turns.len() > MAX_HISTORY {
            turns.drain(..turns.len() - MAX_HISTORY);
        }

        let mut messages = Vec::with_capacity(turns.len() + 1);
        messages.push(ChatMessage::system(ASSISTANT_SYSTEM_PROMPT));
        messages.extend(turns);
        let reply = self
            .gateway
            .complete(ChatRequest {
                messages,
                ..ChatRequest::default()
            })
            .await?;
        info!(chars = reply.chars().count(), "assistant replied");
        Ok(AssistantReply { reply })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("conversation has no messages")]
    EmptyConversation,
    #[error("the last message must be a non-empty user message")]
    AwaitingUser,
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl ErrorStatus for AssistantError {
    fn status_code(&self) -> StatusCode {
        match self {
            AssistantError::EmptyConversation | AssistantError::AwaitingUser => {
                StatusCode::BAD_REQUEST
            }
            AssistantError::Gateway(err) => err.status_code(),
        }
    }
}

pub fn assistant_router(service: Arc<AssistantService>) -> Router {
    Router::new()
        .route("/api/v1/assistant/chat", post(chat_handler))
        .with_state(service)
}

pub(crate) async fn chat_handler(
    State(service): State<Arc<AssistantService>>,
    Json(conversation): Json<ChatConversation>,
) -> Response {
    respond(StatusCode::OK, service.chat(conversation).await)
}
