use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{ChatGateway, ChatRequest, GatewayError};

/// Gateway double replaying canned replies and recording every request.
#[derive(Default)]
pub(crate) struct ScriptedGateway {
    replies: Mutex<VecDeque<Result<String, GatewayError>>>,
    requests: Mutex<Vec<ChatRequest>>,
    latency: Option<Duration>,
}

impl ScriptedGateway {
    pub(crate) fn replying(reply: impl Into<String>) -> Self {
        let gateway = Self::default();
        gateway.push_reply(reply);
        gateway
    }

    /// Each completion waits this long before answering, like a slow upstream.
    pub(crate) fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub(crate) fn push_reply(&self, reply: impl Into<String>) {
        self.replies
            .lock()
            .expect("reply mutex poisoned")
            .push_back(Ok(reply.into()));
    }

    pub(crate) fn push_error(&self, error: GatewayError) {
        self.replies
            .lock()
            .expect("reply mutex poisoned")
            .push_back(Err(error));
    }

    pub(crate) fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().expect("request mutex poisoned").clone()
    }
}

#[async_trait]
impl ChatGateway for ScriptedGateway {
    async fn complete(&self, request: ChatRequest) -> Result<String, GatewayError> {
        self.requests
            .lock()
            .expect("request mutex poisoned")
            .push(request);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.replies
            .lock()
            .expect("reply mutex poisoned")
            .pop_front()
            .unwrap_or(Err(GatewayError::EmptyResponse))
    }
}
