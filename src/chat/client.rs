//! HTTP client for the chat endpoint.
//!
//! One message in, one reply out: `POST {"message": ...}` and read back
//! `{"reply": ...}`. No streaming.

use super::conversation::{ChatMessage, Conversation};
use super::error::ChatError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Reply shown in the conversation when the exchange fails.
pub const FALLBACK_REPLY: &str = "Sorry, something went wrong.";

/// Configuration for the chat client.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub endpoint: String,
    pub timeout_seconds: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:5000/api/chat".to_string(),
            timeout_seconds: 60,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    reply: String,
}

/// Client for the remote text-completion endpoint.
pub struct ChatClient {
    config: ChatConfig,
    http_client: reqwest::Client,
}

impl ChatClient {
    pub fn new(config: ChatConfig) -> Result<Self, ChatError> {
        info!("Chat endpoint: {}", config.endpoint);

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(ChatError::Client)?;

        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Send one message and return the endpoint's reply.
    pub async fn send_message(&self, text: &str) -> Result<String, ChatError> {
        debug!("Sending chat message ({} chars)", text.len());

        let response = self
            .http_client
            .post(&self.config.endpoint)
            .json(&ChatRequest { message: text })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ChatError::Timeout(self.config.timeout_seconds)
                } else if e.is_connect() {
                    ChatError::Connect(self.config.endpoint.clone())
                } else {
                    ChatError::Transport(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Status { status, body });
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| ChatError::Parse(e.to_string()))?;

        Ok(chat_response.reply)
    }

    /// Like [`send_message`](Self::send_message) but never fails: errors
    /// are logged and replaced with [`FALLBACK_REPLY`].
    pub async fn reply_or_fallback(&self, text: &str) -> String {
        match self.send_message(text).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Chat request failed: {}", e);
                FALLBACK_REPLY.to_string()
            }
        }
    }

    /// Record `input` and the bot's reply in `conversation`.
    ///
    /// Blank input is ignored and nothing is sent.
    pub async fn converse<'a>(
        &self,
        conversation: &'a mut Conversation,
        input: &str,
    ) -> Option<&'a ChatMessage> {
        if input.trim().is_empty() {
            return None;
        }

        conversation.push_user(input);
        let reply = self.reply_or_fallback(input).await;
        Some(conversation.push_bot(reply))
    }
}
