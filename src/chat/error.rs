//! Error types for the chat exchange.

use thiserror::Error;

/// Errors from a single chat request/response exchange.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    #[error("Cannot connect to chat endpoint at {0}")]
    Connect(String),
    #[error("Failed to send request: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("Chat endpoint error {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Failed to parse chat response: {0}")]
    Parse(String),
}
