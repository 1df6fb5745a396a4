//! Chat helper.
//!
//! Forwards user text to a remote completion endpoint and keeps the
//! transcript. Unrelated to the aggregation engine.

pub mod client;
pub mod conversation;
pub mod error;

pub use client::{ChatClient, ChatConfig, FALLBACK_REPLY};
pub use conversation::{Conversation, Sender};
pub use error::ChatError;
