//! The chatbot: transcript model, session gate, and completion client.

pub mod client;
pub mod error;
pub mod session;

use chrono::{DateTime, Local};

pub use client::{
    parse_completion, parse_upstream_error, CompletionClient, CompletionRequest,
    CompletionSettings, GroqClient, WireMessage, WireRole, DEFAULT_ENDPOINT, DEFAULT_MAX_TOKENS,
    DEFAULT_MODEL, DEFAULT_TEMPERATURE, SYSTEM_PROMPT,
};
pub use error::ChatError;
pub use session::{ChatSession, PendingRequest, Submission, FALLBACK_REPLY};

/// The role of a transcript entry. There is no system role here; the system
/// instruction only exists on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

impl From<ChatRole> for WireRole {
    fn from(role: ChatRole) -> Self {
        match role {
            ChatRole::User => WireRole::User,
            ChatRole::Assistant => WireRole::Assistant,
        }
    }
}

/// One transcript entry.
#[derive(Debug, Clone)]
pub struct Message {
    pub id: u64,
    pub role: ChatRole,
    pub content: String,
    /// Display only. Position in the transcript is the ordering.
    pub timestamp: DateTime<Local>,
}

impl Message {
    pub fn new(id: u64, role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            id,
            role,
            content: content.into(),
            timestamp: Local::now(),
        }
    }

    /// Hour and minute, e.g. `14:05`.
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }

    pub fn to_wire(&self) -> WireMessage {
        WireMessage {
            role: self.role.into(),
            content: self.content.clone(),
        }
    }
}
