//! One chat conversation and its single-request gate.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::client::{CompletionClient, CompletionRequest, CompletionSettings, WireMessage, WireRole};
use super::error::ChatError;
use super::{ChatRole, Message};
use crate::config::CredentialSource;

/// Shown when the service answers successfully but without usable text.
pub const FALLBACK_REPLY: &str = "Sorry, I could not generate a response.";

/// What [`ChatSession::submit`] did with a draft.
#[derive(Debug)]
pub enum Submission {
    /// Blank draft or a request already in flight. Nothing changed.
    Rejected,
    /// Accepted, but resolved without a network call (no credential).
    Settled,
    /// Accepted; the caller must send this and pass the outcome to
    /// [`ChatSession::settle`].
    Dispatched(PendingRequest),
}

/// A request that has been built and authorized but not yet sent.
pub struct PendingRequest {
    api_key: String,
    request: CompletionRequest,
}

impl PendingRequest {
    pub fn request(&self) -> &CompletionRequest {
        &self.request
    }

    pub async fn send(&self, client: &dyn CompletionClient) -> Result<Option<String>, ChatError> {
        client.complete(&self.api_key, &self.request).await
    }
}

impl fmt::Debug for PendingRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingRequest")
            .field("api_key", &"[REDACTED]")
            .field("request", &self.request)
            .finish()
    }
}

/// Transcript, draft buffer and the awaiting-response flag for one chat view.
///
/// All mutation goes through `&mut self`, so whoever owns the session (the
/// TUI event loop) is the only writer. The network call itself happens
/// outside, between [`submit`](Self::submit) and [`settle`](Self::settle).
pub struct ChatSession {
    transcript: Vec<Message>,
    draft: String,
    awaiting_response: bool,
    next_id: u64,
    settings: CompletionSettings,
    credentials: Arc<dyn CredentialSource>,
}

impl ChatSession {
    pub fn new(settings: CompletionSettings, credentials: Arc<dyn CredentialSource>) -> Self {
        Self {
            transcript: Vec::new(),
            draft: String::new(),
            awaiting_response: false,
            next_id: 1,
            settings,
            credentials,
        }
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn is_awaiting_response(&self) -> bool {
        self.awaiting_response
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut String {
        &mut self.draft
    }

    pub fn update_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn settings(&self) -> &CompletionSettings {
        &self.settings
    }

    /// Submit whatever is in the draft buffer.
    pub fn submit_draft(&mut self) -> Submission {
        let draft = self.draft.clone();
        self.submit(&draft)
    }

    /// Accept `draft` as the next user message, if the session is idle and
    /// the draft is not blank.
    pub fn submit(&mut self, draft: &str) -> Submission {
        let text = draft.trim();
        if text.is_empty() {
            return Submission::Rejected;
        }
        if self.awaiting_response {
            debug!("Submission ignored: a response is still pending");
            return Submission::Rejected;
        }

        self.push(ChatRole::User, text);
        self.draft.clear();
        self.awaiting_response = true;

        let request = self.build_request();

        match self.credentials.api_key() {
            Some(api_key) => {
                info!(
                    model = %request.model,
                    transcript_len = self.transcript.len(),
                    "Dispatching chat request"
                );
                Submission::Dispatched(PendingRequest { api_key, request })
            }
            None => {
                warn!("No API key configured; skipping request");
                self.settle(Err(ChatError::MissingCredential));
                Submission::Settled
            }
        }
    }

    /// Record the outcome of the in-flight request and return to idle.
    pub fn settle(&mut self, outcome: Result<Option<String>, ChatError>) {
        if !self.awaiting_response {
            warn!("Completion arrived with no request pending; dropping it");
            return;
        }

        let content = match outcome {
            Ok(Some(text)) => text,
            Ok(None) => FALLBACK_REPLY.to_string(),
            Err(e) => {
                warn!("Chat request failed: {}", e);
                e.diagnostic()
            }
        };

        self.push(ChatRole::Assistant, content);
        self.awaiting_response = false;
    }

    /// Submit, send and settle in one go. Returns `false` if the draft was
    /// rejected.
    pub async fn send(&mut self, draft: &str, client: &dyn CompletionClient) -> bool {
        match self.submit(draft) {
            Submission::Rejected => false,
            Submission::Settled => true,
            Submission::Dispatched(pending) => {
                let outcome = pending.send(client).await;
                self.settle(outcome);
                true
            }
        }
    }

    fn push(&mut self, role: ChatRole, content: impl Into<String>) {
        let id = self.next_id;
        self.next_id += 1;
        self.transcript.push(Message::new(id, role, content));
    }

    fn build_request(&self) -> CompletionRequest {
        let mut messages = Vec::with_capacity(self.transcript.len() + 1);
        messages.push(WireMessage {
            role: WireRole::System,
            content: self.settings.system_prompt.clone(),
        });
        messages.extend(self.transcript.iter().map(Message::to_wire));

        CompletionRequest {
            model: self.settings.model.clone(),
            messages,
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        }
    }
}
