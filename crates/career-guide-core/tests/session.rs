use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use career_guide_core::chat::{
    parse_completion, parse_upstream_error, ChatError, ChatRole, ChatSession, CompletionClient,
    CompletionRequest, CompletionSettings, Submission, WireRole, SYSTEM_PROMPT,
};
use career_guide_core::config::CredentialSource;
use reqwest::StatusCode;

/// Answers every request with a canned HTTP status and body, run through the
/// same parsing the real client uses.
struct CannedClient {
    status: StatusCode,
    body: String,
    calls: AtomicUsize,
    seen: Mutex<Vec<(String, CompletionRequest)>>,
}

impl CannedClient {
    fn new(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn ok(body: &str) -> Self {
        Self::new(StatusCode::OK, body)
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_request(&self) -> CompletionRequest {
        self.seen.lock().unwrap().last().unwrap().1.clone()
    }
}

#[async_trait]
impl CompletionClient for CannedClient {
    async fn complete(
        &self,
        api_key: &str,
        request: &CompletionRequest,
    ) -> Result<Option<String>, ChatError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .unwrap()
            .push((api_key.to_string(), request.clone()));

        if self.status.is_success() {
            parse_completion(&self.body)
        } else {
            Err(parse_upstream_error(self.status, &self.body))
        }
    }
}

/// Fails before any response arrives, like a refused connection.
struct UnreachableClient;

#[async_trait]
impl CompletionClient for UnreachableClient {
    async fn complete(
        &self,
        _api_key: &str,
        _request: &CompletionRequest,
    ) -> Result<Option<String>, ChatError> {
        Err(ChatError::Transport(
            "error sending request: connection refused".to_string(),
        ))
    }
}

struct Key(Option<&'static str>);

impl CredentialSource for Key {
    fn api_key(&self) -> Option<String> {
        self.0.map(str::to_string)
    }
}

fn session_with_key() -> ChatSession {
    ChatSession::new(CompletionSettings::default(), Arc::new(Key(Some("gsk_test"))))
}

const HI_THERE: &str = r#"{"choices":[{"message":{"role":"assistant","content":"Hi there"}}]}"#;

#[tokio::test]
async fn settled_submission_adds_user_then_assistant() {
    let client = CannedClient::ok(HI_THERE);
    let mut chat = session_with_key();

    for (i, draft) in ["hello", "what about data science?", "thanks"].iter().enumerate() {
        assert!(chat.send(draft, &client).await);
        assert_eq!(chat.transcript().len(), 2 * (i + 1));
        let roles: Vec<ChatRole> = chat.transcript()[2 * i..]
            .iter()
            .map(|m| m.role)
            .collect();
        assert_eq!(roles, vec![ChatRole::User, ChatRole::Assistant]);
        assert!(!chat.is_awaiting_response());
    }
    assert_eq!(client.calls(), 3);
}

#[tokio::test]
async fn mid_flight_transcript_has_only_the_user_entry() {
    let client = CannedClient::ok(HI_THERE);
    let mut chat = session_with_key();

    let pending = match chat.submit("hello") {
        Submission::Dispatched(pending) => pending,
        other => panic!("expected dispatch, got {:?}", other),
    };
    assert_eq!(chat.transcript().len(), 1);
    assert!(chat.is_awaiting_response());

    let outcome = pending.send(&client).await;
    chat.settle(outcome);
    assert_eq!(chat.transcript().len(), 2);
    assert!(!chat.is_awaiting_response());
}

#[tokio::test]
async fn whitespace_drafts_never_reach_the_network() {
    let client = CannedClient::ok(HI_THERE);
    let mut chat = session_with_key();

    for draft in ["", " ", "\n\n", "\t  \r\n"] {
        assert!(!chat.send(draft, &client).await);
    }
    assert!(chat.transcript().is_empty());
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn submit_while_awaiting_is_a_no_op() {
    let client = CannedClient::ok(HI_THERE);
    let mut chat = session_with_key();

    let pending = match chat.submit("first") {
        Submission::Dispatched(pending) => pending,
        other => panic!("expected dispatch, got {:?}", other),
    };

    assert!(!chat.send("second", &client).await);
    assert!(matches!(chat.submit("third"), Submission::Rejected));
    assert_eq!(chat.transcript().len(), 1);
    assert_eq!(client.calls(), 0);

    chat.settle(pending.send(&client).await);
    assert_eq!(client.calls(), 1);
    assert_eq!(chat.transcript().len(), 2);
}

#[tokio::test]
async fn missing_credential_makes_no_network_call() {
    let client = CannedClient::ok(HI_THERE);
    let mut chat = ChatSession::new(CompletionSettings::default(), Arc::new(Key(None)));

    assert!(chat.send("hello", &client).await);

    let transcript = chat.transcript();
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[0].content, "hello");
    assert_eq!(transcript[1].role, ChatRole::Assistant);
    assert_eq!(
        transcript[1].content,
        ChatError::MissingCredential.diagnostic()
    );
    assert_eq!(client.calls(), 0);
    assert!(!chat.is_awaiting_response());
}

#[tokio::test]
async fn upstream_completion_text_is_used_verbatim() {
    let client = CannedClient::ok(HI_THERE);
    let mut chat = session_with_key();

    chat.send("hello", &client).await;
    assert_eq!(chat.transcript()[1].content, "Hi there");
}

#[tokio::test]
async fn upstream_error_message_is_surfaced() {
    let client = CannedClient::new(
        StatusCode::TOO_MANY_REQUESTS,
        r#"{"error":{"message":"rate limited"}}"#,
    );
    let mut chat = session_with_key();

    chat.send("hello", &client).await;

    let reply = &chat.transcript()[1];
    assert_eq!(reply.role, ChatRole::Assistant);
    assert!(reply.content.contains("rate limited"));
    assert!(reply.content.contains("API Error"));
}

#[tokio::test]
async fn upstream_error_without_body_uses_status_text() {
    let client = CannedClient::new(StatusCode::SERVICE_UNAVAILABLE, "");
    let mut chat = session_with_key();

    chat.send("hello", &client).await;
    assert!(chat.transcript()[1].content.contains("Service Unavailable"));
}

#[tokio::test]
async fn transport_failure_becomes_an_entry() {
    let mut chat = session_with_key();

    chat.send("hello", &UnreachableClient).await;

    let reply = &chat.transcript()[1];
    assert!(reply.content.starts_with("Error: "));
    assert!(reply.content.contains("connection refused"));
    assert!(!chat.is_awaiting_response());

    // The session is usable again right away.
    let client = CannedClient::ok(HI_THERE);
    assert!(chat.send("retry", &client).await);
    assert_eq!(chat.transcript()[3].content, "Hi there");
}

#[tokio::test]
async fn payload_is_framed_by_system_and_newest_user_message() {
    let client = CannedClient::ok(HI_THERE);
    let mut chat = session_with_key();

    for (turn, draft) in ["one", "two", "three", "four"].iter().enumerate() {
        chat.send(draft, &client).await;
        let request = client.last_request();

        assert_eq!(request.messages.len(), 2 * turn + 2);
        let first = request.messages.first().unwrap();
        assert_eq!(first.role, WireRole::System);
        assert_eq!(first.content, SYSTEM_PROMPT);
        let last = request.messages.last().unwrap();
        assert_eq!(last.role, WireRole::User);
        assert_eq!(last.content, *draft);

        assert_eq!(request.max_tokens, 1024);
        assert_eq!(request.temperature, 0.7);
    }

    let seen = client.seen.lock().unwrap();
    assert!(seen.iter().all(|(key, _)| key == "gsk_test"));
}
