//! Chat transcript
//!
//! Holds the conversation shown by the chat widget. A send is split in two
//! halves so the UI can dispatch the request in between: `begin` records the
//! user message and hands back the question, `resolve` appends the reply.

use crate::error::{ApiError, ApiResult, ErrorKind};
use chrono::Utc;
use tracing::error;
use tutor_shared::protocol::AskResponse;
use tutor_shared::{ChatFailure, ChatMessage, Role};

pub const GREETING: &str = "Hello! I'm your AI tutor. I'm here to help you learn and understand difficult concepts. What would you like to study today?";

/// Shown instead of an answer whenever the request fails.
pub const FALLBACK_REPLY: &str =
    "I'm sorry, I'm having trouble connecting right now. Please try again in a moment.";

#[derive(Debug, Clone)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
    next_id: u64,
    pending: bool,
}

impl Default for ChatTranscript {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatTranscript {
    pub fn new() -> Self {
        let mut transcript = Self {
            messages: Vec::new(),
            next_id: 1,
            pending: false,
        };
        transcript.push(Role::Assistant, GREETING.to_string(), None);
        transcript
    }

    fn push(&mut self, role: Role, content: String, failure: Option<ChatFailure>) -> &ChatMessage {
        self.messages.push(ChatMessage {
            id: self.next_id,
            role,
            content,
            timestamp: Utc::now(),
            failure,
        });
        self.next_id += 1;
        &self.messages[self.messages.len() - 1]
    }

    /// Whether `input` may be sent right now.
    pub fn can_send(&self, input: &str) -> bool {
        !self.pending && !input.trim().is_empty()
    }

    /// Appends the user's message and marks a reply as pending.
    ///
    /// Returns the question to send, or `None` when the input is blank or a
    /// reply is still outstanding.
    pub fn begin(&mut self, input: &str) -> Option<String> {
        if !self.can_send(input) {
            return None;
        }
        let question = input.trim().to_string();
        self.push(Role::User, question.clone(), None);
        self.pending = true;
        Some(question)
    }

    /// Appends the assistant's reply for the pending question.
    pub fn resolve(&mut self, result: ApiResult<AskResponse>) -> &ChatMessage {
        self.pending = false;
        match result {
            Ok(resp) => self.push(Role::Assistant, resp.answer, None),
            Err(e) => {
                error!(error = %e, "chat request failed");
                let failure = failure_for(&e);
                self.push(Role::Assistant, FALLBACK_REPLY.to_string(), Some(failure))
            }
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

pub fn failure_for(err: &ApiError) -> ChatFailure {
    match err.kind() {
        ErrorKind::Offline => ChatFailure::Offline,
        _ => ChatFailure::Server,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ChatApi;
    use crate::client::AuthorizedClient;
    use crate::request::MockHttpClient;
    use crate::storage::MemoryStore;
    use serde_json::json;

    const BASE: &str = "http://localhost:5000/api";

    #[test]
    fn starts_with_the_greeting() {
        let t = ChatTranscript::new();
        assert_eq!(t.messages().len(), 1);
        assert_eq!(t.messages()[0].role, Role::Assistant);
        assert_eq!(t.messages()[0].content, GREETING);
    }

    #[test]
    fn blank_input_and_pending_replies_block_sending() {
        let mut t = ChatTranscript::new();
        assert_eq!(t.begin("   "), None);

        assert_eq!(t.begin(" hi ").as_deref(), Some("hi"));
        assert!(t.is_pending());
        assert_eq!(t.begin("again"), None);
        assert_eq!(t.messages().len(), 2);
    }

    #[test]
    fn ids_increase() {
        let mut t = ChatTranscript::new();
        t.begin("one");
        t.resolve(Ok(AskResponse {
            answer: "1".into(),
            timestamp: None,
            user_id: None,
        }));
        let ids: Vec<u64> = t.messages().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn answered_question_appends_reply() {
        let http = MockHttpClient::new();
        http.mock_response(
            &format!("{}/ask", BASE),
            200,
            json!({ "answer": "Plants make food from light." }),
        );
        let client = AuthorizedClient::new(BASE, &http, MemoryStore::new(), || {});
        let mut t = ChatTranscript::new();

        let question = t.begin("What is photosynthesis?").unwrap();
        let reply = t.resolve(ChatApi::new(&client).ask(&question, None, None).await);

        assert_eq!(reply.content, "Plants make food from light.");
        assert_eq!(reply.failure, None);
        assert!(!t.is_pending());
    }

    #[tokio::test]
    async fn failed_question_ends_with_the_apology() {
        let http = MockHttpClient::new();
        http.mock_network_failure(&format!("{}/ask", BASE));
        let client = AuthorizedClient::new(BASE, &http, MemoryStore::new(), || {});
        let mut t = ChatTranscript::new();

        let question = t.begin("What is photosynthesis?").unwrap();
        t.resolve(ChatApi::new(&client).ask(&question, None, None).await);

        let last = t.messages().last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.content, FALLBACK_REPLY);
        assert_eq!(last.failure, Some(ChatFailure::Offline));
        assert_eq!(t.messages().len(), 3);
    }

    #[test]
    fn server_errors_are_tagged_separately() {
        let mut t = ChatTranscript::new();
        t.begin("hi");
        let reply = t.resolve(Err(ApiError::Status {
            status: 500,
            message: "boom".into(),
        }));
        assert_eq!(reply.content, FALLBACK_REPLY);
        assert_eq!(reply.failure, Some(ChatFailure::Server));
    }
}
