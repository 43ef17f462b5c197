//! Conversation state types
//!
//! The transcript lives only as long as the process. Nothing here touches
//! disk or the network.

use serde::{Deserialize, Serialize};

/// A chat message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// The role of a chat message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// Ordered list of messages sent as context with every completion call.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Drop the trailing user message left behind by a failed call.
    ///
    /// Returns the removed message, or `None` when the transcript is empty
    /// or does not end with a user message.
    pub fn rollback_user(&mut self) -> Option<ChatMessage> {
        match self.messages.last() {
            Some(last) if last.role == ChatRole::User => self.messages.pop(),
            _ => None,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&ChatMessage::user("Hello")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"Hello"}"#);

        let json = serde_json::to_string(&ChatMessage::assistant("Hi")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"Hi"}"#);
    }

    #[test]
    fn test_rollback_removes_trailing_user() {
        let mut transcript = Transcript::new();
        transcript.push(ChatMessage::user("one"));
        transcript.push(ChatMessage::assistant("two"));
        transcript.push(ChatMessage::user("three"));

        let removed = transcript.rollback_user();
        assert_eq!(removed, Some(ChatMessage::user("three")));
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.messages()[1], ChatMessage::assistant("two"));
    }

    #[test]
    fn test_rollback_on_empty_is_noop() {
        let mut transcript = Transcript::new();
        assert_eq!(transcript.rollback_user(), None);
        assert!(transcript.is_empty());
    }

    #[test]
    fn test_rollback_keeps_trailing_assistant() {
        let mut transcript = Transcript::new();
        transcript.push(ChatMessage::user("Hello"));
        transcript.push(ChatMessage::assistant("Hi there!"));

        assert_eq!(transcript.rollback_user(), None);
        assert_eq!(transcript.len(), 2);
    }
}
