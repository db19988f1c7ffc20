use serde::{Deserialize, Serialize};

use crate::message::{ChatMessage, Role};

/// Ordered, append-only list of the messages exchanged in a session.
///
/// Updates are expressed as reducers that consume the transcript and return
/// the next one, so a snapshot handed to the UI is never mutated behind its
/// back.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message at the end.
    pub fn push(mut self, message: ChatMessage) -> Self {
        self.messages.push(message);
        self
    }

    /// Replace the last element with an assistant message carrying `content`.
    ///
    /// This is a full replacement, not a patch: callers pass the complete
    /// accumulated reply each time. An empty transcript is returned as-is.
    pub fn with_last_content(mut self, content: impl Into<String>) -> Self {
        if let Some(last) = self.messages.last_mut() {
            *last = ChatMessage::assistant(content);
        }
        self
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Messages to send upstream: everything except a trailing assistant
    /// placeholder that is still waiting for its reply.
    pub fn history(&self) -> &[ChatMessage] {
        match self.messages.split_last() {
            Some((last, rest)) if last.role == Role::Assistant && last.content.is_empty() => rest,
            _ => &self.messages,
        }
    }
}

impl From<Vec<ChatMessage>> for Transcript {
    fn from(messages: Vec<ChatMessage>) -> Self {
        Self { messages }
    }
}
