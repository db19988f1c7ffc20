use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        f.write_str(s)
    }
}

/// A single role-tagged entry of the conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Body the client posts to the relay.
///
/// `extra` is flattened into the top-level JSON object, so callers can pass
/// any upstream option (`temperature`, `max_tokens`, even `model`) and the
/// relay forwards it untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RelayRequest {
    pub messages: Vec<ChatMessage>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RelayRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            extra: Map::new(),
        }
    }

    /// Attach an extra upstream field.
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_serializes_lowercase() {
        let msg = ChatMessage::assistant("hi");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json, json!({"role": "assistant", "content": "hi"}));
        assert_eq!(Role::System.to_string(), "system");
    }

    #[test]
    fn test_relay_request_flattens_extra_fields() {
        let req = RelayRequest::new(vec![ChatMessage::user("hi")])
            .with_field("temperature", json!(0.2));
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            json!({
                "messages": [{"role": "user", "content": "hi"}],
                "temperature": 0.2
            })
        );
    }

    #[test]
    fn test_relay_request_collects_unknown_keys() {
        let req: RelayRequest = serde_json::from_value(json!({
            "messages": [{"role": "system", "content": "be brief"}],
            "model": "other-model"
        }))
        .unwrap();
        assert_eq!(req.messages[0].role, Role::System);
        assert_eq!(req.extra["model"], "other-model");
    }
}
