use serde_json::Value;

/// Prefix that marks a server-sent-event data line.
pub const DATA_PREFIX: &str = "data: ";

/// Payload the upstream sends when no more content will follow.
pub const DONE_SENTINEL: &str = "[DONE]";

/// What a single line of the event stream turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Incremental text. Empty when the payload had no `choices[0].delta.content`.
    Delta(String),
    /// The `[DONE]` sentinel. Carries no content and does not end the read loop.
    Done,
    /// Blank lines, comments, `event:`/`id:` fields and anything else without
    /// the `data: ` prefix.
    Ignored,
    /// A `data: ` line whose payload is not JSON. Dropped without aborting the
    /// stream: ignore-and-continue.
    Malformed,
}

impl StreamEvent {
    /// Parse one line (without its trailing newline).
    pub fn parse_line(line: &str) -> Self {
        let Some(rest) = line.strip_prefix(DATA_PREFIX) else {
            return StreamEvent::Ignored;
        };
        let payload = rest.trim();
        if payload == DONE_SENTINEL {
            return StreamEvent::Done;
        }
        match serde_json::from_str::<Value>(payload) {
            Ok(json) => StreamEvent::Delta(extract_delta(&json).to_owned()),
            Err(_) => StreamEvent::Malformed,
        }
    }

    /// Text this event contributes to the reply.
    pub fn as_delta(&self) -> Option<&str> {
        match self {
            StreamEvent::Delta(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

/// Pull `choices[0].delta.content` out of a chunk payload.
///
/// Missing or non-string fields are a zero-length contribution, not an error.
pub fn extract_delta(payload: &Value) -> &str {
    payload
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("delta"))
        .and_then(|d| d.get("content"))
        .and_then(Value::as_str)
        .unwrap_or("")
}
