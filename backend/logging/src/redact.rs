//! Log Redaction Layer
//!
//! Scrubs provider API keys and bearer tokens from strings prior to logging.

use regex::Regex;
use std::sync::LazyLock;

static API_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"sk-[A-Za-z0-9_\-]{16,}").unwrap());
static BEARER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Bearer\s+[A-Za-z0-9\-\._~+/]+=*").unwrap());

/// Redacts credentials in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = BEARER_RE.replace_all(input, "Bearer [REDACTED_TOKEN]");
    API_KEY_RE.replace_all(&redacted, "[REDACTED_KEY]").into_owned()
}

/// Short, log-safe rendering of a secret: its first four characters and length.
pub fn mask_secret(secret: &str) -> String {
    let prefix: String = secret.chars().take(4).collect();
    format!("{prefix}… ({} chars)", secret.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redaction() {
        let raw = "upstream said 401 for Bearer eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9 and key sk-voidai-abcdefghijklmnop1234";
        let clean = redact_sensitive_data(raw);
        assert!(!clean.contains("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9"));
        assert!(!clean.contains("abcdefghijklmnop1234"));
        assert!(clean.contains("Bearer [REDACTED_TOKEN]"));
        assert!(clean.contains("[REDACTED_KEY]"));
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(redact_sensitive_data("connection refused"), "connection refused");
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("sk-123456"), "sk-1… (9 chars)");
    }
}
