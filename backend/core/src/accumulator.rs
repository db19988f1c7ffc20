use tracing::{debug, trace};

use crate::event::StreamEvent;
use crate::sse::LineDecoder;

/// State threaded through one streamed reply: the line decoder and the text
/// received so far.
///
/// The accumulator belongs to a single send operation. Text is only ever
/// appended, so every intermediate value is a prefix of the final reply.
#[derive(Debug, Default)]
pub struct ReplyAccumulator {
    decoder: LineDecoder,
    text: String,
    deltas: usize,
    malformed: usize,
}

impl ReplyAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a chunk into the events of every line it completed.
    pub fn decode(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        self.decoder
            .feed(chunk)
            .iter()
            .map(|line| StreamEvent::parse_line(line))
            .collect()
    }

    /// Decode whatever partial line is left once the source is exhausted.
    pub fn finish(&mut self) -> Option<StreamEvent> {
        self.decoder.finish().map(|line| StreamEvent::parse_line(&line))
    }

    /// Fold one event into the reply. Returns `true` when the event was a
    /// delta, i.e. when the visible message should be refreshed.
    pub fn apply(&mut self, event: &StreamEvent) -> bool {
        match event {
            StreamEvent::Delta(delta) => {
                self.text.push_str(delta);
                self.deltas += 1;
                true
            }
            StreamEvent::Done => {
                trace!("received [DONE] sentinel");
                false
            }
            StreamEvent::Ignored => false,
            StreamEvent::Malformed => {
                self.malformed += 1;
                debug!(malformed = self.malformed, "discarding malformed event line");
                false
            }
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    /// Number of delta events applied so far.
    pub fn deltas(&self) -> usize {
        self.deltas
    }

    /// Number of malformed lines discarded so far.
    pub fn malformed(&self) -> usize {
        self.malformed
    }
}

/// Fold a complete sequence of chunks into the final reply text.
pub fn fold_chunks<I, C>(chunks: I) -> String
where
    I: IntoIterator<Item = C>,
    C: AsRef<[u8]>,
{
    let mut acc = ReplyAccumulator::new();
    for chunk in chunks {
        for event in acc.decode(chunk.as_ref()) {
            acc.apply(&event);
        }
    }
    if let Some(event) = acc.finish() {
        acc.apply(&event);
    }
    acc.into_text()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delta_line(text: &str) -> String {
        format!(
            "data: {}\n\n",
            serde_json::json!({"choices": [{"delta": {"content": text}}]})
        )
    }

    #[test]
    fn test_concatenates_deltas_in_order() {
        let body = ["Hel", "lo", ", ", "world"]
            .iter()
            .map(|s| delta_line(s))
            .collect::<String>();
        assert_eq!(fold_chunks([body.as_bytes()]), "Hello, world");
    }

    #[test]
    fn test_done_adds_nothing() {
        let body = format!("{}data: [DONE]\n\n", delta_line("ok"));
        assert_eq!(fold_chunks([body.as_bytes()]), "ok");
    }

    #[test]
    fn test_malformed_line_is_skipped() {
        let with_bad = format!("{}data: {{oops\n\n{}", delta_line("a"), delta_line("b"));
        let without = format!("{}{}", delta_line("a"), delta_line("b"));
        assert_eq!(fold_chunks([with_bad.as_bytes()]), fold_chunks([without.as_bytes()]));

        let mut acc = ReplyAccumulator::new();
        for ev in acc.decode(with_bad.as_bytes()) {
            acc.apply(&ev);
        }
        assert_eq!(acc.deltas(), 2);
        assert_eq!(acc.malformed(), 1);
    }

    #[test]
    fn test_chunk_boundaries_do_not_matter() {
        let body = ["naïve ", "café ", "☕"]
            .iter()
            .map(|s| delta_line(s))
            .collect::<String>();
        let whole = fold_chunks([body.as_bytes()]);
        let bytewise = fold_chunks(body.as_bytes().chunks(1));
        let uneven = fold_chunks(body.as_bytes().chunks(7));
        assert_eq!(whole, "naïve café ☕");
        assert_eq!(bytewise, whole);
        assert_eq!(uneven, whole);
    }

    #[test]
    fn test_trailing_line_without_newline_is_flushed() {
        let body = r#"data: {"choices":[{"delta":{"content":"tail"}}]}"#;
        assert_eq!(fold_chunks([body.as_bytes()]), "tail");
    }

    #[test]
    fn test_apply_reports_visible_updates() {
        let mut acc = ReplyAccumulator::new();
        assert!(acc.apply(&StreamEvent::Delta("x".into())));
        assert!(!acc.apply(&StreamEvent::Done));
        assert!(!acc.apply(&StreamEvent::Ignored));
        assert_eq!(acc.text(), "x");
    }
}
