//! Byte-stream to line decoding.
//!
//! Chunk boundaries on the wire are arbitrary: a line, or a multi-byte UTF-8
//! character, may be split across two reads. The decoder buffers raw bytes and
//! only decodes once a full line is available. `\n` never occurs inside a
//! UTF-8 multi-byte sequence, so splitting on it before decoding is safe.

/// Turns a sequence of byte chunks into complete text lines.
#[derive(Debug, Default)]
pub struct LineDecoder {
    pending: Vec<u8>,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next chunk and return every line it completed, in order.
    ///
    /// Line terminators (`\n`, and a preceding `\r`) are stripped. Invalid
    /// UTF-8 is replaced rather than rejected.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        let mut start = 0;
        while let Some(offset) = self.pending[start..].iter().position(|b| *b == b'\n') {
            let end = start + offset;
            lines.push(decode_line(&self.pending[start..end]));
            start = end + 1;
        }
        self.pending.drain(..start);
        lines
    }

    /// Flush the trailing partial line once the byte source is exhausted.
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let line = decode_line(&self.pending);
        self.pending.clear();
        Some(line)
    }

    /// Number of buffered bytes that do not yet form a complete line.
    pub fn buffered(&self) -> usize {
        self.pending.len()
    }
}

fn decode_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}
