//! Server-sent-events line framing shared by the streaming clients

/// Accumulates raw network chunks and yields complete lines.
///
/// Network chunks do not align with line boundaries; a partial trailing
/// line stays buffered until its terminator arrives.
#[derive(Default)]
pub struct LineBuffer {
    buf: String,
}

impl LineBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a network chunk and drain all complete lines
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buf.push_str(&String::from_utf8_lossy(bytes));

        let mut lines = Vec::new();
        while let Some(pos) = self.buf.find('\n') {
            let line: String = self.buf.drain(..=pos).collect();
            lines.push(line.trim_end_matches(['\n', '\r']).to_string());
        }
        lines
    }
}

/// Payload of an SSE `data:` line; comments, blank lines, and other fields
/// yield `None`.
pub fn data_payload(line: &str) -> Option<&str> {
    line.strip_prefix("data:").map(str::trim_start)
}
