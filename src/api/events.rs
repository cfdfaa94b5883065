use serde::Deserialize;
use tracing::{debug, warn};

/// One event of the backend's chat stream, as emitted on the
/// `text/event-stream` body of `POST /api/chat/stream`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    Start {
        agent: String,
    },
    Chunk {
        content: String,
        #[serde(default)]
        index: u64,
    },
    Done {
        #[serde(default)]
        memory_used: bool,
        #[serde(default)]
        rag_used: bool,
    },
    Error {
        message: String,
    },
}

impl StreamEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Done { .. } | StreamEvent::Error { .. })
    }
}

/// The agent-missing path of the backend skips the `type` tag and sends a
/// bare `{"error": "..."}` payload.
#[derive(Deserialize)]
struct BareError {
    error: String,
}

fn decode_payload(payload: &str) -> Option<StreamEvent> {
    if let Ok(event) = serde_json::from_str::<StreamEvent>(payload) {
        return Some(event);
    }
    if let Ok(bare) = serde_json::from_str::<BareError>(payload) {
        return Some(StreamEvent::Error {
            message: bare.error,
        });
    }
    warn!(payload, "skipping malformed stream event");
    None
}

fn decode_frame(frame: &str) -> Option<StreamEvent> {
    let mut payload = String::new();
    for line in frame.lines() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.starts_with(':') {
            // SSE comment, used as keep-alive.
            continue;
        }
        if let Some(data) = line.strip_prefix("data:") {
            if !payload.is_empty() {
                payload.push('\n');
            }
            payload.push_str(data.trim_start());
        } else {
            debug!(line, "ignoring non-data stream line");
        }
    }
    if payload.is_empty() {
        return None;
    }
    decode_payload(&payload)
}

/// Incremental splitter for an SSE body. Network chunks land in `push` in
/// whatever sizes the transport delivers; complete `data:` frames come out
/// as decoded events, partial frames stay buffered.
///
/// The buffer is byte-oriented: a read boundary can fall inside a multi-byte
/// UTF-8 character, so text is only decoded per complete frame. The frame
/// delimiter is ASCII, so a complete frame always holds whole characters.
#[derive(Debug, Default)]
pub struct SseBuffer {
    buf: Vec<u8>,
}

impl SseBuffer {
    pub fn new() -> SseBuffer {
        SseBuffer::default()
    }

    pub fn push(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        self.buf.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(end) = self.buf.windows(2).position(|w| w == b"\n\n") {
            let frame: Vec<u8> = self.buf.drain(..end + 2).collect();
            let frame = String::from_utf8_lossy(&frame);
            if let Some(event) = decode_frame(&frame) {
                events.push(event);
            }
        }
        events
    }

    /// Flushes whatever is left when the body ends without a trailing blank
    /// line.
    pub fn finish(&mut self) -> Option<StreamEvent> {
        let rest = std::mem::take(&mut self.buf);
        let rest = String::from_utf8_lossy(&rest);
        if rest.trim().is_empty() {
            return None;
        }
        decode_frame(&rest)
    }
}
