//! Frames of the outgoing event-stream and their wire encoding.

use axum::response::sse::Event;
use events::StreamError;
use serde_json::json;

/// One frame of an SSE things stream.
///
/// Data frames carry a serialized thing view. Heartbeats are protocol-level
/// comments that keep idle connections from being timed out by proxies; a
/// client's `EventSource` never sees them. Error frames are terminal, the
/// stream ends right after one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseFrame {
    Data(String),
    Heartbeat,
    Error(String),
}

impl SseFrame {
    pub fn data(payload: impl Into<String>) -> Self {
        SseFrame::Data(payload.into())
    }

    /// Build the terminal frame for an in-band subscription error.
    pub fn error(error: &StreamError) -> Self {
        let payload = json!({
            "error": error.code(),
            "description": error.to_string(),
        });
        SseFrame::Error(payload.to_string())
    }

    pub fn is_heartbeat(&self) -> bool {
        matches!(self, SseFrame::Heartbeat)
    }

    /// Encode this frame for the wire.
    pub fn into_event(self) -> Event {
        match self {
            SseFrame::Data(payload) => Event::default().data(payload),
            SseFrame::Heartbeat => Event::default().comment(""),
            SseFrame::Error(payload) => Event::default().event("error").data(payload),
        }
    }
}
