//! Decoder for the server-sent events of a streaming chat completion.
//!
//! Bytes arrive in arbitrary chunks, possibly splitting a UTF-8 sequence;
//! complete lines are decoded into [`StreamEvent`]s and any partial line is
//! kept for the next push.

use crate::error::LlmError;
use serde::Deserialize;

/// A decoded streaming event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A text delta, possibly empty
    Delta(String),
    /// The `[DONE]` marker
    Done,
}

#[derive(Debug, Deserialize)]
struct StreamChunkRaw {
    #[serde(default)]
    choices: Vec<StreamChoiceRaw>,
}

#[derive(Debug, Deserialize)]
struct StreamChoiceRaw {
    delta: DeltaRaw,
}

#[derive(Debug, Deserialize)]
struct DeltaRaw {
    #[serde(default)]
    content: Option<String>,
}

/// Line-buffering SSE decoder
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append raw bytes and decode every complete line
    pub fn push(&mut self, bytes: &[u8]) -> Result<Vec<StreamEvent>, LlmError> {
        self.buffer.extend_from_slice(bytes);

        let mut events = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            if let Some(event) = decode_line(&line)? {
                events.push(event);
            }
        }
        Ok(events)
    }

    /// Decode whatever is left once the byte stream has ended
    pub fn finish(&mut self) -> Result<Option<StreamEvent>, LlmError> {
        let rest = std::mem::take(&mut self.buffer);
        decode_line(&rest)
    }
}

/// Decode one SSE line; blank and non-data lines yield nothing
fn decode_line(line: &[u8]) -> Result<Option<StreamEvent>, LlmError> {
    let line = std::str::from_utf8(line)
        .map_err(|e| LlmError::Parse(format!("invalid UTF-8 in stream: {}", e)))?
        .trim();
    let Some(data) = line.strip_prefix("data:") else {
        // "event:", "id:", "retry:" and keep-alive comments
        return Ok(None);
    };

    let data = data.trim();
    if data == "[DONE]" {
        return Ok(Some(StreamEvent::Done));
    }

    let raw: StreamChunkRaw = serde_json::from_str(data).map_err(|e| {
        let preview: String = data.chars().take(200).collect();
        LlmError::Parse(format!("{} (data: {})", e, preview))
    })?;

    let delta = raw
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content)
        .unwrap_or_default();
    Ok(Some(StreamEvent::Delta(delta)))
}
