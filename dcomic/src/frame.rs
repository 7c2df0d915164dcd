//! Wire frames exchanged between producer and consumer, and the incremental
//! SSE decoder.
//!
//! ```rust
//! use dcomic::{SseDecoder, StreamFrame};
//!
//! let frame = StreamFrame::text("Once upon a time");
//! let wire = frame.to_sse();
//! assert_eq!(wire, "data: {\"type\":\"text\",\"data\":\"Once upon a time\"}\n\n");
//!
//! let mut decoder = SseDecoder::default();
//! let frames = decoder.push(wire.as_bytes());
//! assert_eq!(frames, vec![Ok(frame)]);
//! ```

use dcommon::LineSplitter;
use serde::{Deserialize, Serialize};

use crate::ComicError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamFrame {
    Text(String),
    Image { data: String, mime_type: String },
    Error(String),
}

impl StreamFrame {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn image(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self::Image {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }

    /// JSON payload carried in the frame's `data:` line.
    pub fn to_json(&self) -> String {
        let wire = match self {
            Self::Text(text) => WireFrame {
                kind: WireKind::Text,
                data: text.clone(),
                mime_type: None,
            },
            Self::Image { data, mime_type } => WireFrame {
                kind: WireKind::Image,
                data: data.clone(),
                mime_type: Some(mime_type.clone()),
            },
            Self::Error(message) => WireFrame {
                kind: WireKind::Error,
                data: message.clone(),
                mime_type: None,
            },
        };

        // Plain strings and a unit enum cannot fail to serialize.
        serde_json::to_string(&wire).unwrap_or_default()
    }

    pub fn to_sse(&self) -> String {
        format!("data: {}\n\n", self.to_json())
    }

    pub fn from_json(payload: &str) -> Result<Self, ComicError> {
        let wire: WireFrame = serde_json::from_str(payload)
            .map_err(|err| ComicError::decode(format!("invalid frame payload: {err}")))?;

        match wire.kind {
            WireKind::Text => Ok(Self::Text(wire.data)),
            WireKind::Error => Ok(Self::Error(wire.data)),
            WireKind::Image => {
                let mime_type = wire
                    .mime_type
                    .filter(|mime| !mime.is_empty())
                    .ok_or_else(|| ComicError::decode("image frame is missing mimeType"))?;
                Ok(Self::Image {
                    data: wire.data,
                    mime_type,
                })
            }
        }
    }

    /// Inline marker form of an image frame, as the model writes it inside text.
    pub(crate) fn inline_marker(data: &str, mime_type: &str) -> String {
        format!("[data:{mime_type};base64,{data}]")
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct WireFrame {
    #[serde(rename = "type")]
    kind: WireKind,
    data: String,
    #[serde(rename = "mimeType", default, skip_serializing_if = "Option::is_none")]
    mime_type: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum WireKind {
    Text,
    Image,
    Error,
}

/// Incremental `text/event-stream` decoder.
///
/// Events end at a blank line. Multiple `data:` lines within one event are
/// joined with `\n`; comments and other fields are ignored. Input may be split
/// at any byte. Each event decodes on its own, so a malformed event does not
/// discard the frames decoded before it.
#[derive(Debug, Default)]
pub struct SseDecoder {
    lines: LineSplitter,
    data_lines: Vec<String>,
}

impl SseDecoder {
    pub fn push(&mut self, bytes: &[u8]) -> Vec<Result<StreamFrame, ComicError>> {
        let mut frames = Vec::new();
        for line in self.lines.push(bytes) {
            self.accept_line(&line, &mut frames);
        }
        frames
    }

    /// Dispatches whatever was left unterminated when the byte stream closed.
    pub fn finish(&mut self) -> Vec<Result<StreamFrame, ComicError>> {
        let mut frames = Vec::new();
        if let Some(tail) = self.lines.finish() {
            self.accept_line(&tail, &mut frames);
        }
        frames.extend(self.dispatch());
        frames
    }

    fn accept_line(&mut self, raw: &[u8], frames: &mut Vec<Result<StreamFrame, ComicError>>) {
        let line = match std::str::from_utf8(raw) {
            Ok(line) => line,
            Err(err) => {
                self.data_lines.clear();
                frames.push(Err(ComicError::decode(format!(
                    "frame is not valid UTF-8: {err}"
                ))));
                return;
            }
        };

        if line.is_empty() {
            frames.extend(self.dispatch());
            return;
        }

        if line.starts_with(':') {
            return;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        if field == "data" {
            self.data_lines.push(value.to_string());
        }
    }

    fn dispatch(&mut self) -> Option<Result<StreamFrame, ComicError>> {
        if self.data_lines.is_empty() {
            return None;
        }

        let payload = std::mem::take(&mut self.data_lines).join("\n");
        Some(StreamFrame::from_json(&payload))
    }
}
