//! Adapts a generative-model chunk stream into ordered [`StreamFrame`]s.

use std::pin::Pin;
use std::sync::Arc;

use dprovider::{Content, GenerateRequest, GenerativeModel, Part};
use futures_core::Stream;
use futures_util::StreamExt;

use crate::{ComicError, StreamFrame};

/// Output-shape suffix appended to every comic prompt.
pub const COMIC_INSTRUCTIONS: &str = "Use a fun story about lots of computers as a metaphor.
Keep sentences short but conversational, casual, and engaging.
For each sentence, provide a cute, minimal illustration as inline base64 encoded PNG data.
Example format: [Sentence Text][Inline PNG Data]
No commentary or extra text, just begin your explanation.
Keep going until you're done.";

/// Message carried by the single `error` frame sent when the upstream stream fails.
pub const STREAM_FAILURE_MESSAGE: &str = "Error processing Vertex AI stream";

pub type FrameStream<'a> = Pin<Box<dyn Stream<Item = StreamFrame> + Send + 'a>>;

pub fn validate_prompt(prompt: &str) -> Result<(), ComicError> {
    if prompt.trim().is_empty() {
        return Err(ComicError::invalid_request("Prompt is required"));
    }
    Ok(())
}

#[derive(Clone)]
pub struct ComicProducer {
    model: Arc<dyn GenerativeModel>,
    model_name: String,
    instructions: String,
}

impl ComicProducer {
    pub fn new(model: Arc<dyn GenerativeModel>, model_name: impl Into<String>) -> Self {
        Self {
            model,
            model_name: model_name.into(),
            instructions: COMIC_INSTRUCTIONS.to_string(),
        }
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn build_prompt(&self, prompt: &str) -> String {
        format!("{prompt}\n{}", self.instructions)
    }

    /// Starts one generation.
    ///
    /// Failures before the upstream stream opens are returned as `Err` so the
    /// caller can answer with a plain error status. Once the stream is open,
    /// every failure is reported in-band as one `error` frame and the frame
    /// stream ends.
    pub async fn open<'a>(&'a self, prompt: &str) -> Result<FrameStream<'a>, ComicError> {
        validate_prompt(prompt)?;

        let request = GenerateRequest::new(
            self.model_name.clone(),
            vec![Content::user(self.build_prompt(prompt))],
        );

        tracing::info!(
            phase = "produce",
            event = "stream_open",
            provider = %self.model.id(),
            model = %self.model_name,
            "Opening comic stream"
        );

        let mut upstream = self.model.stream_generate(request).await?;

        let frames = async_stream::stream! {
            let mut emitted = 0usize;

            while let Some(item) = upstream.next().await {
                match item {
                    Ok(chunk) => {
                        for part in chunk.parts {
                            if let Some(frame) = frame_from_part(part) {
                                emitted += 1;
                                yield frame;
                            }
                        }
                    }
                    Err(err) => {
                        tracing::error!(
                            phase = "produce",
                            event = "stream_failed",
                            error = %err,
                            retryable = err.is_retryable(),
                            frames = emitted,
                            "Upstream stream failed"
                        );
                        yield StreamFrame::error(STREAM_FAILURE_MESSAGE);
                        return;
                    }
                }
            }

            tracing::info!(
                phase = "produce",
                event = "stream_complete",
                frames = emitted,
                "Comic stream finished"
            );
        };

        Ok(Box::pin(frames))
    }
}

impl std::fmt::Debug for ComicProducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComicProducer")
            .field("provider", &self.model.id())
            .field("model_name", &self.model_name)
            .finish_non_exhaustive()
    }
}

fn frame_from_part(part: Part) -> Option<StreamFrame> {
    match part {
        Part::Text(text) if !text.is_empty() => Some(StreamFrame::Text(text)),
        Part::InlineData(inline) if !inline.data.is_empty() && !inline.mime_type.is_empty() => {
            Some(StreamFrame::Image {
                data: inline.data,
                mime_type: inline.mime_type,
            })
        }
        _ => None,
    }
}
