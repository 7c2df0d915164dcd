//! Turns an SSE byte stream into an ordered list of slides.
//!
//! ```rust
//! use dcomic::{ComicConsumer, StreamFrame};
//!
//! let mut consumer = ComicConsumer::new();
//! let wire = StreamFrame::text("Hello world[data:image/png;base64,QQ==]").to_sse();
//!
//! let outcome = consumer.feed(wire.as_bytes());
//! assert_eq!(outcome.slides.len(), 1);
//! assert_eq!(outcome.slides[0].image_url, "data:image/png;base64,QQ==");
//! ```

use std::fmt::Display;
use std::pin::Pin;

use futures_core::Stream;
use futures_util::StreamExt;

use crate::{ComicError, Slide, SlideExtractor, SseDecoder, StreamFrame};

pub type SlideStream<'a> = Pin<Box<dyn Stream<Item = Result<Slide, ComicError>> + Send + 'a>>;

/// Result of feeding one chunk (or the end of the stream) to a consumer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedOutcome {
    /// Slides completed by this call, in order.
    pub slides: Vec<Slide>,
    /// Set when the producer sent an `error` frame or a frame failed to
    /// decode. Slides completed before it are still in `slides`; no further
    /// slides follow.
    pub error: Option<ComicError>,
    /// Unpaired text left when the stream ended. Only set by `finish`.
    pub leftover: Option<String>,
}

/// One consumer per generation; it owns the decoder, buffer and slide list.
#[derive(Debug, Default)]
pub struct ComicConsumer {
    decoder: SseDecoder,
    extractor: SlideExtractor,
    terminated: bool,
}

impl ComicConsumer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, bytes: &[u8]) -> FeedOutcome {
        if self.terminated {
            return FeedOutcome::default();
        }

        let frames = self.decoder.push(bytes);
        self.apply(frames)
    }

    pub fn finish(&mut self) -> FeedOutcome {
        if self.terminated {
            return FeedOutcome::default();
        }

        let frames = self.decoder.finish();
        let mut outcome = self.apply(frames);
        if outcome.error.is_none() {
            outcome.leftover = self.extractor.finish();
        }
        self.terminated = true;
        outcome
    }

    pub fn slides(&self) -> &[Slide] {
        self.extractor.slides()
    }

    pub fn into_slides(self) -> Vec<Slide> {
        self.extractor.into_slides()
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Clears all state before a new generation.
    pub fn reset(&mut self) {
        self.decoder = SseDecoder::default();
        self.extractor.reset();
        self.terminated = false;
    }

    fn apply(&mut self, frames: Vec<Result<StreamFrame, ComicError>>) -> FeedOutcome {
        let mut outcome = FeedOutcome::default();

        for frame in frames {
            let frame = match frame {
                Ok(frame) => frame,
                Err(err) => {
                    tracing::warn!(
                        phase = "consume",
                        event = "undecodable_frame",
                        slides = self.extractor.slides().len(),
                        error = %err,
                        "Dropping stream after an undecodable frame"
                    );
                    self.terminated = true;
                    outcome.error = Some(err);
                    break;
                }
            };

            match frame {
                StreamFrame::Text(text) => {
                    outcome.slides.extend(self.extractor.push_str(&text));
                }
                StreamFrame::Image { data, mime_type } => {
                    let marker = StreamFrame::inline_marker(&data, &mime_type);
                    outcome.slides.extend(self.extractor.push_str(&marker));
                }
                StreamFrame::Error(message) => {
                    tracing::warn!(
                        phase = "consume",
                        event = "error_frame",
                        slides = self.extractor.slides().len(),
                        "Producer reported a failure"
                    );
                    self.terminated = true;
                    outcome.error = Some(ComicError::upstream(message));
                    break;
                }
            }
        }

        outcome
    }
}

/// Adapts a byte stream into a stream of slides.
///
/// An `error` frame, a transport error or an undecodable frame ends the stream
/// with one `Err`; slides yielded before it stay valid.
pub fn consume_slides<'a, S, B, E>(bytes: S) -> SlideStream<'a>
where
    S: Stream<Item = Result<B, E>> + Send + 'a,
    B: AsRef<[u8]> + Send + 'a,
    E: Display + Send + 'a,
{
    Box::pin(async_stream::try_stream! {
        let mut consumer = ComicConsumer::new();
        let mut bytes = Box::pin(bytes);

        while let Some(chunk) = bytes.next().await {
            let chunk = chunk.map_err(|err| ComicError::transport(err.to_string()))?;
            let outcome = consumer.feed(chunk.as_ref());
            for slide in outcome.slides {
                yield slide;
            }
            if let Some(err) = outcome.error {
                Err::<(), ComicError>(err)?;
            }
        }

        let outcome = consumer.finish();
        for slide in outcome.slides {
            yield slide;
        }
        if let Some(err) = outcome.error {
            Err::<(), ComicError>(err)?;
        }
    })
}
