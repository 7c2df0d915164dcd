//! Streaming comic-panel protocol.
//!
//! The producer turns a generative model stream into typed SSE frames; the
//! consumer reassembles those frames into `(caption, image)` slides as soon as
//! each pair is complete.

mod consumer;
mod error;
mod extractor;
mod frame;
mod producer;

#[cfg(feature = "client")]
mod client;

pub mod prelude {
    pub use crate::{
        ComicConsumer, ComicError, ComicErrorKind, ComicProducer, FeedOutcome, FrameStream, Slide,
        SlideExtractor, SlideStream, SseDecoder, StreamFrame,
    };
}

#[cfg(feature = "client")]
pub use client::ComicClient;
pub use consumer::{ComicConsumer, FeedOutcome, SlideStream, consume_slides};
pub use error::{ComicError, ComicErrorKind};
pub use extractor::{Slide, SlideExtractor};
pub use frame::{SseDecoder, StreamFrame};
pub use producer::{
    COMIC_INSTRUCTIONS, ComicProducer, FrameStream, STREAM_FAILURE_MESSAGE, validate_prompt,
};
