//! Upstream chunk stream contract and an in-memory stream utility.
//!
//! ```rust
//! use dprovider::{ChunkStream, GenerateChunk, Part, VecChunkStream};
//!
//! let stream = VecChunkStream::new(vec![Ok(GenerateChunk::new(vec![Part::text("hello")]))]);
//! let _boxed: ChunkStream<'static> = Box::pin(stream);
//! ```

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;

use crate::{GenerateChunk, ProviderError};

/// Chunks arrive in the order the model emitted them. After the first `Err`
/// the stream is finished and yields nothing further.
pub type ChunkStream<'a> =
    Pin<Box<dyn Stream<Item = Result<GenerateChunk, ProviderError>> + Send + 'a>>;

#[derive(Debug)]
pub struct VecChunkStream {
    chunks: VecDeque<Result<GenerateChunk, ProviderError>>,
}

impl VecChunkStream {
    pub fn new(chunks: Vec<Result<GenerateChunk, ProviderError>>) -> Self {
        Self {
            chunks: chunks.into(),
        }
    }
}

impl Stream for VecChunkStream {
    type Item = Result<GenerateChunk, ProviderError>;

    fn poll_next(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Poll::Ready(self.chunks.pop_front())
    }
}
