use std::future::Future;
use std::pin::Pin;

use crate::{
    ChunkStream, GenerateRequest, GenerateResponse, GeneratedImage, ImageRequest, ProviderError,
    ProviderId,
};

pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait GenerativeModel: Send + Sync {
    fn id(&self) -> ProviderId;

    fn generate<'a>(
        &'a self,
        request: GenerateRequest,
    ) -> ProviderFuture<'a, Result<GenerateResponse, ProviderError>>;

    fn stream_generate<'a>(
        &'a self,
        request: GenerateRequest,
    ) -> ProviderFuture<'a, Result<ChunkStream<'a>, ProviderError>>;
}

pub trait ImageGenerator: Send + Sync {
    fn generate_images<'a>(
        &'a self,
        request: ImageRequest,
    ) -> ProviderFuture<'a, Result<Vec<GeneratedImage>, ProviderError>>;
}
