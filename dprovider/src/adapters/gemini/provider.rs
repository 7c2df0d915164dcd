//! Gemini model implementation over a transport and stored credentials.

use std::sync::Arc;

use async_stream::try_stream;
use futures_util::StreamExt;

use crate::adapters::http::resolve_google_auth;
use crate::{
    ChunkStream, GenerateRequest, GenerateResponse, GenerativeModel, ProviderError, ProviderFuture,
    ProviderId, SecureCredentialManager,
};

use super::transport::GeminiTransport;

#[derive(Clone)]
pub struct GeminiProvider {
    id: ProviderId,
    credentials: Arc<SecureCredentialManager>,
    transport: Arc<dyn GeminiTransport>,
    fallback_model: String,
}

impl GeminiProvider {
    pub fn new(
        credentials: Arc<SecureCredentialManager>,
        transport: Arc<dyn GeminiTransport>,
    ) -> Self {
        Self {
            id: ProviderId::Gemini,
            credentials,
            transport,
            fallback_model: "gemini-2.0-flash-exp".to_string(),
        }
    }

    /// Selects which stored credential authenticates requests.
    pub fn with_provider_id(mut self, id: ProviderId) -> Self {
        self.id = id;
        self
    }

    pub fn with_fallback_model(mut self, model: impl Into<String>) -> Self {
        self.fallback_model = model.into();
        self
    }

    pub(crate) fn resolve_model(&self, mut request: GenerateRequest) -> GenerateRequest {
        if request.model.trim().is_empty() {
            request.model = self.fallback_model.clone();
        }

        request
    }
}

impl GenerativeModel for GeminiProvider {
    fn id(&self) -> ProviderId {
        self.id
    }

    fn generate<'a>(
        &'a self,
        request: GenerateRequest,
    ) -> ProviderFuture<'a, Result<GenerateResponse, ProviderError>> {
        Box::pin(async move {
            request.validate()?;
            let auth = resolve_google_auth(&self.credentials, self.id)?;
            let request = self.resolve_model(request);
            self.transport.generate(request, auth).await
        })
    }

    fn stream_generate<'a>(
        &'a self,
        request: GenerateRequest,
    ) -> ProviderFuture<'a, Result<ChunkStream<'a>, ProviderError>> {
        Box::pin(async move {
            request.validate()?;
            let auth = resolve_google_auth(&self.credentials, self.id)?;
            let request = self.resolve_model(request);
            let mut chunks = self.transport.stream_generate(request, auth).await?;

            let stream = try_stream! {
                while let Some(chunk) = chunks.next().await {
                    let chunk = chunk?;
                    if !chunk.parts.is_empty() {
                        yield chunk;
                    }
                }
            };

            Ok(Box::pin(stream) as ChunkStream<'a>)
        })
    }
}
