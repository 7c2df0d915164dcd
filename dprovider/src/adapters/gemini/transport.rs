//! Gemini transport trait and reqwest-based HTTP implementation.

use async_stream::try_stream;
use dcommon::LineSplitter;
use futures_util::StreamExt;
use reqwest::Client;

use crate::adapters::http::{GoogleAuth, map_send_error, parse_error};
use crate::{ChunkStream, GenerateRequest, GenerateResponse, ProviderError, ProviderFuture};

use super::serde_api::{ApiGenerateResponse, build_api_request, chunk_from_api, response_from_api};

pub const GENERATIVE_LANGUAGE_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub trait GeminiTransport: Send + Sync + std::fmt::Debug {
    fn generate<'a>(
        &'a self,
        request: GenerateRequest,
        auth: GoogleAuth,
    ) -> ProviderFuture<'a, Result<GenerateResponse, ProviderError>>;

    fn stream_generate<'a>(
        &'a self,
        request: GenerateRequest,
        auth: GoogleAuth,
    ) -> ProviderFuture<'a, Result<ChunkStream<'a>, ProviderError>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeminiEndpoint {
    GenerativeLanguage { base_url: String },
    VertexAi { project: String, location: String },
}

impl GeminiEndpoint {
    pub fn generative_language() -> Self {
        Self::GenerativeLanguage {
            base_url: GENERATIVE_LANGUAGE_BASE_URL.to_string(),
        }
    }

    pub fn vertex_ai(project: impl Into<String>, location: impl Into<String>) -> Self {
        Self::VertexAi {
            project: project.into(),
            location: location.into(),
        }
    }

    pub fn model_url(&self, model: &str, method: &str) -> String {
        match self {
            Self::GenerativeLanguage { base_url } => format!(
                "{}/models/{model}:{method}",
                base_url.trim_end_matches('/')
            ),
            Self::VertexAi { project, location } => format!(
                "https://{location}-aiplatform.googleapis.com/v1/projects/{project}/locations/{location}/publishers/google/models/{model}:{method}"
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeminiHttpTransport {
    client: Client,
    endpoint: GeminiEndpoint,
}

impl GeminiHttpTransport {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            endpoint: GeminiEndpoint::generative_language(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: GeminiEndpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    pub fn endpoint(&self) -> &GeminiEndpoint {
        &self.endpoint
    }
}

impl GeminiTransport for GeminiHttpTransport {
    fn generate<'a>(
        &'a self,
        request: GenerateRequest,
        auth: GoogleAuth,
    ) -> ProviderFuture<'a, Result<GenerateResponse, ProviderError>> {
        Box::pin(async move {
            let model = request.model.clone();
            let url = self.endpoint.model_url(&model, "generateContent");
            let api_request = build_api_request(request)?;
            let builder = self.client.post(url).json(&api_request);
            let response = auth.apply(builder).send().await.map_err(map_send_error)?;

            if !response.status().is_success() {
                return Err(parse_error(response, "Gemini").await);
            }

            let parsed: ApiGenerateResponse = response
                .json()
                .await
                .map_err(|err| ProviderError::malformed_response(err.to_string()))?;

            response_from_api(parsed, model)
        })
    }

    fn stream_generate<'a>(
        &'a self,
        request: GenerateRequest,
        auth: GoogleAuth,
    ) -> ProviderFuture<'a, Result<ChunkStream<'a>, ProviderError>> {
        Box::pin(async move {
            let url = format!(
                "{}?alt=sse",
                self.endpoint.model_url(&request.model, "streamGenerateContent")
            );
            let api_request = build_api_request(request)?;
            let builder = self.client.post(url).json(&api_request);
            let response = auth.apply(builder).send().await.map_err(map_send_error)?;

            if !response.status().is_success() {
                return Err(parse_error(response, "Gemini").await);
            }

            let stream = try_stream! {
                let mut bytes = response.bytes_stream();
                let mut lines = SseLineBuffer::default();

                while let Some(item) = bytes.next().await {
                    let item = item.map_err(|err| ProviderError::transport(err.to_string()))?;
                    for payload in lines.push(&item)? {
                        let parsed: ApiGenerateResponse = serde_json::from_str(&payload)
                            .map_err(|err| ProviderError::malformed_response(err.to_string()))?;
                        yield chunk_from_api(parsed);
                    }
                }

                if let Some(payload) = lines.finish()? {
                    let parsed: ApiGenerateResponse = serde_json::from_str(&payload)
                        .map_err(|err| ProviderError::malformed_response(err.to_string()))?;
                    yield chunk_from_api(parsed);
                }
            };

            Ok(Box::pin(stream) as ChunkStream<'a>)
        })
    }
}

/// Splits an upstream `text/event-stream` body into `data:` payloads.
///
/// Bytes are buffered until a full line is available, so chunk boundaries may
/// fall anywhere, including inside a multi-byte character.
#[derive(Debug, Default)]
pub struct SseLineBuffer {
    lines: LineSplitter,
}

impl SseLineBuffer {
    pub fn push(&mut self, bytes: &[u8]) -> Result<Vec<String>, ProviderError> {
        let mut payloads = Vec::new();
        for line in self.lines.push(bytes) {
            if let Some(payload) = data_payload(&line)? {
                payloads.push(payload);
            }
        }

        Ok(payloads)
    }

    /// Flushes a trailing `data:` line that was not newline-terminated.
    pub fn finish(&mut self) -> Result<Option<String>, ProviderError> {
        match self.lines.finish() {
            Some(line) => data_payload(&line),
            None => Ok(None),
        }
    }
}

fn data_payload(line: &[u8]) -> Result<Option<String>, ProviderError> {
    let line = std::str::from_utf8(line)
        .map_err(|err| ProviderError::malformed_response(err.to_string()))?
        .trim();

    let Some(payload) = line.strip_prefix("data:") else {
        return Ok(None);
    };

    let payload = payload.trim();
    if payload.is_empty() || payload == "[DONE]" {
        return Ok(None);
    }

    Ok(Some(payload.to_string()))
}
