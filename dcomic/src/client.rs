//! HTTP consumer for the comic generation endpoint.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{ComicError, SlideStream, consume_slides};

#[derive(Debug, Clone)]
pub struct ComicClient {
    client: Client,
    endpoint: String,
}

impl ComicClient {
    /// `endpoint` is the full URL of the generation route, e.g.
    /// `http://localhost:3000/api/generate-comic`.
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Submits a prompt and streams back slides as each pair completes.
    ///
    /// A non-success status is returned as `Err` before any body is read.
    pub async fn generate(&self, prompt: &str) -> Result<SlideStream<'static>, ComicError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ComicRequestBody { prompt })
            .send()
            .await
            .map_err(|err| ComicError::transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_body(status.as_u16(), &body));
        }

        tracing::debug!(
            phase = "consume",
            event = "stream_open",
            endpoint = %self.endpoint,
            "Comic stream accepted"
        );

        Ok(consume_slides(response.bytes_stream()))
    }
}

#[derive(Debug, Serialize)]
struct ComicRequestBody<'a> {
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

fn error_from_body(status: u16, body: &str) -> ComicError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| format!("API request failed with status {status}"));

    ComicError::http(status, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ComicErrorKind;

    #[test]
    fn server_supplied_error_message_is_surfaced() {
        let err = error_from_body(400, r#"{"error":"Prompt is required"}"#);

        assert_eq!(err.kind, ComicErrorKind::Http);
        assert_eq!(err.status, Some(400));
        assert_eq!(err.message, "Prompt is required");
    }

    #[test]
    fn unparseable_body_falls_back_to_generic_message() {
        let err = error_from_body(502, "<html>bad gateway</html>");
        assert_eq!(err.message, "API request failed with status 502");

        let err = error_from_body(500, r#"{"detail":"x"}"#);
        assert_eq!(err.message, "API request failed with status 500");
    }

    #[test]
    fn request_body_serializes_prompt() {
        let body = serde_json::to_string(&ComicRequestBody { prompt: "routers" })
            .expect("body serializes");
        assert_eq!(body, r#"{"prompt":"routers"}"#);
    }
}
