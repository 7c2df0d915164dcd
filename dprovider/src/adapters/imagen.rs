//! Vertex AI Imagen prediction client.

use std::sync::Arc;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::adapters::http::{map_send_error, parse_error, resolve_google_auth};
use crate::{
    GeneratedImage, ImageGenerator, ImageRequest, ProviderError, ProviderFuture, ProviderId,
    SecureCredentialManager,
};

pub const DEFAULT_IMAGE_MIME_TYPE: &str = "image/png";

#[derive(Clone)]
pub struct ImagenHttpClient {
    client: Client,
    credentials: Arc<SecureCredentialManager>,
    project: String,
    location: String,
    model: String,
}

impl ImagenHttpClient {
    pub fn new(
        client: Client,
        credentials: Arc<SecureCredentialManager>,
        project: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            client,
            credentials,
            project: project.into(),
            location: location.into(),
            model: "imagen-3.0-generate-002".to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn predict_url(&self) -> String {
        format!(
            "https://{location}-aiplatform.googleapis.com/v1/projects/{project}/locations/{location}/publishers/google/models/{model}:predict",
            location = self.location,
            project = self.project,
            model = self.model,
        )
    }
}

impl ImageGenerator for ImagenHttpClient {
    fn generate_images<'a>(
        &'a self,
        request: ImageRequest,
    ) -> ProviderFuture<'a, Result<Vec<GeneratedImage>, ProviderError>> {
        Box::pin(async move {
            request.validate()?;
            let auth = resolve_google_auth(&self.credentials, ProviderId::VertexAi)?;

            tracing::info!(
                phase = "imagen",
                event = "predict_start",
                model = %self.model,
                sample_count = request.sample_count
            );

            let builder = self
                .client
                .post(self.predict_url())
                .json(&ApiPredictRequest::from(request));
            let response = auth.apply(builder).send().await.map_err(map_send_error)?;

            if !response.status().is_success() {
                return Err(parse_error(response, "Imagen").await);
            }

            let parsed: ApiPredictResponse = response
                .json()
                .await
                .map_err(|err| ProviderError::malformed_response(err.to_string()))?;

            let images = images_from_predictions(parsed)?;
            tracing::info!(
                phase = "imagen",
                event = "predict_success",
                images = images.len()
            );
            Ok(images)
        })
    }
}

pub(crate) fn images_from_predictions(
    response: ApiPredictResponse,
) -> Result<Vec<GeneratedImage>, ProviderError> {
    if response.predictions.is_empty() {
        return Err(ProviderError::malformed_response(
            "Image generation failed, no predictions returned.",
        ));
    }

    let images = response
        .predictions
        .into_iter()
        .enumerate()
        .filter_map(|(index, prediction)| {
            let Some(data) = prediction.bytes_base64_encoded.filter(|data| !data.is_empty()) else {
                tracing::warn!(
                    phase = "imagen",
                    event = "prediction_missing_bytes",
                    index
                );
                return None;
            };

            Some(GeneratedImage {
                base64_data: data,
                mime_type: prediction
                    .mime_type
                    .filter(|mime| !mime.is_empty())
                    .unwrap_or_else(|| DEFAULT_IMAGE_MIME_TYPE.to_string()),
            })
        })
        .collect::<Vec<_>>();

    if images.is_empty() {
        return Err(ProviderError::malformed_response(
            "Image generation failed, could not extract image data.",
        ));
    }

    Ok(images)
}

#[derive(Debug, Serialize)]
pub(crate) struct ApiPredictRequest {
    pub instances: Vec<ApiPredictInstance>,
    pub parameters: ApiPredictParameters,
}

impl From<ImageRequest> for ApiPredictRequest {
    fn from(value: ImageRequest) -> Self {
        Self {
            instances: vec![ApiPredictInstance {
                prompt: value.prompt,
            }],
            parameters: ApiPredictParameters {
                sample_count: value.sample_count,
                aspect_ratio: value.aspect_ratio,
                negative_prompt: value.negative_prompt.filter(|prompt| !prompt.trim().is_empty()),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ApiPredictInstance {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiPredictParameters {
    pub sample_count: u32,
    pub aspect_ratio: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiPredictResponse {
    #[serde(default)]
    pub predictions: Vec<ApiPrediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiPrediction {
    #[serde(default)]
    pub bytes_base64_encoded: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
}
