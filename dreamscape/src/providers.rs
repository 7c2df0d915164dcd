//! Provider construction from configuration.

use std::sync::Arc;
use std::time::Duration;

use dprovider::{GenerativeModel, ImageGenerator, ProviderError, ProviderId, SecureCredentialManager};
use reqwest::Client;

use crate::DreamscapeConfig;

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Only connection setup is bounded. Comic generations stream their body for
/// as long as the model keeps producing, so no total request timeout is set.
pub fn build_http_client(connect_timeout: Duration) -> Result<Client, ProviderError> {
    Client::builder()
        .connect_timeout(connect_timeout)
        .build()
        .map_err(|err| ProviderError::transport(err.to_string()))
}

/// Credentials for every provider the config names. Missing values are not an
/// error here; requests fail with an authentication error instead.
pub fn credentials_from_config(
    config: &DreamscapeConfig,
) -> Result<Arc<SecureCredentialManager>, ProviderError> {
    let credentials = Arc::new(SecureCredentialManager::new());

    if let Some(key) = &config.google_ai_api_key {
        credentials.set_api_key(ProviderId::Gemini, key.expose())?;
    }

    if let Some(token) = &config.google_cloud_access_token {
        credentials.set_access_token(ProviderId::VertexAi, token.expose(), None)?;
    }

    Ok(credentials)
}

/// Streaming model for comics: Vertex AI when configured, otherwise the
/// public Generative Language API.
pub fn build_comic_model(
    config: &DreamscapeConfig,
    credentials: Arc<SecureCredentialManager>,
    http: Client,
) -> Result<Arc<dyn GenerativeModel>, ProviderError> {
    let vertex = match &config.project_id {
        Some(project) if config.vertex_enabled() => Some((project, &config.location)),
        _ => None,
    };
    build_gemini_model(credentials, http, vertex)
}

pub fn build_companion_model(
    credentials: Arc<SecureCredentialManager>,
    http: Client,
) -> Result<Arc<dyn GenerativeModel>, ProviderError> {
    build_gemini_model(credentials, http, None)
}

#[cfg(feature = "provider-gemini")]
fn build_gemini_model(
    credentials: Arc<SecureCredentialManager>,
    http: Client,
    vertex: Option<(&String, &String)>,
) -> Result<Arc<dyn GenerativeModel>, ProviderError> {
    use dprovider::adapters::gemini::{GeminiEndpoint, GeminiHttpTransport, GeminiProvider};

    let provider = match vertex {
        Some((project, location)) => {
            let transport = GeminiHttpTransport::new(http)
                .with_endpoint(GeminiEndpoint::vertex_ai(project.as_str(), location.as_str()));
            GeminiProvider::new(credentials, Arc::new(transport))
                .with_provider_id(ProviderId::VertexAi)
        }
        None => GeminiProvider::new(credentials, Arc::new(GeminiHttpTransport::new(http))),
    };

    Ok(Arc::new(provider))
}

#[cfg(not(feature = "provider-gemini"))]
fn build_gemini_model(
    _credentials: Arc<SecureCredentialManager>,
    _http: Client,
    _vertex: Option<(&String, &String)>,
) -> Result<Arc<dyn GenerativeModel>, ProviderError> {
    Err(ProviderError::invalid_request(
        "provider-gemini feature is not enabled on dreamscape",
    ))
}

/// `None` when no Google Cloud project is configured.
#[cfg(feature = "provider-imagen")]
pub fn build_image_generator(
    config: &DreamscapeConfig,
    credentials: Arc<SecureCredentialManager>,
    http: Client,
) -> Result<Option<Arc<dyn ImageGenerator>>, ProviderError> {
    use dprovider::adapters::imagen::ImagenHttpClient;

    let Some(project) = &config.project_id else {
        return Ok(None);
    };

    let client = ImagenHttpClient::new(http, credentials, project.clone(), config.location.clone())
        .with_model(config.image_model.clone());
    Ok(Some(Arc::new(client)))
}

#[cfg(not(feature = "provider-imagen"))]
pub fn build_image_generator(
    _config: &DreamscapeConfig,
    _credentials: Arc<SecureCredentialManager>,
    _http: Client,
) -> Result<Option<Arc<dyn ImageGenerator>>, ProviderError> {
    Ok(None)
}
