//! Service wiring: explicitly constructed handles shared by the HTTP routes.

use std::sync::Arc;

use dcomic::ComicProducer;
use dcompanion::{CompanionService, ConversationStore, InMemoryConversationStore};
use dprovider::{GenerativeModel, ImageGenerator, ProviderError};

use crate::DreamscapeConfig;
use crate::providers::{
    DEFAULT_CONNECT_TIMEOUT, build_comic_model, build_companion_model, build_http_client,
    build_image_generator, credentials_from_config,
};

#[derive(Clone)]
pub struct AppServices {
    pub comic: Arc<ComicProducer>,
    pub companion: Arc<CompanionService>,
    pub images: Option<Arc<dyn ImageGenerator>>,
}

impl AppServices {
    pub fn new(
        comic: ComicProducer,
        companion: CompanionService,
        images: Option<Arc<dyn ImageGenerator>>,
    ) -> Self {
        Self {
            comic: Arc::new(comic),
            companion: Arc::new(companion),
            images,
        }
    }
}

pub fn in_memory_store() -> Arc<dyn ConversationStore> {
    Arc::new(InMemoryConversationStore::new())
}

/// Wires services over the given models, with an in-memory conversation store.
pub fn build_services_with(
    config: &DreamscapeConfig,
    comic_model: Arc<dyn GenerativeModel>,
    companion_model: Arc<dyn GenerativeModel>,
    images: Option<Arc<dyn ImageGenerator>>,
) -> AppServices {
    let comic = ComicProducer::new(comic_model, config.comic_model.clone());
    let companion = CompanionService::new(
        companion_model,
        in_memory_store(),
        config.companion_model.clone(),
    );

    AppServices::new(comic, companion, images)
}

pub fn build_services(config: &DreamscapeConfig) -> Result<AppServices, ProviderError> {
    let http = build_http_client(DEFAULT_CONNECT_TIMEOUT)?;
    let credentials = credentials_from_config(config)?;

    if config.google_ai_api_key.is_none() && !config.vertex_enabled() {
        tracing::warn!(
            phase = "startup",
            event = "credentials_missing",
            "No Google credentials configured; generation requests will fail"
        );
    }

    let comic_model = build_comic_model(config, credentials.clone(), http.clone())?;
    let companion_model = build_companion_model(credentials.clone(), http.clone())?;
    let images = build_image_generator(config, credentials, http)?;

    tracing::info!(
        phase = "startup",
        event = "services_ready",
        comic_provider = %comic_model.id(),
        comic_model = %config.comic_model,
        companion_model = %config.companion_model,
        images = images.is_some(),
        "Services wired"
    );

    Ok(build_services_with(config, comic_model, companion_model, images))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(all(feature = "provider-gemini", feature = "provider-imagen"))]
    #[test]
    fn build_services_wires_configured_models() {
        let config = DreamscapeConfig {
            comic_model: "comic-model".to_string(),
            project_id: Some("dreams".to_string()),
            ..DreamscapeConfig::default()
        };

        let services = build_services(&config).expect("services should build");

        assert_eq!(services.comic.model_name(), "comic-model");
        assert!(services.images.is_some());
    }
}
