//! Facade over the dreamscape workspace crates.
//!
//! Re-exports the comic, companion, audio and provider crates and adds
//! configuration, service wiring and the HTTP server used by the `dreamscape`
//! binary.

pub mod config;
pub mod prelude;
pub mod providers;
pub mod runtime;
pub mod server;

pub use daudio;
pub use dcomic;
pub use dcommon;
pub use dcompanion;
pub use dprovider;

pub use config::{ConfigError, DreamscapeConfig};
pub use daudio::{NullBackend, PlaybackBackend, PlaybackError, Playlist, Track};
pub use dcomic::{
    ComicConsumer, ComicError, ComicErrorKind, ComicProducer, Slide, SlideExtractor, SseDecoder,
    StreamFrame,
};
pub use dcommon::{BoxFuture, GenerationOptions, SessionId};
pub use dcompanion::{
    CompanionError, CompanionErrorKind, CompanionService, ConversationStore,
    InMemoryConversationStore,
};
pub use dprovider::{
    ChunkStream, Content, GenerateChunk, GenerateRequest, GenerateResponse, GeneratedImage,
    GenerativeModel, ImageGenerator, ImageRequest, Part, ProviderError, ProviderErrorKind,
    ProviderFuture, ProviderId, Role, SecretString, SecureCredentialManager,
};
pub use runtime::{AppServices, build_services, build_services_with, in_memory_store};
pub use server::build_router;

/// Filter applied when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str =
    "dreamscape=info,dcomic=info,dcompanion=info,daudio=info,dprovider=info";

#[cfg(test)]
mod tests {
    use tracing_subscriber::EnvFilter;

    use super::DEFAULT_LOG_FILTER;

    #[test]
    fn default_log_filter_covers_every_workspace_crate() {
        for target in ["dreamscape", "dcomic", "dcompanion", "daudio", "dprovider"] {
            assert!(
                DEFAULT_LOG_FILTER.contains(&format!("{target}=info")),
                "missing {target}"
            );
        }
        assert!(EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
    }
}
