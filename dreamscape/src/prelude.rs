//! Common imports for applications embedding the dreamscape services.

pub use crate::{
    AppServices, ComicConsumer, ComicError, ComicProducer, CompanionService, DreamscapeConfig,
    GenerativeModel, ImageGenerator, Playlist, ProviderError, SessionId, Slide, StreamFrame,
    build_router, build_services,
};
