//! Dream Companion: a persona-driven chat turn over a generative model.

mod error;
mod persona;
mod service;
mod store;

pub mod prelude {
    pub use crate::{
        CompanionError, CompanionErrorKind, CompanionService, ConversationStore,
        InMemoryConversationStore,
    };
    pub use dcommon::SessionId;
}

pub use error::{CompanionError, CompanionErrorKind};
pub use persona::{
    COMPANION_SYSTEM_PROMPT, FALLBACK_REPLY, SEED_MODEL_GREETING, SEED_USER_OPENER,
    companion_options, seed_history,
};
pub use service::CompanionService;
pub use store::{ConversationStore, InMemoryConversationStore};
pub use dcommon::SessionId;
