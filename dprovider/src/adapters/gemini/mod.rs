mod provider;
mod serde_api;
mod transport;

pub use super::http::GoogleAuth;
pub use provider::GeminiProvider;
pub use transport::{GeminiEndpoint, GeminiHttpTransport, GeminiTransport, SseLineBuffer};
