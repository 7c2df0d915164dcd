//! Generative model boundary: request/response model, credentials, and the
//! Gemini and Imagen HTTP adapters.

mod credentials;
mod error;
mod model;
mod provider;
mod stream;

pub mod adapters;
pub mod prelude;

pub use credentials::{CredentialKind, ProviderCredential, SecretString, SecureCredentialManager};
pub use error::{ProviderError, ProviderErrorKind};
pub use model::{
    Content, GenerateChunk, GenerateRequest, GenerateResponse, GeneratedImage, ImageRequest,
    InlineData, Part, ProviderId, Role,
};
pub use provider::{GenerativeModel, ImageGenerator, ProviderFuture};
pub use stream::{ChunkStream, VecChunkStream};
pub use dcommon::GenerationOptions;
