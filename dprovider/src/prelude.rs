//! Common `dprovider` imports for downstream crates.

pub use crate::{
    ChunkStream, Content, GenerateChunk, GenerateRequest, GenerateResponse, GeneratedImage,
    GenerativeModel, ImageGenerator, ImageRequest, InlineData, Part, ProviderError,
    ProviderErrorKind, ProviderFuture, ProviderId, Role, SecureCredentialManager,
};
pub use dcommon::{BoxFuture, GenerationOptions};
