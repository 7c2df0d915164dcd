#[cfg(feature = "provider-gemini")]
pub mod gemini;

#[cfg(feature = "provider-imagen")]
pub mod imagen;

#[cfg(feature = "provider-gemini")]
pub(crate) mod http;
