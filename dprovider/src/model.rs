//! Request, response, and content types shared by every generative backend.
//!
//! ```rust
//! use dprovider::{Content, GenerateRequest, ProviderErrorKind};
//!
//! let ok = GenerateRequest::new("gemini-2.0-flash-exp", vec![Content::user("a lighthouse dream")]);
//! assert!(ok.validate().is_ok());
//!
//! let err = GenerateRequest::new("gemini-2.0-flash-exp", Vec::new())
//!     .validate()
//!     .expect_err("empty contents should fail");
//! assert_eq!(err.kind, ProviderErrorKind::InvalidRequest);
//! ```

use std::fmt::{Display, Formatter};

use dcommon::GenerationOptions;

use crate::ProviderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    /// Public Generative Language API, authenticated with an API key.
    Gemini,
    /// Vertex AI publisher models, authenticated with an OAuth access token.
    VertexAi,
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let id = match self {
            Self::Gemini => "gemini",
            Self::VertexAi => "vertex-ai",
        };

        f.write_str(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "model",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineData {
    pub mime_type: String,
    /// Base64 payload exactly as the model produced it.
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Text(String),
    InlineData(InlineData),
}

impl Part {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn inline_data(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self::InlineData(InlineData {
            mime_type: mime_type.into(),
            data: data.into(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn new(role: Role, parts: Vec<Part>) -> Self {
        Self { role, parts }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, vec![Part::text(text)])
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::new(Role::Model, vec![Part::text(text)])
    }

    /// Concatenation of every text part, in order.
    pub fn text(&self) -> String {
        collect_text(&self.parts)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub model: String,
    pub contents: Vec<Content>,
    pub system_instruction: Option<String>,
    pub options: GenerationOptions,
}

impl GenerateRequest {
    pub fn new(model: impl Into<String>, contents: Vec<Content>) -> Self {
        Self {
            model: model.into(),
            contents,
            system_instruction: None,
            options: GenerationOptions::default(),
        }
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.contents.is_empty() {
            return Err(ProviderError::invalid_request(
                "at least one content entry is required",
            ));
        }

        if self.contents.iter().all(|content| content.parts.is_empty()) {
            return Err(ProviderError::invalid_request(
                "request contents must carry at least one part",
            ));
        }

        if let Some(temperature) = self.options.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(ProviderError::invalid_request(
                    "temperature must be in the inclusive range 0.0..=2.0",
                ));
            }
        }

        if let Some(top_p) = self.options.top_p {
            if !(0.0..=1.0).contains(&top_p) {
                return Err(ProviderError::invalid_request(
                    "top_p must be in the inclusive range 0.0..=1.0",
                ));
            }
        }

        if self.options.max_output_tokens == Some(0) {
            return Err(ProviderError::invalid_request(
                "max_output_tokens must be greater than zero",
            ));
        }

        Ok(())
    }
}

/// One unit yielded by an upstream streaming generation call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerateChunk {
    pub parts: Vec<Part>,
}

impl GenerateChunk {
    pub fn new(parts: Vec<Part>) -> Self {
        Self { parts }
    }

    pub fn text(&self) -> String {
        collect_text(&self.parts)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateResponse {
    pub model: String,
    pub parts: Vec<Part>,
    pub finish_reason: Option<String>,
}

impl GenerateResponse {
    pub fn text(&self) -> String {
        collect_text(&self.parts)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    pub prompt: String,
    pub negative_prompt: Option<String>,
    pub aspect_ratio: String,
    pub sample_count: u32,
}

impl ImageRequest {
    pub const MAX_SAMPLES: u32 = 8;

    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            negative_prompt: None,
            aspect_ratio: "1:1".to_string(),
            sample_count: 1,
        }
    }

    pub fn with_negative_prompt(mut self, negative_prompt: impl Into<String>) -> Self {
        self.negative_prompt = Some(negative_prompt.into());
        self
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: impl Into<String>) -> Self {
        self.aspect_ratio = aspect_ratio.into();
        self
    }

    pub fn with_sample_count(mut self, sample_count: u32) -> Self {
        self.sample_count = sample_count;
        self
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.prompt.trim().is_empty() {
            return Err(ProviderError::invalid_request("Prompt is required"));
        }

        if !(1..=Self::MAX_SAMPLES).contains(&self.sample_count) {
            return Err(ProviderError::invalid_request(format!(
                "sample_count must be in the inclusive range 1..={}",
                Self::MAX_SAMPLES
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub base64_data: String,
    pub mime_type: String,
}

impl GeneratedImage {
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64_data)
    }
}

fn collect_text(parts: &[Part]) -> String {
    parts
        .iter()
        .filter_map(|part| match part {
            Part::Text(text) => Some(text.as_str()),
            Part::InlineData(_) => None,
        })
        .collect()
}
