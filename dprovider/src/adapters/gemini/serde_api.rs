//! Gemini `generateContent` wire payloads and conversion helpers.

use serde::{Deserialize, Serialize};

use crate::{
    Content, GenerateChunk, GenerateRequest, GenerateResponse, GenerationOptions, InlineData, Part,
    ProviderError,
};

pub(crate) fn build_api_request(request: GenerateRequest) -> Result<ApiGenerateRequest, ProviderError> {
    request.validate()?;

    let contents = request
        .contents
        .into_iter()
        .map(ApiContent::from)
        .collect::<Vec<_>>();

    let system_instruction = request.system_instruction.map(|text| ApiContent {
        role: None,
        parts: vec![ApiPart::text(text)],
    });

    let generation_config = if request.options.is_empty() {
        None
    } else {
        Some(ApiGenerationConfig::from(request.options))
    };

    Ok(ApiGenerateRequest {
        contents,
        system_instruction,
        generation_config,
    })
}

/// Keeps parts carrying non-empty text or a complete inline blob, drops the rest.
pub(crate) fn parts_from_api(parts: Vec<ApiPart>) -> Vec<Part> {
    parts
        .into_iter()
        .filter_map(|part| {
            if let Some(text) = part.text.filter(|text| !text.is_empty()) {
                return Some(Part::Text(text));
            }

            let inline = part.inline_data?;
            if inline.data.is_empty() || inline.mime_type.is_empty() {
                return None;
            }

            Some(Part::InlineData(InlineData {
                mime_type: inline.mime_type,
                data: inline.data,
            }))
        })
        .collect()
}

pub(crate) fn chunk_from_api(response: ApiGenerateResponse) -> GenerateChunk {
    let parts = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| parts_from_api(content.parts))
        .unwrap_or_default();

    GenerateChunk::new(parts)
}

pub(crate) fn response_from_api(
    response: ApiGenerateResponse,
    requested_model: String,
) -> Result<GenerateResponse, ProviderError> {
    let model = response.model_version.unwrap_or(requested_model);
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::malformed_response("Gemini response did not include candidates"))?;

    Ok(GenerateResponse {
        model,
        parts: candidate
            .content
            .map(|content| parts_from_api(content.parts))
            .unwrap_or_default(),
        finish_reason: candidate.finish_reason,
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiGenerateRequest {
    pub contents: Vec<ApiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<ApiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<ApiGenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ApiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<ApiPart>,
}

impl From<Content> for ApiContent {
    fn from(value: Content) -> Self {
        Self {
            role: Some(value.role.as_str().to_string()),
            parts: value.parts.into_iter().map(ApiPart::from).collect(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<ApiInlineData>,
}

impl ApiPart {
    fn text(text: String) -> Self {
        Self {
            text: Some(text),
            inline_data: None,
        }
    }
}

impl From<Part> for ApiPart {
    fn from(value: Part) -> Self {
        match value {
            Part::Text(text) => Self::text(text),
            Part::InlineData(inline) => Self {
                text: None,
                inline_data: Some(ApiInlineData {
                    mime_type: inline.mime_type,
                    data: inline.data,
                }),
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiInlineData {
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

impl From<GenerationOptions> for ApiGenerationConfig {
    fn from(value: GenerationOptions) -> Self {
        Self {
            temperature: value.temperature,
            top_k: value.top_k,
            top_p: value.top_p,
            max_output_tokens: value.max_output_tokens,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiGenerateResponse {
    #[serde(default)]
    pub candidates: Vec<ApiCandidate>,
    #[serde(default)]
    pub model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiCandidate {
    #[serde(default)]
    pub content: Option<ApiContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}
