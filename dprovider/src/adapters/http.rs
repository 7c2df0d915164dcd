//! HTTP helpers shared by the Google adapters: auth headers, credential
//! resolution, and upstream error classification.

use std::time::SystemTime;

use reqwest::{RequestBuilder, Response};
use serde::Deserialize;

use crate::{ProviderCredential, ProviderError, ProviderId, SecretString, SecureCredentialManager};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoogleAuth {
    ApiKey(SecretString),
    Bearer(SecretString),
}

impl GoogleAuth {
    pub(crate) fn apply(&self, builder: RequestBuilder) -> RequestBuilder {
        match self {
            Self::ApiKey(key) => builder.header("x-goog-api-key", key.expose()),
            Self::Bearer(token) => builder.bearer_auth(token.expose()),
        }
    }
}

pub(crate) fn resolve_google_auth(
    credentials: &SecureCredentialManager,
    provider: ProviderId,
) -> Result<GoogleAuth, ProviderError> {
    let now = SystemTime::now();
    let resolved = credentials.with_credential(provider, |credential| {
        if credential.is_expired_at(now) {
            return Err(ProviderError::authentication(format!(
                "{provider} access token has expired"
            )));
        }

        Ok(match credential {
            ProviderCredential::ApiKey(key) => GoogleAuth::ApiKey(key.clone()),
            ProviderCredential::AccessToken { token, .. } => GoogleAuth::Bearer(token.clone()),
        })
    })?;

    resolved.unwrap_or_else(|| {
        Err(ProviderError::authentication(format!(
            "no credentials configured for {provider}"
        )))
    })
}

pub(crate) fn map_send_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::timeout(err.to_string())
    } else {
        ProviderError::transport(err.to_string())
    }
}

pub(crate) async fn parse_error(response: Response, service: &str) -> ProviderError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = extract_error_message(&body)
        .unwrap_or_else(|| format!("{service} request failed with status {status}"));

    ProviderError::from_status(status.as_u16(), message)
}

pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    let parsed = serde_json::from_str::<GoogleErrorEnvelope>(body).ok()?;
    Some(parsed.error.message)
}

#[derive(Debug, Deserialize)]
struct GoogleErrorEnvelope {
    error: GoogleErrorBody,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::ProviderErrorKind;

    #[test]
    fn extract_error_message_reads_google_envelope() {
        let body = r#"{"error":{"code":400,"message":"API key not valid","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(
            extract_error_message(body).as_deref(),
            Some("API key not valid")
        );
        assert_eq!(extract_error_message("<html>oops</html>"), None);
    }

    #[test]
    fn resolve_google_auth_requires_fresh_credentials() {
        let credentials = SecureCredentialManager::new();
        let missing = resolve_google_auth(&credentials, ProviderId::Gemini)
            .expect_err("missing credentials must fail");
        assert_eq!(missing.kind, ProviderErrorKind::Authentication);

        credentials
            .set_api_key(ProviderId::Gemini, "AIza-key")
            .expect("key should store");
        let auth = resolve_google_auth(&credentials, ProviderId::Gemini).expect("auth");
        assert_eq!(auth, GoogleAuth::ApiKey(SecretString::new("AIza-key")));

        credentials
            .set_access_token(
                ProviderId::VertexAi,
                "ya29.old",
                Some(SystemTime::now() - Duration::from_secs(5)),
            )
            .expect("token should store");
        let expired = resolve_google_auth(&credentials, ProviderId::VertexAi)
            .expect_err("expired token must fail");
        assert!(expired.message.contains("expired"));
    }
}
