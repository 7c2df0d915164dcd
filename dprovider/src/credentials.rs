//! In-memory credential handling for Google generative endpoints.
//!
//! ```rust
//! use dprovider::{CredentialKind, ProviderId, SecureCredentialManager};
//!
//! let credentials = SecureCredentialManager::new();
//! credentials.set_api_key(ProviderId::Gemini, "AIza-test").expect("key should store");
//!
//! assert_eq!(
//!     credentials.credential_kind(ProviderId::Gemini).expect("lock"),
//!     Some(CredentialKind::ApiKey)
//! );
//! ```

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::SystemTime;

use crate::{ProviderError, ProviderId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    ApiKey,
    AccessToken,
}

#[derive(PartialEq, Eq)]
pub struct SecretString {
    value: String,
}

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn expose(&self) -> &str {
        self.value.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }
}

impl Clone for SecretString {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Drop for SecretString {
    fn drop(&mut self) {
        // SAFETY: zero bytes are valid UTF-8 and the string is never read again.
        unsafe {
            self.value.as_mut_vec().fill(0);
        }
    }
}

pub enum ProviderCredential {
    ApiKey(SecretString),
    AccessToken {
        token: SecretString,
        expires_at: Option<SystemTime>,
    },
}

impl ProviderCredential {
    pub fn kind(&self) -> CredentialKind {
        match self {
            Self::ApiKey(_) => CredentialKind::ApiKey,
            Self::AccessToken { .. } => CredentialKind::AccessToken,
        }
    }

    pub fn is_expired_at(&self, now: SystemTime) -> bool {
        match self {
            Self::ApiKey(_) => false,
            Self::AccessToken { expires_at, .. } => {
                expires_at.is_some_and(|expires_at| expires_at <= now)
            }
        }
    }
}

impl std::fmt::Debug for ProviderCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiKey(_) => f.write_str("ProviderCredential::ApiKey([REDACTED])"),
            Self::AccessToken { expires_at, .. } => f
                .debug_struct("ProviderCredential::AccessToken")
                .field("token", &"[REDACTED]")
                .field("expires_at", expires_at)
                .finish(),
        }
    }
}

#[derive(Default)]
pub struct SecureCredentialManager {
    credentials: Mutex<HashMap<ProviderId, ProviderCredential>>,
}

impl SecureCredentialManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_api_key(
        &self,
        provider: ProviderId,
        api_key: impl Into<String>,
    ) -> Result<(), ProviderError> {
        let api_key = SecretString::new(api_key);
        if api_key.is_empty() {
            return Err(ProviderError::authentication("api key must not be empty"));
        }

        self.credentials()?
            .insert(provider, ProviderCredential::ApiKey(api_key));
        Ok(())
    }

    pub fn set_access_token(
        &self,
        provider: ProviderId,
        token: impl Into<String>,
        expires_at: Option<SystemTime>,
    ) -> Result<(), ProviderError> {
        let token = SecretString::new(token);
        if token.is_empty() {
            return Err(ProviderError::authentication(
                "access token must not be empty",
            ));
        }

        self.credentials()?
            .insert(provider, ProviderCredential::AccessToken { token, expires_at });
        Ok(())
    }

    pub fn has_credentials(&self, provider: ProviderId) -> Result<bool, ProviderError> {
        Ok(self.credentials()?.contains_key(&provider))
    }

    pub fn credential_kind(
        &self,
        provider: ProviderId,
    ) -> Result<Option<CredentialKind>, ProviderError> {
        Ok(self.credentials()?.get(&provider).map(ProviderCredential::kind))
    }

    pub fn with_credential<R>(
        &self,
        provider: ProviderId,
        f: impl FnOnce(&ProviderCredential) -> R,
    ) -> Result<Option<R>, ProviderError> {
        Ok(self.credentials()?.get(&provider).map(f))
    }

    pub fn clear(&self, provider: ProviderId) -> Result<bool, ProviderError> {
        Ok(self.credentials()?.remove(&provider).is_some())
    }

    fn credentials(
        &self,
    ) -> Result<MutexGuard<'_, HashMap<ProviderId, ProviderCredential>>, ProviderError> {
        self.credentials
            .lock()
            .map_err(|_| ProviderError::other("credential manager lock poisoned"))
    }
}
