//! Process configuration read from the environment.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use dprovider::SecretString;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_LOCATION: &str = "us-central1";
pub const DEFAULT_COMIC_MODEL: &str = "gemini-2.0-flash-exp";
pub const DEFAULT_COMPANION_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "imagen-3.0-generate-002";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub key: String,
    pub message: String,
}

impl ConfigError {
    fn new(key: &str, message: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.key, self.message)
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct DreamscapeConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    pub google_ai_api_key: Option<SecretString>,
    pub google_cloud_access_token: Option<SecretString>,
    pub project_id: Option<String>,
    pub location: String,
    pub comic_model: String,
    pub companion_model: String,
    pub image_model: String,
}

impl Default for DreamscapeConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            google_ai_api_key: None,
            google_cloud_access_token: None,
            project_id: None,
            location: DEFAULT_LOCATION.to_string(),
            comic_model: DEFAULT_COMIC_MODEL.to_string(),
            companion_model: DEFAULT_COMPANION_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
        }
    }
}

impl DreamscapeConfig {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick
    /// up a local `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let port = match get("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|err| ConfigError::new("PORT", format!("invalid port '{raw}': {err}")))?,
            None => defaults.port,
        };

        let bind_addr = match get("BIND_ADDR") {
            Some(raw) => raw.parse::<IpAddr>().map_err(|err| {
                ConfigError::new("BIND_ADDR", format!("invalid address '{raw}': {err}"))
            })?,
            None => defaults.bind_addr,
        };

        let config = Self {
            bind_addr,
            port,
            google_ai_api_key: get("GOOGLE_AI_API_KEY").map(SecretString::new),
            google_cloud_access_token: get("GOOGLE_CLOUD_ACCESS_TOKEN").map(SecretString::new),
            project_id: get("GOOGLE_CLOUD_PROJECT_ID"),
            location: get("GOOGLE_CLOUD_LOCATION").unwrap_or(defaults.location),
            comic_model: get("COMIC_MODEL").unwrap_or(defaults.comic_model),
            companion_model: get("COMPANION_MODEL").unwrap_or(defaults.companion_model),
            image_model: get("IMAGE_MODEL").unwrap_or(defaults.image_model),
        };

        if config.google_cloud_access_token.is_some() && config.project_id.is_none() {
            return Err(ConfigError::new(
                "GOOGLE_CLOUD_PROJECT_ID",
                "required when GOOGLE_CLOUD_ACCESS_TOKEN is set",
            ));
        }

        Ok(config)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    /// Vertex AI endpoints are used when both a bearer token and a project
    /// are configured.
    pub fn vertex_enabled(&self) -> bool {
        self.google_cloud_access_token.is_some() && self.project_id.is_some()
    }
}
