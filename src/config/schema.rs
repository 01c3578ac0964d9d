//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the verifier.
//! All types derive Serde traits for deserialization from config files.
//! Secrets are not part of the file; they come from [`Credentials`].

use serde::{Deserialize, Serialize};

use crate::config::loader::ConfigError;

/// Environment variable holding the social API bearer token.
pub const TWITTER_BEARER_ENV_VAR: &str = "TWITTER_BEARER";

/// Environment variable holding the document-hosting API token.
pub const GITHUB_TOKEN_ENV_VAR: &str = "GITHUB_AUTHENTICATION";

/// Root configuration for the verifier service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct VerifierConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Edge dispatch settings.
    pub server: ServerConfig,

    /// Social post lookup API.
    pub twitter: TwitterConfig,

    /// Document-hosting API and the verified list location.
    pub github: GithubConfig,

    /// Retry configuration for conflicting list writes.
    pub retries: RetryConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Edge dispatch configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Path prefix the API is mounted under. Everything else is 404.
    pub mount_prefix: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            mount_prefix: "/api".to_string(),
        }
    }
}

/// Social post lookup API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TwitterConfig {
    /// Base URL of the v2 API.
    pub api_base: String,
}

impl Default for TwitterConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.twitter.com".to_string(),
        }
    }
}

/// Document-hosting API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GithubConfig {
    /// Base URL of the REST API.
    pub api_base: String,

    /// Repository owner.
    pub owner: String,

    /// Repository name.
    pub repo: String,

    /// Path of the verified list inside the repository.
    pub path: String,

    /// User-Agent sent with every request (required by the API).
    pub user_agent: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com".to_string(),
            owner: "Uniswap".to_string(),
            repo: "sybil-list".to_string(),
            path: "verified.json".to_string(),
            user_agent: concat!("sybil-verifier/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Retry configuration for list writes rejected with a stale revision token.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Additional read-merge-write attempts after a 409. Zero disables retries.
    pub conflict_retries: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            conflict_retries: 0,
            base_delay_ms: 100,
            max_delay_ms: 2000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// API secrets, injected through the environment at process start.
#[derive(Clone)]
pub struct Credentials {
    /// Bearer token for the social post lookup API.
    pub twitter_bearer: String,
    /// Token for the document-hosting API.
    pub github_token: String,
}

impl Credentials {
    /// Create credentials from explicit values.
    pub fn new(twitter_bearer: impl Into<String>, github_token: impl Into<String>) -> Self {
        Self {
            twitter_bearer: twitter_bearer.into(),
            github_token: github_token.into(),
        }
    }

    /// Load credentials from `TWITTER_BEARER` and `GITHUB_AUTHENTICATION`.
    ///
    /// A missing or empty variable is a deployment error.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            twitter_bearer: required_env(TWITTER_BEARER_ENV_VAR)?,
            github_token: required_env(GITHUB_TOKEN_ENV_VAR)?,
        })
    }
}

fn required_env(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingCredential(name))
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("twitter_bearer", &"[REDACTED]")
            .field("github_token", &"[REDACTED]")
            .finish()
    }
}
