//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → VerifierConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//!
//! environment (TWITTER_BEARER, GITHUB_AUTHENTICATION)
//!     → schema.rs Credentials::from_env
//!     → handed to the upstream clients at construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Secrets never live in the config file

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::{
    Credentials, GithubConfig, ListenerConfig, LogFormat, ObservabilityConfig, RetryConfig,
    ServerConfig, TwitterConfig, VerifierConfig,
};
