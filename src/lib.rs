//! Sybil verifier library.
//!
//! Links a social-media handle to an Ethereum address: the claimant posts a
//! signature over their handle, the service recovers the signer and appends
//! `address → handle` to a list kept in a GitHub repository.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod routing;
pub mod upstream;
pub mod verify;

pub use config::schema::VerifierConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use verify::VerificationHandler;
