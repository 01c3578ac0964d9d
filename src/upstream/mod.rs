//! Clients for the external services the verifier depends on.
//!
//! # Data Flow
//! ```text
//! VerificationHandler
//!     → twitter.rs (post lookup with author expansion)
//!     → github.rs  (read list + revision token, conditional write)
//!     → decode.rs  (every response body → DecodedBody)
//! ```
//!
//! # Design Decisions
//! - The handler talks to the traits below, never to `reqwest` directly
//! - No retries or deadlines here; transport defaults apply
//! - Response bodies are decoded exactly once, at this boundary

use std::future::Future;

use thiserror::Error;
use url::Url;

pub mod decode;
pub mod github;
pub mod twitter;

pub use decode::{decode_body, decode_response, DecodedBody};
pub use github::{DocumentState, DocumentUpdate, GithubClient};
pub use twitter::{PostLookup, TwitterClient};

/// Errors talking to an upstream service.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid JSON body: {0}")]
    Decode(serde_json::Error),

    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),

    #[error("invalid upstream URL: {0}")]
    InvalidUrl(String),

    #[error("upstream returned status {status}")]
    Status { status: u16 },
}

impl From<url::ParseError> for UpstreamError {
    fn from(e: url::ParseError) -> Self {
        UpstreamError::InvalidUrl(e.to_string())
    }
}

/// Source of social posts.
pub trait PostSource: Send + Sync {
    /// Look up a post by id with its author expanded.
    fn lookup_post(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<DecodedBody, UpstreamError>> + Send;
}

/// Remote, revision-guarded JSON document.
pub trait DocumentStore: Send + Sync {
    /// Current content and revision token.
    fn read_document(&self) -> impl Future<Output = Result<DocumentState, UpstreamError>> + Send;

    /// Submit new content guarded by `update.sha`. Returns the status the store reported.
    fn write_document(
        &self,
        update: &DocumentUpdate,
    ) -> impl Future<Output = Result<u16, UpstreamError>> + Send;
}

/// Parse `base` and make sure relative joins append to its path.
pub(crate) fn directory_url(base: &str) -> Result<Url, UpstreamError> {
    let mut url = Url::parse(base)?;
    if url.cannot_be_a_base() {
        return Err(UpstreamError::InvalidUrl(base.to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
