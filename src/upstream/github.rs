//! Verified list storage through the GitHub contents API.
//!
//! # Responsibilities
//! - Read the list file together with its blob `sha`
//! - Write new content conditioned on that `sha`
//!
//! # Design Decisions
//! - The `sha` is the optimistic-concurrency token; a stale one is rejected
//!   by GitHub (409) and reported back, never retried here
//! - Non-2xx reads are errors; writes report their status verbatim

use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::GithubConfig;
use crate::upstream::decode::{decode_response, DecodedBody};
use crate::upstream::{directory_url, DocumentStore, UpstreamError};

const GITHUB_JSON: &str = "application/vnd.github+json";

/// Current list content (base64) and its revision token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DocumentState {
    /// Repository path of the list file.
    #[serde(default)]
    pub path: String,
    pub sha: String,
    pub content: String,
}

/// Body of a contents update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentUpdate {
    /// Repository path of the list file.
    pub path: String,
    /// Commit message.
    pub message: String,
    /// Revision token the new content is based on.
    pub sha: String,
    /// New content, base64.
    pub content: String,
}

/// Client for a single file in a single repository.
#[derive(Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    contents_url: Url,
    path: String,
    token: String,
    user_agent: String,
}

impl GithubClient {
    pub fn new(
        http: reqwest::Client,
        config: &GithubConfig,
        token: impl Into<String>,
    ) -> Result<Self, UpstreamError> {
        let mut contents_url = directory_url(&config.api_base)?;
        contents_url
            .path_segments_mut()
            .map_err(|_| UpstreamError::InvalidUrl(config.api_base.clone()))?
            .pop_if_empty()
            .extend(["repos", config.owner.as_str(), config.repo.as_str(), "contents"])
            .extend(config.path.split('/').filter(|s| !s.is_empty()));

        Ok(Self {
            http,
            contents_url,
            path: config.path.trim_matches('/').to_string(),
            token: token.into(),
            user_agent: config.user_agent.clone(),
        })
    }

    /// `/repos/{owner}/{repo}/contents/{path}`
    pub fn contents_url(&self) -> &Url {
        &self.contents_url
    }

    fn request(&self, method: reqwest::Method) -> reqwest::RequestBuilder {
        self.http
            .request(method, self.contents_url.clone())
            .header(AUTHORIZATION, format!("token {}", self.token))
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, GITHUB_JSON)
    }
}

impl DocumentStore for GithubClient {
    async fn read_document(&self) -> Result<DocumentState, UpstreamError> {
        let response = self.request(reqwest::Method::GET).send().await?;
        let status = response.status();
        let body = decode_response(response).await?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                upstream_message = upstream_message(&body).unwrap_or("-"),
                "List read rejected"
            );
            return Err(UpstreamError::Status {
                status: status.as_u16(),
            });
        }
        let mut state: DocumentState = body.into_typed()?;
        state.path = self.path.clone();
        Ok(state)
    }

    async fn write_document(&self, update: &DocumentUpdate) -> Result<u16, UpstreamError> {
        let response = self
            .request(reqwest::Method::PUT)
            .json(update)
            .send()
            .await?;
        let status = response.status();
        let body = decode_response(response).await?;

        if status != reqwest::StatusCode::OK {
            tracing::warn!(
                status = %status,
                sha = %update.sha,
                upstream_message = upstream_message(&body).unwrap_or("-"),
                "List write rejected"
            );
        }
        Ok(status.as_u16())
    }
}

/// GitHub's `message` field from an error body.
fn upstream_message(body: &DecodedBody) -> Option<&str> {
    body.as_json()?.get("message")?.as_str()
}

impl std::fmt::Debug for GithubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubClient")
            .field("contents_url", &self.contents_url.as_str())
            .field("path", &self.path)
            .field("token", &"[REDACTED]")
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
