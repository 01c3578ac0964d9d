//! Social post lookup (Twitter API v2).

use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use url::Url;

use crate::config::TwitterConfig;
use crate::upstream::decode::{decode_response, DecodedBody};
use crate::upstream::{directory_url, PostSource, UpstreamError};

/// Lookup response: `{data: [{text}], includes: {users: [{username}]}}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostLookup {
    pub data: Option<Vec<Post>>,
    pub includes: Option<Includes>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Post {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Includes {
    #[serde(default)]
    pub users: Vec<User>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct User {
    pub username: Option<String>,
}

impl PostLookup {
    /// Text of the first post.
    pub fn text(&self) -> Option<&str> {
        self.data.as_ref()?.first()?.text.as_deref()
    }

    /// Username of the first expanded author.
    pub fn author_handle(&self) -> Option<&str> {
        self.includes.as_ref()?.users.first()?.username.as_deref()
    }
}

/// Client for the post lookup endpoint.
#[derive(Clone)]
pub struct TwitterClient {
    http: reqwest::Client,
    api_base: Url,
    bearer: String,
}

impl TwitterClient {
    pub fn new(
        http: reqwest::Client,
        config: &TwitterConfig,
        bearer: impl Into<String>,
    ) -> Result<Self, UpstreamError> {
        Ok(Self {
            http,
            api_base: directory_url(&config.api_base)?,
            bearer: bearer.into(),
        })
    }

    /// `GET /2/tweets?ids=<id>&expansions=author_id&user.fields=username`
    pub fn lookup_url(&self, id: &str) -> Result<Url, UpstreamError> {
        let mut url = self.api_base.join("2/tweets")?;
        url.query_pairs_mut()
            .append_pair("ids", id)
            .append_pair("expansions", "author_id")
            .append_pair("user.fields", "username");
        Ok(url)
    }
}

impl PostSource for TwitterClient {
    async fn lookup_post(&self, id: &str) -> Result<DecodedBody, UpstreamError> {
        let url = self.lookup_url(id)?;
        tracing::debug!(tweet_id = %id, "Looking up post");

        let response = self
            .http
            .get(url)
            .header(AUTHORIZATION, format!("Bearer {}", self.bearer))
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = decode_response(response).await?;
        tracing::debug!(tweet_id = %id, status = %status, "Post lookup answered");
        Ok(body)
    }
}

impl std::fmt::Debug for TwitterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitterClient")
            .field("api_base", &self.api_base.as_str())
            .field("bearer", &"[REDACTED]")
            .finish()
    }
}
