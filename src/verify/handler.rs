//! The verification flow.
//!
//! ```text
//! ParseRequest → FetchPost → ExtractClaim → BuildSignedPayload
//!     → RecoverSigner → ValidateAccount → FetchDocumentState
//!     → MergeEntry → ConditionalWrite → Success
//! ```
//!
//! Each step either advances or ends the request with a [`VerifyError`];
//! nothing is written unless the recovered signer equals the asserted account.

use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::config::RetryConfig;
use crate::http::request::{query_param, request_id};
use crate::http::response::{allow_any_origin, text_response};
use crate::observability::metrics;
use crate::resilience::backoff::calculate_backoff;
use crate::upstream::{DocumentStore, DocumentUpdate, PostLookup, PostSource};
use crate::verify::claim::{extract_signature, SignaturePayload};
use crate::verify::document::{merge_entry, now_millis, VerifiedEntry};
use crate::verify::error::VerifyError;
use crate::verify::signer::{checksum, recover_signer, SignerError};

const STATUS_CONFLICT: u16 = 409;
const STATUS_OK: u16 = 200;

/// Handle and signature read from a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    pub handle: String,
    pub signature: String,
}

/// Verifies posts and records verified identities.
pub struct VerificationHandler<P, S> {
    posts: P,
    store: S,
    retries: RetryConfig,
}

impl<P, S> VerificationHandler<P, S>
where
    P: PostSource,
    S: DocumentStore,
{
    pub fn new(posts: P, store: S, retries: RetryConfig) -> Self {
        Self {
            posts,
            store,
            retries,
        }
    }

    /// Answer `GET .../verify?id=<post id>&account=<address>`.
    pub async fn handle(&self, req: Request<Body>) -> Response {
        let start = Instant::now();
        let request_id = request_id(&req).to_string();
        let id = query_param(req.uri(), "id");
        let account = query_param(req.uri(), "account").unwrap_or_default();
        drop(req);

        match self.verify(id.as_deref(), &account).await {
            Ok(handle) => {
                tracing::info!(
                    request_id = %request_id,
                    tweet_id = id.as_deref().unwrap_or(""),
                    account = %account,
                    handle = %handle,
                    "Verification recorded"
                );
                metrics::record_verification("success", start);
                allow_any_origin(text_response(
                    StatusCode::OK,
                    "Succesful verification",
                    handle,
                ))
            }
            Err(err) => {
                match &err {
                    VerifyError::WriteFailed { .. }
                    | VerifyError::Upstream(_)
                    | VerifyError::Document(_)
                    | VerifyError::Signer(_) => tracing::error!(
                        request_id = %request_id,
                        tweet_id = id.as_deref().unwrap_or(""),
                        error = ?err,
                        "Verification failed"
                    ),
                    _ => tracing::warn!(
                        request_id = %request_id,
                        tweet_id = id.as_deref().unwrap_or(""),
                        account = %account,
                        outcome = err.outcome(),
                        "Verification rejected"
                    ),
                }
                metrics::record_verification(err.outcome(), start);
                err.into_response()
            }
        }
    }

    /// Run the flow for post `id` claimed by `account`; returns the verified handle.
    pub async fn verify(&self, id: Option<&str>, account: &str) -> Result<String, VerifyError> {
        let id = id
            .filter(|id| !id.is_empty())
            .ok_or(VerifyError::InvalidPostId)?;

        let claim = self.fetch_claim(id).await?;

        let payload = SignaturePayload::new(claim.handle.as_str());
        let signer = recover_signer(&payload, &claim.signature).map_err(|e| match e {
            SignerError::Encoding(_) | SignerError::Recovery(_) => {
                tracing::debug!(tweet_id = %id, error = %e, "Unusable signature");
                VerifyError::InvalidPostFormat
            }
            other => VerifyError::Signer(other),
        })?;
        let address = checksum(&signer);

        // Exact comparison: the checksum casing is part of the address.
        if account != address {
            tracing::debug!(tweet_id = %id, expected = %account, recovered = %address, "Signer mismatch");
            return Err(VerifyError::InvalidAccount);
        }

        let entry = VerifiedEntry::new(id, claim.handle.as_str(), now_millis());
        self.record(&address, &entry).await?;
        Ok(claim.handle)
    }

    /// Look up the post and pull the handle and signature out of it.
    pub async fn fetch_claim(&self, id: &str) -> Result<Claim, VerifyError> {
        let body = self.posts.lookup_post(id).await.map_err(|e| {
            tracing::warn!(tweet_id = %id, error = %e, "Post lookup failed");
            VerifyError::InvalidPostId
        })?;
        let lookup: PostLookup = body.into_typed().map_err(|e| {
            tracing::debug!(tweet_id = %id, error = %e, "Post lookup body unusable");
            VerifyError::InvalidPostId
        })?;
        if lookup.data.is_none() || lookup.includes.is_none() {
            return Err(VerifyError::InvalidPostId);
        }

        let (Some(text), Some(handle)) = (lookup.text(), lookup.author_handle()) else {
            return Err(VerifyError::InvalidPostFormat);
        };
        let signature = extract_signature(text).map_err(|e| {
            tracing::debug!(tweet_id = %id, error = %e, "No claim in post");
            VerifyError::InvalidPostFormat
        })?;

        Ok(Claim {
            handle: handle.to_string(),
            signature,
        })
    }

    /// Read, merge and conditionally write the list.
    async fn record(&self, address: &str, entry: &VerifiedEntry) -> Result<(), VerifyError> {
        let message = format!("Linking {} to handle: {}", address, entry.twitter.handle);
        let mut attempts = 0;

        loop {
            let state = self.store.read_document().await?;
            let update = DocumentUpdate {
                path: state.path,
                message: message.clone(),
                content: merge_entry(&state.content, address, entry)?,
                sha: state.sha,
            };

            let status = self.store.write_document(&update).await?;
            if status == STATUS_OK {
                return Ok(());
            }

            if status == STATUS_CONFLICT && attempts < self.retries.conflict_retries {
                attempts += 1;
                let delay = calculate_backoff(
                    attempts,
                    self.retries.base_delay_ms,
                    self.retries.max_delay_ms,
                );
                tracing::info!(
                    address = %address,
                    attempt = attempts,
                    delay = ?delay,
                    "Stale list revision, retrying with a fresh read"
                );
                tokio::time::sleep(delay).await;
                continue;
            }

            return Err(VerifyError::WriteFailed { status });
        }
    }
}
