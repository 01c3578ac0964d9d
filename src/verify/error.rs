//! Verification outcomes that end a request early.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::http::response::{allow_any_origin, status_text_response};
use crate::upstream::UpstreamError;
use crate::verify::document::DocumentError;
use crate::verify::signer::SignerError;

/// Failure of the verification flow. Every variant is answered with 400.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// The post lookup failed or returned no `data`/`includes`.
    #[error("Invalid tweet id")]
    InvalidPostId,

    /// No usable signature or author handle in the post.
    #[error("Invalid tweet format")]
    InvalidPostFormat,

    /// The recovered signer is not the asserted account.
    #[error("Invalid account")]
    InvalidAccount,

    /// The store answered the write with something other than 200.
    #[error("Error updating list.")]
    WriteFailed { status: u16 },

    #[error("Error: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("Error: {0}")]
    Document(#[from] DocumentError),

    #[error("Error: {0}")]
    Signer(#[from] SignerError),
}

impl VerifyError {
    /// Label used for logs and metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            VerifyError::InvalidPostId => "invalid_post_id",
            VerifyError::InvalidPostFormat => "invalid_post_format",
            VerifyError::InvalidAccount => "invalid_account",
            VerifyError::WriteFailed { .. } => "write_failed",
            VerifyError::Upstream(_) | VerifyError::Document(_) | VerifyError::Signer(_) => {
                "error"
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}

impl IntoResponse for VerifyError {
    fn into_response(self) -> Response {
        allow_any_origin(status_text_response(self.status(), &self.to_string()))
    }
}
