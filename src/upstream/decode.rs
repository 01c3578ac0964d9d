//! Content-type driven decoding of upstream response bodies.
//!
//! Every response from an external service passes through [`decode_response`]
//! once; downstream code only sees [`DecodedBody`].

use axum::http::{header, HeaderMap};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::upstream::UpstreamError;

/// A decoded upstream body.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedBody {
    /// `application/json` bodies.
    Json(Value),
    /// Text, HTML and anything unrecognised.
    Text(String),
}

impl DecodedBody {
    /// The JSON value, if this body was JSON.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            DecodedBody::Json(value) => Some(value),
            DecodedBody::Text(_) => None,
        }
    }

    /// Deserialize a JSON body into `T`.
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<T, UpstreamError> {
        match self {
            DecodedBody::Json(value) => serde_json::from_value(value)
                .map_err(|e| UpstreamError::UnexpectedShape(e.to_string())),
            DecodedBody::Text(text) => Err(UpstreamError::UnexpectedShape(format!(
                "expected JSON, got text ({} bytes)",
                text.len()
            ))),
        }
    }
}

/// Decode `body` according to `content_type`.
pub fn decode_body(content_type: &str, body: &[u8]) -> Result<DecodedBody, UpstreamError> {
    if content_type.contains("application/json") {
        let value = serde_json::from_slice(body).map_err(UpstreamError::Decode)?;
        return Ok(DecodedBody::Json(value));
    }
    // application/text, text/html and everything else decode as text
    Ok(DecodedBody::Text(String::from_utf8_lossy(body).into_owned()))
}

/// Content type header value, empty if absent or not ASCII.
pub fn content_type(headers: &HeaderMap) -> &str {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

/// Read and decode a `reqwest` response body.
pub async fn decode_response(response: reqwest::Response) -> Result<DecodedBody, UpstreamError> {
    let content_type = content_type(response.headers()).to_string();
    let bytes = response.bytes().await?;
    decode_body(&content_type, &bytes)
}
