//! The verified list document: base64 transport encoding and entry merging.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// A verified identity for one address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedEntry {
    pub twitter: TwitterIdentity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwitterIdentity {
    /// Verification time, milliseconds since the Unix epoch.
    pub timestamp: u64,
    #[serde(rename = "tweetID")]
    pub tweet_id: String,
    pub handle: String,
}

impl VerifiedEntry {
    pub fn new(tweet_id: impl Into<String>, handle: impl Into<String>, timestamp: u64) -> Self {
        Self {
            twitter: TwitterIdentity {
                timestamp,
                tweet_id: tweet_id.into(),
                handle: handle.into(),
            },
        }
    }
}

/// Errors decoding or re-encoding the list.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("list content is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("list content is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("list content is not a JSON object")]
    NotAnObject,
}

/// Decode base64 list content into its JSON object. Whitespace is ignored.
pub fn decode_document(content: &str) -> Result<Map<String, Value>, DocumentError> {
    let compact: String = content.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD.decode(compact)?;
    match serde_json::from_slice(&bytes)? {
        Value::Object(map) => Ok(map),
        _ => Err(DocumentError::NotAnObject),
    }
}

/// Compact JSON, base64 encoded.
pub fn encode_document(document: &Map<String, Value>) -> Result<String, DocumentError> {
    let json = serde_json::to_vec(document)?;
    Ok(STANDARD.encode(json))
}

/// Set `document[address] = entry` and return the re-encoded content.
///
/// Existing keys keep their order; an existing entry for `address` is replaced.
pub fn merge_entry(
    content: &str,
    address: &str,
    entry: &VerifiedEntry,
) -> Result<String, DocumentError> {
    let mut document = decode_document(content)?;
    document.insert(address.to_string(), serde_json::to_value(entry)?);
    encode_document(&document)
}

/// Current time in milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
