//! Claim extraction from post text and the payload the claimant signed.
//!
//! # Parsing contract
//! The signature is whatever follows the first literal `sig:` on the same
//! line, cut to [`SIGNATURE_LEN`] characters (`0x` + 65 hex-encoded bytes).
//! Anything after that window is ignored. This is intentionally not a general
//! parser and breaks if the post format drifts.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

/// Marker preceding the signature in the post body.
pub const SIGNATURE_MARKER: &str = "sig:";

/// Length of a hex signature including the `0x` prefix.
pub const SIGNATURE_LEN: usize = 132;

/// Domain name the client signs under.
pub const DOMAIN_NAME: &str = "Sybil Verifier";

/// Domain version the client signs under.
pub const DOMAIN_VERSION: &str = "1";

/// Primary type of the signed payload.
pub const PRIMARY_TYPE: &str = "Permit";

static SIGNATURE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"sig:(.*)").expect("signature pattern is valid"));

/// Problems with the claim embedded in a post.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimError {
    #[error("no 'sig:' marker in post text")]
    MissingMarker,

    #[error("signature is {0} characters, expected 132")]
    TooShort(usize),

    #[error("signature is not 0x-prefixed hex")]
    NotHex,
}

/// Extract the signature blob from post text.
pub fn extract_signature(text: &str) -> Result<String, ClaimError> {
    let captured = SIGNATURE_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .ok_or(ClaimError::MissingMarker)?
        .as_str();

    let signature: String = captured.chars().take(SIGNATURE_LEN).collect();
    let len = signature.chars().count();
    if len < SIGNATURE_LEN {
        return Err(ClaimError::TooShort(len));
    }

    let hex = signature.strip_prefix("0x").ok_or(ClaimError::NotHex)?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ClaimError::NotHex);
    }
    Ok(signature)
}

#[derive(Debug, Clone, Serialize)]
struct TypeField {
    name: &'static str,
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Clone, Serialize)]
struct PayloadTypes {
    #[serde(rename = "EIP712Domain")]
    domain: [TypeField; 2],
    #[serde(rename = "Permit")]
    permit: [TypeField; 1],
}

#[derive(Debug, Clone, Serialize)]
struct PayloadDomain {
    name: &'static str,
    version: &'static str,
}

#[derive(Debug, Clone, Serialize)]
struct PayloadMessage {
    username: String,
}

/// The structured message a claimant signs for `username`.
///
/// Field order is significant: the signed bytes are the compact JSON of this
/// struct, see [`SignaturePayload::to_message`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignaturePayload {
    types: PayloadTypes,
    domain: PayloadDomain,
    primary_type: &'static str,
    message: PayloadMessage,
}

impl SignaturePayload {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            types: PayloadTypes {
                domain: [
                    TypeField {
                        name: "name",
                        kind: "string",
                    },
                    TypeField {
                        name: "version",
                        kind: "string",
                    },
                ],
                permit: [TypeField {
                    name: "username",
                    kind: "string",
                }],
            },
            domain: PayloadDomain {
                name: DOMAIN_NAME,
                version: DOMAIN_VERSION,
            },
            primary_type: PRIMARY_TYPE,
            message: PayloadMessage {
                username: username.into(),
            },
        }
    }

    pub fn username(&self) -> &str {
        &self.message.username
    }

    /// Exact bytes passed to `personal_sign`.
    pub fn to_message(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
