//! Signer recovery and claim signing.
//!
//! # Security
//! - Recovery is delegated to alloy (secp256k1, EIP-191 personal messages)
//! - Signing keys are loaded ONLY from environment variables
//! - Keys are never logged or serialized

use alloy::primitives::{Address, Signature};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;
use thiserror::Error;

use crate::verify::claim::SignaturePayload;

/// Environment variable name for the claim signing key (CLI only).
pub const SIGNING_KEY_ENV_VAR: &str = "VERIFIER_SIGNING_KEY";

/// Errors recovering or producing a claim signature.
#[derive(Debug, Error)]
pub enum SignerError {
    #[error("invalid signature encoding: {0}")]
    Encoding(String),

    #[error("signer recovery failed: {0}")]
    Recovery(String),

    #[error("payload serialization failed: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("key error: {0}")]
    Key(String),
}

/// Recover the address that signed `payload`, as a personal message, with `signature_hex`.
pub fn recover_signer(
    payload: &SignaturePayload,
    signature_hex: &str,
) -> Result<Address, SignerError> {
    let hex = signature_hex.strip_prefix("0x").unwrap_or(signature_hex);
    let bytes = alloy::hex::decode(hex).map_err(|e| SignerError::Encoding(e.to_string()))?;
    if bytes.len() != 65 {
        return Err(SignerError::Encoding(format!(
            "signature must be 65 bytes, got {}",
            bytes.len()
        )));
    }
    let signature =
        Signature::from_raw(&bytes).map_err(|e| SignerError::Encoding(e.to_string()))?;

    let message = payload.to_message()?;
    signature
        .recover_address_from_msg(message.as_bytes())
        .map_err(|e| SignerError::Recovery(e.to_string()))
}

/// EIP-55 mixed-case form of `address`.
pub fn checksum(address: &Address) -> String {
    address.to_checksum(None)
}

/// Produces claim signatures the way a wallet's `personal_sign` does.
#[derive(Debug, Clone)]
pub struct ClaimSigner {
    signer: PrivateKeySigner,
}

impl ClaimSigner {
    /// Create a signer from a hex-encoded private key (with or without 0x prefix).
    pub fn from_private_key(private_key_hex: &str) -> Result<Self, SignerError> {
        let key_hex = private_key_hex.strip_prefix("0x").unwrap_or(private_key_hex);
        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| SignerError::Key(format!("Invalid private key format: {}", e)))?;
        Ok(Self { signer })
    }

    /// Load the key from `VERIFIER_SIGNING_KEY`.
    pub fn from_env() -> Result<Self, SignerError> {
        let private_key = std::env::var(SIGNING_KEY_ENV_VAR).map_err(|_| {
            SignerError::Key(format!(
                "Environment variable {} not set",
                SIGNING_KEY_ENV_VAR
            ))
        })?;
        Self::from_private_key(&private_key)
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Sign the claim for `handle`; returns `0x` + 130 hex characters.
    pub async fn sign_claim(&self, handle: &str) -> Result<String, SignerError> {
        let message = SignaturePayload::new(handle).to_message()?;
        let signature = self
            .signer
            .sign_message(message.as_bytes())
            .await
            .map_err(|e| SignerError::Key(format!("Message signing failed: {}", e)))?;
        Ok(format!("0x{}", alloy::hex::encode(signature.as_bytes())))
    }

    /// Post text carrying the claim for `handle`.
    pub async fn claim_text(&self, handle: &str) -> Result<String, SignerError> {
        let signature = self.sign_claim(handle).await?;
        Ok(format!(
            "Verifying myself as a Sybil delegate. addr:{} sig:{}",
            checksum(&self.address()),
            signature
        ))
    }
}
