//! Verification subsystem.
//!
//! # Data Flow
//! ```text
//! GET .../verify?id=<post id>&account=<address>
//!     → handler.rs (state machine, logging, metrics)
//!     → claim.rs (signature out of post text, payload the claimant signed)
//!     → signer.rs (recover signer, EIP-55 checksum)
//!     → document.rs (decode list, merge entry, re-encode)
//!     → error.rs (status text for every early exit)
//! ```
//!
//! # Design Decisions
//! - Strictly sequential: lookup → recovery → read → write
//! - Nothing is written unless the signer equals the asserted account
//! - Concurrency control is the store's revision token, not a local lock

pub mod claim;
pub mod document;
pub mod error;
pub mod handler;
pub mod signer;

pub use claim::{extract_signature, ClaimError, SignaturePayload};
pub use document::{merge_entry, DocumentError, VerifiedEntry};
pub use error::VerifyError;
pub use handler::{Claim, VerificationHandler};
pub use signer::{checksum, recover_signer, ClaimSigner, SignerError};
