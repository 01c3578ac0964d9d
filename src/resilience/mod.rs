//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Conditional list write answered 409 (stale revision):
//!     → backoff.rs (wait base * 2^n, capped, with jitter)
//!     → re-read the list and merge again
//! ```
//!
//! # Design Decisions
//! - Retries are opt-in (`retries.conflict_retries`, default 0)
//! - Only revision conflicts are retried; every other write status is final
//! - No deadline of our own: upstream calls run under the transport defaults,
//!   so a list write is never abandoned halfway

pub mod backoff;

pub use backoff::calculate_backoff;
