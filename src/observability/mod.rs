//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Edge handler and verification flow produce:
//!     → logging.rs (structured log events, request ID on every line)
//!     → metrics.rs (counters and histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape, opt-in)
//! ```
//!
//! # Design Decisions
//! - Secrets never appear in log fields
//! - Metrics are cheap and optional

pub mod logging;
pub mod metrics;
