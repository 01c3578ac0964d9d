//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → router.rs (route lookup in registration order)
//!     → matcher.rs (evaluate match conditions)
//!     → Return: matched Route or NoMatch (→ 404)
//!
//! Route Registration (at startup):
//!     router.get(".*/verify", handler)
//!     → Compile anchored path pattern
//!     → Append (conditions, handler)
//!     → Freeze behind Arc
//! ```
//!
//! # Design Decisions
//! - Routes registered at startup, immutable at runtime
//! - Patterns compiled once; invalid patterns fail registration
//! - Deterministic: same input always matches same route
//! - First match wins (registration order)

use thiserror::Error;

pub mod matcher;
pub mod router;

pub use matcher::{method, path, AndMatcher, Matcher, MethodMatcher, PathMatcher};
pub use router::{Handler, Route, Router};

/// Errors raised while building a router.
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("invalid path pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}
