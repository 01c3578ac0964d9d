//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, edge dispatcher)
//!     → request.rs (request ID, query parameters)
//!     → cors.rs (OPTIONS under the mount prefix)
//!     → [routing decides the handler]
//!     → response.rs (status text, CORS grant)
//!     → Send to client
//! ```

pub mod cors;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer, ServerError};
