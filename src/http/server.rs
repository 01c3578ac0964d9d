//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the upstream clients and the verification handler
//! - Create the Axum service with the edge dispatcher as its only handler
//! - Wire up middleware (request ID, tracing)
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request, StatusCode},
    response::Response,
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::{Credentials, VerifierConfig};
use crate::http::cors;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::http::response::empty_response;
use crate::lifecycle::shutdown;
use crate::observability::metrics;
use crate::routing::{Router as EdgeRouter, RoutingError};
use crate::upstream::{DocumentStore, GithubClient, PostSource, TwitterClient, UpstreamError};
use crate::verify::VerificationHandler;

/// Errors assembling the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("invalid upstream configuration: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("invalid route: {0}")]
    Routing(#[from] RoutingError),
}

/// Application state injected into the edge handler.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<EdgeRouter>,
    pub mount_prefix: Arc<str>,
}

/// HTTP server for the verifier.
pub struct HttpServer {
    router: Router,
    config: VerifierConfig,
}

impl HttpServer {
    /// Create a server talking to the configured Twitter and GitHub APIs.
    pub fn new(config: VerifierConfig, credentials: &Credentials) -> Result<Self, ServerError> {
        let http = reqwest::Client::builder()
            .user_agent(config.github.user_agent.as_str())
            .build()?;

        let posts = TwitterClient::new(http.clone(), &config.twitter, &credentials.twitter_bearer)?;
        let store = GithubClient::new(http, &config.github, &credentials.github_token)?;

        tracing::info!(
            twitter = %config.twitter.api_base,
            list = %store.contents_url(),
            "Upstream clients ready"
        );

        let handler = VerificationHandler::new(posts, store, config.retries.clone());
        Self::with_handler(config, handler)
    }

    /// Create a server around an already built verification handler.
    pub fn with_handler<P, S>(
        config: VerifierConfig,
        handler: VerificationHandler<P, S>,
    ) -> Result<Self, ServerError>
    where
        P: PostSource + 'static,
        S: DocumentStore + 'static,
    {
        let state = AppState {
            router: Arc::new(verification_routes(Arc::new(handler))?),
            mount_prefix: Arc::from(config.server.mount_prefix.as_str()),
        };
        let router = Self::build_router(state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .fallback(edge_handler)
            .with_state(state)
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// The fully layered service, for in-process requests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Serve on `listener` until `shutdown_rx` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            mount_prefix = %self.config.server.mount_prefix,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown_rx))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Routes under the mount prefix.
fn verification_routes<P, S>(
    handler: Arc<VerificationHandler<P, S>>,
) -> Result<EdgeRouter, RoutingError>
where
    P: PostSource + 'static,
    S: DocumentStore + 'static,
{
    let mut router = EdgeRouter::new();
    router
        .get(".*/verify", move |req| {
            let handler = Arc::clone(&handler);
            async move { handler.handle(req).await }
        })?
        .get("/", |_req| async {
            empty_response(StatusCode::NOT_FOUND, "No route specified")
        })?;
    Ok(router)
}

/// Edge dispatcher: mount prefix, preflight, method filter, then routes.
async fn edge_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request_id(&request).to_string();

    let response = if !path.starts_with(state.mount_prefix.as_ref()) {
        empty_response(StatusCode::NOT_FOUND, "Invalid route")
    } else if method == Method::OPTIONS {
        cors::handle_options(&request)
    } else if method == Method::GET || method == Method::HEAD || method == Method::POST {
        state.router.dispatch(request).await
    } else {
        empty_response(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
    };

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        "Request handled"
    );
    metrics::record_request(method.as_str(), response.status().as_u16(), start);
    response
}
