//! CORS preflight responder for the mount prefix.

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderValue, Request, StatusCode};
use axum::response::Response;

/// Methods the API accepts, as advertised to browsers.
pub const ALLOWED_METHODS: &str = "GET,HEAD,POST,OPTIONS";

/// `Allow` header value for non-preflight OPTIONS requests.
pub const ALLOW_HEADER: &str = "GET, HEAD, POST, OPTIONS";

/// Preflight cache lifetime in seconds.
pub const MAX_AGE_SECS: &str = "86400";

/// Answer an `OPTIONS` request.
///
/// A full preflight (`Origin`, `Access-Control-Request-Method` and
/// `Access-Control-Request-Headers` all present) gets the CORS grant with the
/// requested headers echoed back. Anything else gets a bare `Allow` header.
pub fn handle_options(req: &Request<Body>) -> Response {
    let headers = req.headers();
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::OK;

    match requested_headers(headers) {
        Some(requested) => {
            let out = response.headers_mut();
            out.insert(
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
                HeaderValue::from_static("*"),
            );
            out.insert(
                header::ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static(ALLOWED_METHODS),
            );
            out.insert(
                header::ACCESS_CONTROL_MAX_AGE,
                HeaderValue::from_static(MAX_AGE_SECS),
            );
            out.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, requested);
        }
        None => {
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static(ALLOW_HEADER));
        }
    }
    response
}

fn requested_headers(headers: &HeaderMap) -> Option<HeaderValue> {
    if headers.contains_key(header::ORIGIN)
        && headers.contains_key(header::ACCESS_CONTROL_REQUEST_METHOD)
    {
        headers.get(header::ACCESS_CONTROL_REQUEST_HEADERS).cloned()
    } else {
        None
    }
}
