//! Response construction helpers.
//!
//! # Responsibilities
//! - Build plain-text responses carrying a status text
//! - Attach the status text as the HTTP/1.1 reason phrase
//! - Apply the CORS headers shared by every verification response
//!
//! # Design Decisions
//! - The reason phrase travels as a `hyper::ext::ReasonPhrase` extension;
//!   HTTP/2 has no reason phrase, so failure texts are also sent as the body
//! - Text that is not a valid reason phrase (control characters) is
//!   sanitized rather than dropped

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;
use hyper::ext::ReasonPhrase;

/// `text/plain` content type used for every plain response.
pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Plain-text response with `status`, reason phrase `reason` and `body`.
pub fn text_response(status: StatusCode, reason: &str, body: impl Into<Body>) -> Response {
    let mut response = Response::new(body.into());
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN));
    set_reason_phrase(&mut response, reason);
    response
}

/// Response whose body is its status text.
pub fn status_text_response(status: StatusCode, reason: &str) -> Response {
    text_response(status, reason, reason.to_string())
}

/// Bodyless response with only a status and reason phrase.
pub fn empty_response(status: StatusCode, reason: &str) -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = status;
    set_reason_phrase(&mut response, reason);
    response
}

/// Attach `reason` as the response's reason phrase.
pub fn set_reason_phrase(response: &mut Response, reason: &str) {
    let sanitized: String = reason
        .chars()
        .map(|c| if c == '\t' || !c.is_control() { c } else { ' ' })
        .collect();
    match ReasonPhrase::try_from(sanitized) {
        Ok(phrase) => {
            response.extensions_mut().insert(phrase);
        }
        Err(_) => tracing::debug!(reason = %reason, "Status text is not a valid reason phrase"),
    }
}

/// The reason phrase attached to `response`, if any.
pub fn reason_phrase(response: &Response) -> Option<&str> {
    response
        .extensions()
        .get::<ReasonPhrase>()
        .and_then(|phrase| std::str::from_utf8(phrase.as_bytes()).ok())
}

/// Add `Access-Control-Allow-Origin: *` and `Vary: Origin`.
pub fn allow_any_origin(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.append(header::VARY, HeaderValue::from_static("Origin"));
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_response() {
        let resp = text_response(StatusCode::NOT_FOUND, "not found", "resource not found");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), TEXT_PLAIN);
        assert_eq!(reason_phrase(&resp), Some("not found"));
    }

    #[test]
    fn test_reason_phrase_sanitized() {
        let resp = status_text_response(StatusCode::BAD_REQUEST, "Error: line one\nline two");
        assert_eq!(reason_phrase(&resp), Some("Error: line one line two"));
    }

    #[test]
    fn test_allow_any_origin() {
        let resp = allow_any_origin(empty_response(StatusCode::OK, "OK"));
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
        assert_eq!(resp.headers().get(header::VARY).unwrap(), "Origin");
        assert!(resp.headers().get(header::CONTENT_TYPE).is_none());
    }
}
