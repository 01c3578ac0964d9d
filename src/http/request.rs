//! Request handling helpers.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) when the client sent none
//! - Propagate the request ID to the response
//! - Extract query parameters for handlers
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Query strings are form-urlencoded decoded; the first occurrence wins

use axum::http::{HeaderName, HeaderValue, Request, Uri};
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use uuid::Uuid;

/// Header carrying the request ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let value = HeaderValue::from_str(&Uuid::new_v4().to_string()).ok()?;
        Some(RequestId::new(value))
    }
}

/// Layer that assigns `x-request-id` to requests lacking one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid)
}

/// Layer that copies `x-request-id` onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(X_REQUEST_ID)
}

/// The request ID of `req`, or `"unknown"`.
pub fn request_id<B>(req: &Request<B>) -> &str {
    req.headers()
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// First value of query parameter `name`, decoded.
pub fn query_param(uri: &Uri, name: &str) -> Option<String> {
    let query = uri.query()?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_query_param() {
        let uri: Uri = "/api/verify?id=123&account=0xAbC&id=456".parse().unwrap();
        assert_eq!(query_param(&uri, "id").as_deref(), Some("123"));
        assert_eq!(query_param(&uri, "account").as_deref(), Some("0xAbC"));
        assert_eq!(query_param(&uri, "missing"), None);
    }

    #[test]
    fn test_query_param_decoding() {
        let uri: Uri = "/verify?account=0x%41b&handle=a+b".parse().unwrap();
        assert_eq!(query_param(&uri, "account").as_deref(), Some("0xAb"));
        assert_eq!(query_param(&uri, "handle").as_deref(), Some("a b"));

        let bare: Uri = "/verify".parse().unwrap();
        assert_eq!(query_param(&bare, "id"), None);
    }

    #[test]
    fn test_make_request_id() {
        let req = Request::builder().body(Body::empty()).unwrap();
        let id = MakeRequestUuid.make_request_id(&req).unwrap();
        let text = id.header_value().to_str().unwrap();
        assert!(Uuid::parse_str(text).is_ok());
    }

    #[test]
    fn test_request_id_fallback() {
        let req = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(request_id(&req), "unknown");

        let req = Request::builder()
            .header("x-request-id", "abc")
            .body(Body::empty())
            .unwrap();
        assert_eq!(request_id(&req), "abc");
    }
}
