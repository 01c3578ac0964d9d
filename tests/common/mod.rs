//! Shared utilities for integration testing.
//!
//! Starts mock Twitter and GitHub APIs on one ephemeral port and the real
//! verifier server in front of them.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::{json, Map, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use sybil_verifier::config::{Credentials, VerifierConfig};
use sybil_verifier::lifecycle::Shutdown;
use sybil_verifier::verify::ClaimSigner;
use sybil_verifier::HttpServer;

/// Anvil account #0.
pub const TEST_PRIVATE_KEY: &str =
    "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const TEST_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

/// Anvil account #1, never the signer in these tests.
pub const OTHER_ADDRESS: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

pub const TEST_BEARER: &str = "test-bearer";
pub const TEST_TOKEN: &str = "test-token";

const CONTENTS_PATH: &str = "/repos/Uniswap/sybil-list/contents/verified.json";

#[derive(Default)]
struct Inner {
    posts: HashMap<String, Value>,
    sha: String,
    document: Map<String, Value>,
    revision: u32,
    forced_writes: VecDeque<u16>,
    writes: Vec<Value>,
    authorizations: Vec<String>,
}

/// Handle to the mock upstream APIs.
#[derive(Clone)]
pub struct MockUpstream {
    pub addr: SocketAddr,
    inner: Arc<Mutex<Inner>>,
}

impl MockUpstream {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Publish a post with the given text by `username`.
    pub fn add_post(&self, id: &str, username: &str, text: &str) {
        let body = json!({
            "data": [{"id": id, "text": text, "author_id": "7"}],
            "includes": {"users": [{"id": "7", "name": username, "username": username}]}
        });
        self.inner.lock().unwrap().posts.insert(id.to_string(), body);
    }

    /// Publish a correctly signed claim for `username`.
    pub async fn add_signed_post(&self, id: &str, username: &str) {
        let signer = ClaimSigner::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let text = signer.claim_text(username).await.unwrap();
        self.add_post(id, username, &text);
    }

    /// Answer the next writes with these statuses instead of applying them.
    pub fn force_write_statuses(&self, statuses: &[u16]) {
        self.inner
            .lock()
            .unwrap()
            .forced_writes
            .extend(statuses.iter().copied());
    }

    pub fn set_document(&self, document: Value) {
        let mut inner = self.inner.lock().unwrap();
        inner.document = document.as_object().cloned().unwrap_or_default();
        inner.revision += 1;
        inner.sha = format!("sha-{}", inner.revision);
    }

    pub fn document(&self) -> Map<String, Value> {
        self.inner.lock().unwrap().document.clone()
    }

    pub fn writes(&self) -> Vec<Value> {
        self.inner.lock().unwrap().writes.clone()
    }

    pub fn authorizations(&self) -> Vec<String> {
        self.inner.lock().unwrap().authorizations.clone()
    }
}

/// GitHub wraps contents at 60 columns.
fn wrapped_base64(document: &Map<String, Value>) -> String {
    let encoded = STANDARD.encode(serde_json::to_vec(document).unwrap());
    encoded
        .as_bytes()
        .chunks(60)
        .map(|chunk| format!("{}\n", String::from_utf8_lossy(chunk)))
        .collect()
}

fn record_auth(inner: &mut Inner, headers: &HeaderMap) {
    if let Some(value) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        inner.authorizations.push(value.to_string());
    }
}

async fn lookup_post(
    State(state): State<Arc<Mutex<Inner>>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mut inner = state.lock().unwrap();
    record_auth(&mut inner, &headers);

    let id = params.get("ids").cloned().unwrap_or_default();
    match inner.posts.get(&id) {
        Some(body) => Json(body.clone()).into_response(),
        None => Json(json!({
            "errors": [{"value": id, "detail": "Could not find tweet", "title": "Not Found Error"}]
        }))
        .into_response(),
    }
}

async fn read_contents(
    State(state): State<Arc<Mutex<Inner>>>,
    headers: HeaderMap,
) -> Response {
    let mut inner = state.lock().unwrap();
    record_auth(&mut inner, &headers);

    Json(json!({
        "name": "verified.json",
        "path": "verified.json",
        "sha": inner.sha,
        "encoding": "base64",
        "content": wrapped_base64(&inner.document),
    }))
    .into_response()
}

async fn update_contents(
    State(state): State<Arc<Mutex<Inner>>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut inner = state.lock().unwrap();
    record_auth(&mut inner, &headers);
    inner.writes.push(body.clone());

    if let Some(status) = inner.forced_writes.pop_front() {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (status, Json(json!({"message": "forced failure"}))).into_response();
    }

    if body["sha"].as_str() != Some(inner.sha.as_str()) {
        return (
            StatusCode::CONFLICT,
            Json(json!({"message": "verified.json does not match"})),
        )
            .into_response();
    }

    let decoded = body["content"]
        .as_str()
        .and_then(|c| STANDARD.decode(c).ok())
        .and_then(|bytes| serde_json::from_slice::<Value>(&bytes).ok());
    let Some(Value::Object(document)) = decoded else {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"message": "content is not valid Base64"})),
        )
            .into_response();
    };

    inner.document = document;
    inner.revision += 1;
    inner.sha = format!("sha-{}", inner.revision);
    Json(json!({
        "content": {"path": "verified.json", "sha": inner.sha},
        "commit": {"message": body["message"]}
    }))
    .into_response()
}

/// Start mock Twitter and GitHub APIs with an empty list.
pub async fn start_mock_upstream() -> MockUpstream {
    let inner = Arc::new(Mutex::new(Inner {
        sha: "sha-0".to_string(),
        ..Default::default()
    }));

    let app = Router::new()
        .route("/2/tweets", get(lookup_post))
        .route(CONTENTS_PATH, get(read_contents).put(update_contents))
        .with_state(inner.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockUpstream { addr, inner }
}

/// A running verifier. Dropping it does not stop the server; call `stop`.
pub struct TestVerifier {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestVerifier {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn stop(&self) {
        self.shutdown.trigger();
    }
}

/// Config pointing both upstreams at `upstream`.
pub fn test_config(upstream: &MockUpstream) -> VerifierConfig {
    let mut config = VerifierConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.twitter.api_base = upstream.base_url();
    config.github.api_base = upstream.base_url();
    config.retries.base_delay_ms = 1;
    config.retries.max_delay_ms = 5;
    config
}

/// Start the verifier with `config` on an ephemeral port.
pub async fn start_verifier(config: VerifierConfig) -> TestVerifier {
    let credentials = Credentials::new(TEST_BEARER, TEST_TOKEN);
    let server = HttpServer::new(config, &credentials).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    TestVerifier { addr, shutdown }
}

/// Status line, headers and body of a raw HTTP/1.1 exchange.
///
/// reqwest hides the reason phrase, which carries the status text.
pub async fn raw_request(addr: SocketAddr, method: &str, path: &str, headers: &[(&str, &str)]) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let mut request = format!("{} {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n", method, path, addr);
    for (name, value) in headers {
        request.push_str(&format!("{}: {}\r\n", name, value));
    }
    request.push_str("\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = String::new();
    tokio::time::timeout(Duration::from_secs(10), stream.read_to_string(&mut response))
        .await
        .expect("verifier did not answer in time")
        .unwrap();
    response
}

/// First line of a raw response, e.g. `HTTP/1.1 400 Invalid account`.
pub fn status_line(response: &str) -> &str {
    response.lines().next().unwrap_or("")
}

/// Value of header `name` in a raw response, case-insensitive.
pub fn header_value<'a>(response: &'a str, name: &str) -> Option<&'a str> {
    response
        .split("\r\n\r\n")
        .next()?
        .lines()
        .skip(1)
        .find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim().eq_ignore_ascii_case(name).then(|| value.trim())
        })
}
