#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, Bytes, to_bytes},
    extract::{DefaultBodyLimit, Path, RawQuery, State},
    http::{Request, StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use gemini_relay::{
    Config,
    config::FallbackStrategy,
    server::router::{RelayState, relay_router},
};
use serde_json::Value;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::net::TcpListener;
use tower::ServiceExt;
use url::Url;

pub const TEST_KEY: &str = "test-secret-key";

/// What the mock upstream answers for one model.
#[derive(Clone)]
pub enum Reply {
    Json(StatusCode, Value),
    Text(StatusCode, &'static str),
    Delayed(Duration, Value),
}

#[derive(Debug, Clone)]
pub struct Captured {
    pub model: String,
    pub query: Option<String>,
    pub body: Value,
}

#[derive(Clone, Default)]
pub struct MockUpstream {
    calls: Arc<Mutex<Vec<Captured>>>,
    replies: Arc<HashMap<String, Reply>>,
}

impl MockUpstream {
    pub fn new(replies: impl IntoIterator<Item = (&'static str, Reply)>) -> Self {
        Self {
            calls: Arc::default(),
            replies: Arc::new(
                replies
                    .into_iter()
                    .map(|(model, reply)| (model.to_string(), reply))
                    .collect(),
            ),
        }
    }

    pub fn calls(&self) -> Vec<Captured> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called_models(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.model).collect()
    }

    pub async fn spawn(self) -> Url {
        let app = Router::new()
            .route("/v1beta/models/{*path}", post(generate_handler))
            .layer(DefaultBodyLimit::disable())
            .with_state(self);
        spawn_test_server(app).await
    }
}

async fn generate_handler(
    State(state): State<MockUpstream>,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Response {
    let model = path.split(':').next().unwrap_or_default().to_string();
    state.calls.lock().unwrap().push(Captured {
        model: model.clone(),
        query,
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });

    match state.replies.get(&model).cloned() {
        Some(Reply::Json(status, body)) => (status, axum::Json(body)).into_response(),
        Some(Reply::Text(status, body)) => {
            (status, [(header::CONTENT_TYPE, "text/plain")], body).into_response()
        }
        Some(Reply::Delayed(delay, body)) => {
            tokio::time::sleep(delay).await;
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            axum::Json(serde_json::json!({
                "error": {
                    "code": 404,
                    "message": format!("models/{model} is not found for API version v1beta"),
                    "status": "NOT_FOUND"
                }
            })),
        )
            .into_response(),
    }
}

pub async fn spawn_test_server(app: Router) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    let base = Url::parse(&format!("http://{addr}")).expect("valid base url");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server run");
    });

    base
}

/// A base URL nothing is listening on.
pub async fn dead_upstream() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    Url::parse(&format!("http://{addr}")).expect("valid base url")
}

pub fn relay_config(
    base_url: Url,
    api_key: Option<&str>,
    models: &[&str],
    strategy: FallbackStrategy,
) -> Config {
    let mut cfg = Config::default();
    cfg.upstream.base_url = base_url;
    cfg.upstream.api_key = api_key.map(str::to_string);
    cfg.upstream.models = models.iter().map(|m| (*m).to_string()).collect();
    cfg.upstream.strategy = strategy;
    cfg.upstream.request_timeout_secs = 5;
    cfg.upstream.connect_timeout_secs = 2;
    cfg
}

pub fn relay_app(cfg: &Config) -> Router {
    relay_router(RelayState::new(cfg).expect("build relay state"))
}

pub fn chat_request(method: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri("/api/chat")
        .header("content-type", "application/json")
        .body(body.into())
        .expect("failed to build request")
}

pub fn chat_post(message: &str, system_prompt: &str) -> Request<Body> {
    chat_request(
        "POST",
        serde_json::json!({ "message": message, "systemPrompt": system_prompt }).to_string(),
    )
}

pub async fn send_raw(app: &Router, req: Request<Body>) -> (StatusCode, Bytes) {
    let resp = app.clone().oneshot(req).await.expect("request failed");
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    (status, bytes)
}

pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let (status, bytes) = send_raw(app, req).await;
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}
