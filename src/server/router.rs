use crate::config::{Config, Credential, UpstreamConfig};
use crate::providers::gemini::GeminiClient;
use crate::server::access_log::access_log;
use crate::server::routes::{chat, health::health_handler};

use axum::{Router, extract::DefaultBodyLimit, http::StatusCode, middleware, routing::get};
use reqwest::header::{CONNECTION, HeaderMap, HeaderValue};
use std::sync::Arc;

const RELAY_USER_AGENT: &str = concat!("gemini-relay/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
pub struct RelayState {
    pub gemini: Arc<GeminiClient>,
    pub credential: Option<Credential>,
    pub chat_path: Arc<str>,
    pub max_body_bytes: usize,
}

impl RelayState {
    pub fn new(cfg: &Config) -> Result<Self, reqwest::Error> {
        let client = build_client(&cfg.upstream)?;
        Ok(Self {
            gemini: Arc::new(GeminiClient::new(&cfg.upstream, client)),
            credential: cfg.credential(),
            chat_path: Arc::from(cfg.basic.chat_path.as_str()),
            max_body_bytes: cfg.basic.max_body_bytes,
        })
    }
}

fn build_client(cfg: &UpstreamConfig) -> Result<reqwest::Client, reqwest::Error> {
    let mut headers = HeaderMap::new();

    let mut builder = reqwest::Client::builder()
        .user_agent(RELAY_USER_AGENT)
        .redirect(reqwest::redirect::Policy::none())
        .connect_timeout(cfg.connect_timeout())
        .timeout(cfg.request_timeout());

    if let Some(proxy_url) = cfg.proxy.as_ref() {
        builder = builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?);
    }

    if cfg.enable_multiplexing {
        builder = builder.http2_adaptive_window(true);
    } else {
        headers.insert(CONNECTION, HeaderValue::from_static("close"));
        builder = builder.http1_only();
    }

    builder.default_headers(headers).build()
}

async fn not_found_handler() -> StatusCode {
    StatusCode::NOT_FOUND
}

pub fn relay_router(state: RelayState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.max_body_bytes);
    Router::new()
        .merge(chat::router(&state.chat_path).layer(body_limit))
        .route("/healthz", get(health_handler))
        .fallback(not_found_handler)
        .with_state(state)
        .layer(middleware::from_fn(access_log))
}
