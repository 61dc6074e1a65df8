use crate::server::router::RelayState;
use axum::{Json, extract::State};
use serde_json::{Value, json};

/// Liveness probe. Reports whether an upstream key is configured, never the key itself.
pub async fn health_handler(State(state): State<RelayState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "credential": state.credential.is_some(),
    }))
}
