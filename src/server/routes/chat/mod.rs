pub mod extract;
pub mod handlers;

use crate::server::router::RelayState;
use axum::{Router, routing::post};
use handlers::{chat_handler, method_not_allowed_handler};

pub fn router(chat_path: &str) -> Router<RelayState> {
    Router::new().route(
        chat_path,
        post(chat_handler).fallback(method_not_allowed_handler),
    )
}
