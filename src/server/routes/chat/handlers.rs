use super::extract::ChatPreprocess;
use crate::error::RelayError;
use crate::server::router::RelayState;
use axum::{
    extract::State,
    http::{HeaderValue, Method, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use relay_schema::GenerateContentRequest;
use tracing::warn;

/// Relay one chat message upstream and pass the first successful payload back unchanged.
pub async fn chat_handler(
    State(state): State<RelayState>,
    ChatPreprocess(chat, credential): ChatPreprocess,
) -> Result<Response, RelayError> {
    let body = GenerateContentRequest::from(&chat);
    let payload = state.gemini.generate(&credential, &body).await?;
    Ok((
        [(CONTENT_TYPE, HeaderValue::from_static("application/json"))],
        payload,
    )
        .into_response())
}

pub async fn method_not_allowed_handler(method: Method) -> RelayError {
    warn!(method = %method, "Chat request rejected: method not allowed");
    RelayError::MethodNotAllowed
}
