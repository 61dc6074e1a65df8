use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use relay_schema::ChatErrorBody;
use thiserror::Error as ThisError;

/// Prefix of the message returned once every candidate model has failed.
pub const EXHAUSTED_PREFIX: &str = "All candidate models failed. Last error:";

#[derive(Debug, ThisError)]
pub enum RelayError {
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    /// No upstream API key is configured.
    #[error("Upstream API key is not configured (set GEMINI_API_KEY)")]
    MissingCredential,

    /// Inbound body exceeds `basic.max_body_bytes`.
    #[error("Payload Too Large")]
    PayloadTooLarge,

    /// Inbound body is not JSON.
    #[error("Invalid JSON body: {0}")]
    InvalidBody(String),

    /// Upstream answered with a non-2xx status.
    ///
    /// `message` is the upstream `error.message` when the body carries one, otherwise the raw
    /// body text.
    #[error("{message}")]
    UpstreamFailure { status: StatusCode, message: String },

    /// Transport-level failure (DNS, connect, timeouts, unreadable or non-JSON 2xx body).
    #[error("{message}")]
    TransportError { message: String },

    /// Every candidate failed; `last_error` describes the most recent failure.
    #[error("{prefix} {last_error}", prefix = EXHAUSTED_PREFIX)]
    CandidatesExhausted { last_error: String },
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            RelayError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            RelayError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            RelayError::MissingCredential
            | RelayError::UpstreamFailure { .. }
            | RelayError::TransportError { .. }
            | RelayError::CandidatesExhausted { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            RelayError::InvalidBody(reason) => {
                tracing::warn!(reason = %reason, "Chat request rejected: body is not JSON");
                "Invalid JSON body".to_string()
            }
            RelayError::UpstreamFailure {
                status: upstream_status,
                message,
            } => {
                tracing::error!(
                    upstream_status = %upstream_status,
                    message = %message,
                    "Upstream request failed"
                );
                message.clone()
            }
            RelayError::TransportError { message } => {
                tracing::error!(message = %message, "Upstream transport failed");
                message.clone()
            }
            RelayError::CandidatesExhausted { last_error } => {
                tracing::error!(last_error = %last_error, "All candidate models failed");
                self.to_string()
            }
            RelayError::PayloadTooLarge => {
                tracing::warn!("Chat request rejected: body exceeds the configured limit");
                self.to_string()
            }
            RelayError::MethodNotAllowed | RelayError::MissingCredential => self.to_string(),
        };
        (status, Json(ChatErrorBody::new(message))).into_response()
    }
}
