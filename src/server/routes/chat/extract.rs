use crate::config::Credential;
use crate::error::RelayError;
use crate::server::router::RelayState;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::StatusCode,
};
use relay_schema::ChatRequest;
use serde_json::Value;
use tracing::info;

/// Chat envelope plus the credential it will be sent with.
///
/// The credential is checked before the body is read, so a relay without a key never parses or
/// forwards anything.
pub struct ChatPreprocess(pub ChatRequest, pub Credential);

impl<S> FromRequest<S> for ChatPreprocess
where
    S: Send + Sync + std::borrow::Borrow<RelayState>,
{
    type Rejection = RelayError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let state: &RelayState = state.borrow();

        info!(
            method = %req.method(),
            has_credential = state.credential.is_some(),
            "Incoming chat request"
        );

        let credential = state
            .credential
            .clone()
            .ok_or(RelayError::MissingCredential)?;

        let bytes = Bytes::from_request(req, &())
            .await
            .map_err(|rejection| {
                if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                    RelayError::PayloadTooLarge
                } else {
                    RelayError::InvalidBody(rejection.to_string())
                }
            })?;

        let value: Value = serde_json::from_slice(&bytes)
            .map_err(|e| RelayError::InvalidBody(e.to_string()))?;

        Ok(ChatPreprocess(ChatRequest::from(value), credential))
    }
}
