use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Google API error envelope, e.g.
/// `{"error":{"code":404,"message":"models/x is not found","status":"NOT_FOUND"}}`.
#[derive(Debug, Deserialize, Serialize)]
pub struct GeminiErrorBody {
    #[serde(rename = "error")]
    pub inner: GeminiErrorObject,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeminiErrorObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(flatten)]
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, Value>,
}

impl GeminiErrorBody {
    /// Parse `bytes` and return `error.message` when present and non-empty.
    pub fn message_from_slice(bytes: &[u8]) -> Option<String> {
        serde_json::from_slice::<Self>(bytes)
            .ok()
            .and_then(|body| body.inner.message)
            .filter(|m| !m.trim().is_empty())
    }
}
