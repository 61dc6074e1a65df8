//! Wire types exchanged with the calling web page.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Inbound chat envelope posted by the front-end.
///
/// Both fields are kept as raw JSON so that whatever the caller sent is
/// forwarded verbatim. A missing field becomes `null`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Value,

    #[serde(default)]
    pub system_prompt: Value,
}

impl From<Value> for ChatRequest {
    /// Pull `message` and `systemPrompt` out of any JSON value. Anything that is not an object
    /// yields an envelope of nulls.
    fn from(value: Value) -> Self {
        match value {
            Value::Object(mut map) => Self {
                message: map.remove("message").unwrap_or_default(),
                system_prompt: map.remove("systemPrompt").unwrap_or_default(),
            },
            _ => Self::default(),
        }
    }
}

/// Error payload returned to the caller for every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatErrorBody {
    pub error: String,
}

impl ChatErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
