//! Gemini v1beta `generateContent` request body, reduced to the single-turn
//! shape the relay sends.

use crate::chat::ChatRequest;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Gemini `generateContent` request body.
///
/// Reference: <https://ai.google.dev/gemini-api/docs/text-generation>
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,

    pub system_instruction: Content,
}

/// A single conversation turn or system instruction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    /// Usually `"user"` or `"model"`. Absent for `systemInstruction`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    pub parts: Vec<Part>,
}

/// One text part.
///
/// `text` is raw JSON rather than `String` so the caller's value reaches the
/// upstream untouched, even when it is not a string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    pub text: Value,
}

impl Content {
    fn text_only(text: Value) -> Self {
        Self {
            role: None,
            parts: vec![Part { text }],
        }
    }
}

impl From<&ChatRequest> for GenerateContentRequest {
    fn from(chat: &ChatRequest) -> Self {
        Self {
            contents: vec![Content::text_only(chat.message.clone())],
            system_instruction: Content::text_only(chat.system_prompt.clone()),
        }
    }
}
