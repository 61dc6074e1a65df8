pub mod chat;
pub mod gemini;

pub use chat::{ChatErrorBody, ChatRequest};
pub use gemini::{Content, GeminiErrorBody, GeminiErrorObject, GenerateContentRequest, Part};
