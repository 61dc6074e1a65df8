mod error;
mod generate_content_request;

pub use error::{GeminiErrorBody, GeminiErrorObject};
pub use generate_content_request::{Content, GenerateContentRequest, Part};
