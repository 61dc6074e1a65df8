mod client;
mod endpoints;
mod failure;

pub use client::GeminiClient;
pub use endpoints::GeminiEndpoints;
pub use failure::{AttemptFailure, FallbackReport};
