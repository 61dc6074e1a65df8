pub mod gemini;

/// Upper bound on upstream body text kept in logs and error messages.
pub const UPSTREAM_BODY_PREVIEW_CHARS: usize = 300;
