use crate::config::FallbackStrategy;
use crate::error::RelayError;
use crate::providers::UPSTREAM_BODY_PREVIEW_CHARS;
use crate::utils::logging::preview;
use relay_schema::GeminiErrorBody;
use reqwest::StatusCode;

/// Why a single candidate did not produce a payload.
#[derive(Debug)]
pub enum AttemptFailure {
    /// Upstream answered with a non-2xx status.
    Status { status: StatusCode, body: String },

    /// Upstream answered 2xx but the body was not JSON.
    InvalidPayload { status: StatusCode, message: String },

    /// The request never produced a response (DNS, connect, timeout, body read).
    Transport { message: String },
}

impl AttemptFailure {
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        // The request URL carries the API key.
        let err = err.without_url();
        let chain = error_chain(&err);
        let message = if err.is_timeout() {
            format!("upstream request timed out: {chain}")
        } else {
            chain
        };
        AttemptFailure::Transport { message }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            AttemptFailure::Status { status, .. } | AttemptFailure::InvalidPayload { status, .. } => {
                Some(*status)
            }
            AttemptFailure::Transport { .. } => None,
        }
    }

    /// Upstream `error.message` when the body carries one, otherwise the (truncated) body text.
    pub fn message(&self) -> String {
        match self {
            AttemptFailure::Status { body, .. } => GeminiErrorBody::message_from_slice(body.as_bytes())
                .unwrap_or_else(|| {
                    let trimmed = body.trim();
                    if trimmed.is_empty() {
                        "empty response body".to_string()
                    } else {
                        preview(trimmed, UPSTREAM_BODY_PREVIEW_CHARS)
                    }
                }),
            AttemptFailure::InvalidPayload { message, .. } | AttemptFailure::Transport { message } => {
                message.clone()
            }
        }
    }

    /// One-line description including the status, used as the "last error".
    pub fn detail(&self) -> String {
        match self.status() {
            Some(status) => format!("HTTP {status}: {}", self.message()),
            None => self.message(),
        }
    }
}

/// `err` followed by every `source()` below it, joined with `": "`.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.ends_with(text.as_str()) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

impl From<AttemptFailure> for RelayError {
    fn from(failure: AttemptFailure) -> Self {
        match failure {
            AttemptFailure::Status { status, .. } => RelayError::UpstreamFailure {
                status,
                message: failure.message(),
            },
            AttemptFailure::InvalidPayload { message, .. } | AttemptFailure::Transport { message } => {
                RelayError::TransportError { message }
            }
        }
    }
}

/// Failures collected while walking the candidate list, in attempt order.
#[derive(Debug, Default)]
pub struct FallbackReport {
    failures: Vec<(String, AttemptFailure)>,
}

impl FallbackReport {
    pub fn push(&mut self, model: &str, failure: AttemptFailure) {
        self.failures.push((model.to_string(), failure));
    }

    pub(crate) fn len(&self) -> usize {
        self.failures.len()
    }

    pub(crate) fn models(&self) -> impl Iterator<Item = &str> {
        self.failures.iter().map(|(model, _)| model.as_str())
    }

    pub fn last(&self) -> Option<&AttemptFailure> {
        self.failures.last().map(|(_, failure)| failure)
    }

    /// Final error for the caller once no candidate is left.
    pub fn into_error(mut self, strategy: FallbackStrategy) -> RelayError {
        match strategy {
            FallbackStrategy::Single => match self.failures.pop() {
                Some((_, failure)) => failure.into(),
                None => RelayError::CandidatesExhausted {
                    last_error: "no candidate models configured".to_string(),
                },
            },
            FallbackStrategy::Fallback => RelayError::CandidatesExhausted {
                last_error: self
                    .last()
                    .map_or_else(|| "no candidate models configured".to_string(), AttemptFailure::detail),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_failure(status: StatusCode, body: &str) -> AttemptFailure {
        AttemptFailure::Status {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn message_prefers_google_error_message() {
        let failure = status_failure(
            StatusCode::NOT_FOUND,
            r#"{"error":{"code":404,"message":"models/gemini-x is not found","status":"NOT_FOUND"}}"#,
        );
        assert_eq!(failure.message(), "models/gemini-x is not found");
        assert_eq!(
            failure.detail(),
            "HTTP 404 Not Found: models/gemini-x is not found"
        );
    }

    #[test]
    fn message_falls_back_to_raw_body() {
        let failure = status_failure(StatusCode::BAD_GATEWAY, "  upstream exploded \n");
        assert_eq!(failure.message(), "upstream exploded");

        let failure = status_failure(StatusCode::SERVICE_UNAVAILABLE, "");
        assert_eq!(failure.message(), "empty response body");
    }

    #[test]
    fn long_bodies_are_truncated() {
        let failure = status_failure(StatusCode::BAD_GATEWAY, &"x".repeat(1000));
        assert_eq!(failure.message().len(), UPSTREAM_BODY_PREVIEW_CHARS);
    }

    #[test]
    fn transport_detail_has_no_status() {
        let failure = AttemptFailure::Transport {
            message: "connection refused".to_string(),
        };
        assert!(failure.status().is_none());
        assert_eq!(failure.detail(), "connection refused");
    }

    #[derive(Debug)]
    struct Layer(&'static str, Option<Box<Layer>>);

    impl std::fmt::Display for Layer {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(self.0)
        }
    }

    impl std::error::Error for Layer {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            self.1.as_deref().map(|e| e as _)
        }
    }

    #[test]
    fn error_chain_includes_every_cause() {
        let err = Layer(
            "error sending request",
            Some(Box::new(Layer(
                "client error (Connect)",
                Some(Box::new(Layer("Connection refused (os error 111)", None))),
            ))),
        );
        assert_eq!(
            error_chain(&err),
            "error sending request: client error (Connect): Connection refused (os error 111)"
        );
    }

    #[test]
    fn error_chain_skips_repeated_cause_text() {
        let err = Layer("tcp connect error", Some(Box::new(Layer("tcp connect error", None))));
        assert_eq!(error_chain(&err), "tcp connect error");
    }

    #[test]
    fn fallback_report_uses_last_failure() {
        let mut report = FallbackReport::default();
        report.push("a", status_failure(StatusCode::NOT_FOUND, "first"));
        report.push("b", status_failure(StatusCode::TOO_MANY_REQUESTS, "second"));
        assert_eq!(report.models().collect::<Vec<_>>(), vec!["a", "b"]);

        match report.into_error(FallbackStrategy::Fallback) {
            RelayError::CandidatesExhausted { last_error } => {
                assert_eq!(last_error, "HTTP 429 Too Many Requests: second");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn single_strategy_reports_upstream_message() {
        let mut report = FallbackReport::default();
        report.push(
            "a",
            status_failure(StatusCode::BAD_REQUEST, r#"{"error":{"message":"API key not valid"}}"#),
        );

        match report.into_error(FallbackStrategy::Single) {
            RelayError::UpstreamFailure { status, message } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(message, "API key not valid");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn single_strategy_transport_failure() {
        let mut report = FallbackReport::default();
        report.push(
            "a",
            AttemptFailure::Transport {
                message: "dns error".to_string(),
            },
        );
        assert!(matches!(
            report.into_error(FallbackStrategy::Single),
            RelayError::TransportError { message } if message == "dns error"
        ));
    }
}
