use super::{AttemptFailure, FallbackReport, GeminiEndpoints};
use crate::config::{Credential, FallbackStrategy, UpstreamConfig};
use crate::error::RelayError;
use crate::providers::UPSTREAM_BODY_PREVIEW_CHARS;
use crate::utils::logging::{preview, with_pretty_json_debug};
use axum::body::Bytes;
use relay_schema::GenerateContentRequest;
use serde::de::IgnoredAny;
use tracing::{debug, info, warn};

/// Outbound caller for `generateContent` with ordered model fallback.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    endpoints: GeminiEndpoints,
    models: Vec<String>,
    strategy: FallbackStrategy,
}

impl GeminiClient {
    pub fn new(cfg: &UpstreamConfig, client: reqwest::Client) -> Self {
        Self {
            client,
            endpoints: GeminiEndpoints::new(cfg.base_url.clone()),
            models: cfg.candidates().map(str::to_string).collect(),
            strategy: cfg.strategy,
        }
    }

    /// Models that will be tried, in order.
    pub fn candidates(&self) -> &[String] {
        match self.strategy {
            FallbackStrategy::Fallback => &self.models,
            FallbackStrategy::Single => &self.models[..self.models.len().min(1)],
        }
    }

    /// One outbound call for `model`. No retries.
    ///
    /// A 2xx body is checked to be JSON and returned byte for byte.
    pub async fn attempt(
        &self,
        credential: &Credential,
        model: &str,
        body: &GenerateContentRequest,
    ) -> Result<Bytes, AttemptFailure> {
        let url = self.endpoints.generate_content(model, credential);

        let resp = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(AttemptFailure::from_reqwest)?;

        let status = resp.status();
        let bytes = resp.bytes().await.map_err(AttemptFailure::from_reqwest)?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes).into_owned();
            debug!(
                model,
                %status,
                body = %preview(&body, UPSTREAM_BODY_PREVIEW_CHARS),
                "Upstream returned error body"
            );
            return Err(AttemptFailure::Status { status, body });
        }

        serde_json::from_slice::<IgnoredAny>(&bytes).map_err(|e| {
            AttemptFailure::InvalidPayload {
                status,
                message: format!("invalid JSON in upstream response: {e}"),
            }
        })?;
        Ok(bytes)
    }

    /// Walk the candidates in order and return the first successful payload.
    pub async fn generate(
        &self,
        credential: &Credential,
        body: &GenerateContentRequest,
    ) -> Result<Bytes, RelayError> {
        with_pretty_json_debug(body, |pretty| {
            debug!(body = %pretty, "Outbound generateContent body");
        });

        let candidates = self.candidates();
        let total = candidates.len();
        let mut report = FallbackReport::default();

        for (idx, model) in candidates.iter().enumerate() {
            info!(model = %model, attempt = idx + 1, total, "Trying upstream model");

            match self.attempt(credential, model, body).await {
                Ok(payload) => {
                    info!(
                        model = %model,
                        failed_before = report.len(),
                        "Upstream model succeeded"
                    );
                    return Ok(payload);
                }
                Err(failure) => {
                    warn!(
                        model = %model,
                        status = ?failure.status(),
                        detail = %failure.detail(),
                        remaining = total - idx - 1,
                        "Upstream model failed"
                    );
                    report.push(model, failure);
                }
            }
        }

        warn!(
            failed_models = ?report.models().collect::<Vec<_>>(),
            "No candidate model succeeded"
        );
        Err(report.into_error(self.strategy))
    }
}
