use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// How the candidate model list is used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackStrategy {
    /// Try every candidate in order; first success wins.
    #[default]
    Fallback,
    /// Only the first candidate; its failure is reported as-is.
    Single,
}

/// Upstream Gemini configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Base URL of the generative-language API.
    /// TOML: `upstream.base_url`. Default: `https://generativelanguage.googleapis.com`.
    #[serde(default = "default_base_url")]
    pub base_url: Url,

    /// Upstream API key. Also read from `GEMINI_API_KEY`, which takes precedence.
    /// TOML: `upstream.api_key`. Default: unset.
    #[serde(default, deserialize_with = "deserialize_api_key_lax")]
    pub api_key: Option<String>,

    /// Ordered candidate model names.
    /// TOML: `upstream.models`.
    #[serde(default = "default_models")]
    pub models: Vec<String>,

    /// TOML: `upstream.strategy` (`"fallback"` or `"single"`). Default: `fallback`.
    #[serde(default)]
    pub strategy: FallbackStrategy,

    /// Total time allowed for one upstream attempt, in seconds.
    /// TOML: `upstream.request_timeout_secs`. Default: `60`.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// TOML: `upstream.connect_timeout_secs`. Default: `10`.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Optional upstream HTTP proxy. If set, used for the reqwest client.
    /// TOML: `upstream.proxy`. Example: `http://127.0.0.1:1080`.
    #[serde(default)]
    pub proxy: Option<Url>,

    /// Allow HTTP/2 multiplexing for the reqwest client; disabled forces HTTP/1.
    /// TOML: `upstream.enable_multiplexing`. Default: `false`.
    #[serde(default)]
    pub enable_multiplexing: bool,
}

impl UpstreamConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Non-blank model names, in configured order.
    pub fn candidates(&self) -> impl Iterator<Item = &str> {
        self.models
            .iter()
            .map(|m| m.trim())
            .filter(|m| !m.is_empty())
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            models: default_models(),
            strategy: FallbackStrategy::default(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            proxy: None,
            enable_multiplexing: false,
        }
    }
}

fn deserialize_api_key_lax<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(_) => Err(serde::de::Error::custom(
            "expected a string or a number for upstream.api_key",
        )),
    }
}

fn default_base_url() -> Url {
    Url::parse("https://generativelanguage.googleapis.com").expect("valid Gemini API base URL")
}

fn default_models() -> Vec<String> {
    ["gemini-1.5-flash", "gemini-1.5-flash-001", "gemini-pro"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_connect_timeout_secs() -> u64 {
    10
}
