mod basic;
mod credential;
mod upstream;

pub use basic::BasicConfig;
pub use credential::Credential;
pub use upstream::{FallbackStrategy, UpstreamConfig};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Core server configuration (see `basic` table in config.toml).
    #[serde(default)]
    pub basic: BasicConfig,

    /// Upstream Gemini settings (see `upstream` table in config.toml).
    #[serde(default)]
    pub upstream: UpstreamConfig,
}

const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Conventional environment variable holding the upstream API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

impl Config {
    /// Builds a Figment that merges, in increasing priority: defaults, `config.toml` if present,
    /// `RELAY_<TABLE>__<FIELD>` variables and `GEMINI_API_KEY`.
    pub fn figment() -> Figment {
        let figment = Figment::new().merge(Serialized::defaults(Config::default()));
        let figment = if PathBuf::from(DEFAULT_CONFIG_FILE).is_file() {
            figment.merge(Toml::file(DEFAULT_CONFIG_FILE))
        } else {
            figment
        };
        figment
            .merge(Env::prefixed("RELAY_").split("__"))
            .merge(
                Env::raw()
                    .only(&[API_KEY_ENV])
                    .map(|_| "upstream.api_key".into()),
            )
    }

    /// Extracts and validates configuration from `figment`.
    ///
    /// A missing API key is accepted here: the relay still starts and answers every chat request
    /// with an error until the key is provided.
    pub fn from_figment(figment: &Figment) -> Result<Self, figment::Error> {
        let cfg: Self = figment.extract()?;
        if cfg.upstream.models.iter().all(|m| m.trim().is_empty()) {
            return Err(figment::Error::from(
                "upstream.models must contain at least one model name".to_string(),
            ));
        }
        if !is_literal_route(&cfg.basic.chat_path) || cfg.basic.chat_path == "/healthz" {
            return Err(figment::Error::from(format!(
                "basic.chat_path must be a literal path starting with '/' and must not be /healthz, got {:?}",
                cfg.basic.chat_path
            )));
        }
        Ok(cfg)
    }

    /// Loads configuration from defaults, `config.toml` and the environment.
    pub fn load() -> Result<Self, figment::Error> {
        Self::from_figment(&Self::figment())
    }

    /// The trimmed upstream API key, or `None` when unset or blank.
    pub fn credential(&self) -> Option<Credential> {
        Credential::resolve(self.upstream.api_key.as_deref())
    }
}

/// `true` when `path` is absolute and free of router capture syntax (`{..}`, `:x`, `*x`).
fn is_literal_route(path: &str) -> bool {
    path.starts_with('/')
        && !path.contains(['{', '}'])
        && path
            .split('/')
            .all(|segment| !segment.starts_with([':', '*']))
}
