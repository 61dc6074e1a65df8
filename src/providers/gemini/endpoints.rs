use crate::config::Credential;
use url::Url;

/// Builds `generateContent` URLs against a configurable base.
#[derive(Debug, Clone)]
pub struct GeminiEndpoints {
    base: Url,
}

impl GeminiEndpoints {
    pub fn new(base: Url) -> Self {
        Self { base }
    }

    /// `{base}/v1beta/models/{model}:generateContent?key={credential}`
    ///
    /// The returned URL embeds the key and must never be logged.
    pub fn generate_content(&self, model: &str, credential: &Credential) -> Url {
        let mut url = self.base.clone();
        url.set_path(&format!("/v1beta/models/{model}:generateContent"));
        url.set_query(None);
        url.query_pairs_mut()
            .append_pair("key", credential.expose());
        url
    }
}
