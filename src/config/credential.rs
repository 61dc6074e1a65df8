use std::fmt;
use std::sync::Arc;

/// Upstream API key.
///
/// Always trimmed and non-empty. `Debug` and `Display` never print the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(Arc<str>);

impl Credential {
    /// Trim `raw` and wrap it, or return `None` when it is absent or blank.
    pub fn resolve(raw: Option<&str>) -> Option<Self> {
        raw.map(str::trim)
            .filter(|key| !key.is_empty())
            .map(|key| Self(Arc::from(key)))
    }

    /// The raw key, for building the outbound request only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}
