//! Client configuration.
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_STORAGE_KEY: &str = "clicker.session";

/// Runtime settings for the store and its transport.
///
/// Every field has a default so a partial JSON document is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the balance service, without trailing slash.
    pub api_base_url: String,
    /// Period of the automatic flush.
    pub flush_interval_ms: u32,
    /// Upper bound on a single request before it is treated as failed.
    pub request_timeout_ms: u32,
    /// Exposes the direct balance setter.
    pub dev_mode: bool,
    pub storage_key: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            flush_interval_ms: 5_000,
            request_timeout_ms: 10_000,
            dev_mode: false,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl ClientConfig {
    /// Parse a configuration document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Replace the API base URL when an override is present.
    #[must_use]
    pub fn with_api_override(mut self, api_base_url: Option<&str>) -> Self {
        if let Some(url) = api_base_url.map(str::trim).filter(|url| !url.is_empty()) {
            self.api_base_url = url.to_string();
        }
        self
    }

    #[must_use]
    pub const fn with_dev_mode(mut self, dev_mode: bool) -> Self {
        self.dev_mode = dev_mode;
        self
    }

    /// Join an endpoint path onto the API base URL.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.api_base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_documents_fill_defaults() {
        let cfg = ClientConfig::from_json(r#"{"flush_interval_ms": 1500}"#).unwrap();
        assert_eq!(cfg.flush_interval_ms, 1500);
        assert_eq!(cfg.request_timeout_ms, 10_000);
        assert_eq!(cfg.storage_key, DEFAULT_STORAGE_KEY);
        assert!(!cfg.dev_mode);
    }

    #[test]
    fn endpoint_joins_without_double_slashes() {
        let cfg = ClientConfig::default().with_api_override(Some("https://api.example.com/"));
        assert_eq!(
            cfg.endpoint("/get-balance"),
            "https://api.example.com/get-balance"
        );
        assert_eq!(cfg.endpoint("add-clicks"), "https://api.example.com/add-clicks");
    }

    #[test]
    fn blank_override_is_ignored() {
        let cfg = ClientConfig::default().with_api_override(Some("   "));
        assert_eq!(cfg.api_base_url, DEFAULT_API_BASE_URL);
    }
}
