//! Client-side configuration shared by the CLI and the web app.

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Where the metadata client sends requests.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server root; empty means same-origin relative URLs (the web app).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout for the native client; ignored by the wasm fetch backend.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ClientConfig {
    /// Configuration for a browser build talking to its own origin.
    pub fn same_origin() -> Self {
        Self {
            base_url: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: ClientConfig = serde_json::from_str(r#"{"base_url":"http://nav"}"#).unwrap();
        assert_eq!(config.base_url, "http://nav");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }
}
