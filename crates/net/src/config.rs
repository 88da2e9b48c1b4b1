use serde::{Deserialize, Serialize};

/// Production ad-serving backend.
pub const DEFAULT_API_BASE_URL: &str = "https://billboards-api.metaviu.io";
/// Destination opened when no ad has been resolved.
pub const DEFAULT_REDIRECT_URL: &str = "https://metaviu.io";

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL the endpoint paths are appended to.
    pub api_base_url: String,
    /// Fallback click destination.
    pub default_redirect_url: String,
    /// Integration vendor tag sent with ad requests.
    pub vendor: String,
    /// Integration protocol version tag sent with ad requests.
    pub protocol_version: String,
    /// Per-request timeout in seconds; `0` disables the timeout.
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            default_redirect_url: DEFAULT_REDIRECT_URL.to_string(),
            vendor: "Decentraland".to_string(),
            protocol_version: "SDK7-Alpha".to_string(),
            request_timeout_secs: 15,
        }
    }
}

impl ClientConfig {
    /// Config pointing at a different backend, other fields defaulted.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Full URL of an endpoint path.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url.trim_end_matches('/'), path)
    }
}
