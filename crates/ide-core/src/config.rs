use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_EXECUTION_URL: &str = "https://emkc.org/api/v2/piston/execute";

/// Client configuration, read from `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct IdeConfig {
    /// Root of the backend serving `/api/auth/*` and `/api/snippets`
    pub api_base_url: String,
    /// Execution sandbox endpoint
    pub execution_url: String,
    /// Timeout for authorized backend requests
    pub request_timeout_secs: u64,
    /// Timeout for the best-effort remote logout
    pub logout_timeout_secs: u64,
    /// Timeout for a code run
    pub execution_timeout_secs: u64,
}

impl Default for IdeConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            execution_url: DEFAULT_EXECUTION_URL.to_string(),
            request_timeout_secs: 30,
            logout_timeout_secs: 5,
            execution_timeout_secs: 30,
        }
    }
}

impl IdeConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn logout_timeout(&self) -> Duration {
        Duration::from_secs(self.logout_timeout_secs)
    }

    pub fn execution_timeout(&self) -> Duration {
        Duration::from_secs(self.execution_timeout_secs)
    }
}
