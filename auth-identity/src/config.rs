use serde::{Deserialize, Serialize};

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Base URL of the identity service, e.g. `https://idp.example.com/api`
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Bearer token sent with every request
    #[serde(default)]
    pub token: Option<String>,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9443/api".to_string(),
            timeout_secs: default_timeout_secs(),
            token: None,
        }
    }
}
