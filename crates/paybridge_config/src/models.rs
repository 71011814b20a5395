// --- File: crates/paybridge_config/src/models.rs ---

use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_STRIPE_API_BASE_URL: &str = "https://api.stripe.com";

/// Stripe's own client libraries reject signatures older than five minutes.
pub const DEFAULT_WEBHOOK_TOLERANCE_SECS: u64 = 300;

/// Marker value that tells the loader to look the secret up in the environment.
pub const SECRET_FROM_ENV: &str = "secret_from_env";

// --- General Server Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

// --- Stripe Config ---
// Secrets are resolved from env vars after loading, see `apply_secret_overrides`.
#[derive(Deserialize, Serialize, Clone)]
pub struct StripeConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Secret API key (sk_...). Loaded via STRIPE_SECRET_KEY.
    #[serde(default, skip_serializing)]
    pub secret_key: Option<String>,
    /// Webhook signing secret (whsec_...). Loaded via STRIPE_WEBHOOK_SECRET.
    #[serde(default, skip_serializing)]
    pub webhook_secret: Option<String>,
    /// Maximum age of a webhook signature timestamp, in seconds.
    #[serde(default = "default_webhook_tolerance_secs")]
    pub webhook_tolerance_secs: u64,
}

fn default_api_base_url() -> String {
    DEFAULT_STRIPE_API_BASE_URL.to_string()
}

fn default_webhook_tolerance_secs() -> u64 {
    DEFAULT_WEBHOOK_TOLERANCE_SECS
}

impl Default for StripeConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            secret_key: None,
            webhook_secret: None,
            webhook_tolerance_secs: default_webhook_tolerance_secs(),
        }
    }
}

impl fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |s: &Option<String>| s.as_ref().map(|_| "<redacted>");
        f.debug_struct("StripeConfig")
            .field("api_base_url", &self.api_base_url)
            .field("secret_key", &redact(&self.secret_key))
            .field("webhook_secret", &redact(&self.webhook_secret))
            .field("webhook_tolerance_secs", &self.webhook_tolerance_secs)
            .finish()
    }
}

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_stripe: bool,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub stripe: Option<StripeConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stripe_config_debug_redacts_secrets() {
        let cfg = StripeConfig {
            secret_key: Some("sk_test_123".to_string()),
            webhook_secret: Some("whsec_abc".to_string()),
            ..StripeConfig::default()
        };
        let printed = format!("{:?}", cfg);
        assert!(!printed.contains("sk_test_123"));
        assert!(!printed.contains("whsec_abc"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn stripe_config_defaults() {
        let cfg = StripeConfig::default();
        assert_eq!(cfg.api_base_url, "https://api.stripe.com");
        assert_eq!(cfg.webhook_tolerance_secs, 300);
        assert!(cfg.secret_key.is_none());
    }
}
