//! Service configuration.
//!
//! Built once at startup from environment variables (with `.env` support)
//! and passed explicitly to the components that need it. There is no
//! process-wide configuration singleton.

use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    /// Bind port for the HTTP server
    pub port: u16,
    /// SQLite database path
    pub database_path: String,
    /// Secret used to validate bearer JWTs
    pub jwt_secret: String,
    /// Base URL of the external payment-status service
    pub payment_api_base: String,
    /// API key for the payment-status service, if it requires one
    pub payment_api_key: Option<String>,
    /// Timeout for payment-status lookups
    pub payment_timeout: Duration,
    /// Shared secret expected on the enrollment push endpoint. When unset,
    /// the push endpoint accepts unauthenticated notifications.
    pub enrollment_push_token: Option<String>,
    /// Where the completion callback redirects the browser
    pub dashboard_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env_parsed("MATCHDAY_PORT", 8080),
            database_path: env::var("MATCHDAY_DB_PATH")
                .unwrap_or_else(|_| "matchday.db".to_string()),
            jwt_secret: env::var("MATCHDAY_JWT_SECRET")
                .unwrap_or_else(|_| "dev-secret-change-me".to_string()),
            payment_api_base: env::var("PAYMENT_API_BASE")
                .unwrap_or_else(|_| "https://payments.example.com/api".to_string()),
            payment_api_key: env::var("PAYMENT_API_KEY").ok().filter(|k| !k.is_empty()),
            payment_timeout: Duration::from_secs(env_parsed("PAYMENT_TIMEOUT_SECS", 10u64)),
            enrollment_push_token: env::var("ENROLLMENT_PUSH_TOKEN")
                .ok()
                .filter(|t| !t.is_empty()),
            dashboard_url: env::var("DASHBOARD_URL")
                .unwrap_or_else(|_| "/dashboard".to_string()),
        }
    }
}

fn env_parsed<T: std::str::FromStr>(var: &str, default: T) -> T {
    env::var(var)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
