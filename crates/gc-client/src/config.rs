//! # Client Configuration
//!
//! Configuration management for the GoCardless Pro client.
//! Secrets are loaded from environment variables.

use gc_core::ApiError;
use std::env;
use std::time::Duration;

pub const SANDBOX_URL: &str = "https://api-sandbox.gocardless.com/";
pub const LIVE_URL: &str = "https://api.gocardless.com/";
pub const DEFAULT_API_VERSION: &str = "2015-07-06";

/// Which GoCardless environment requests are sent to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Sandbox,
    Live,
}

impl Environment {
    /// `live` or `production` select Live; anything else is Sandbox
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "live" | "production" => Environment::Live,
            _ => Environment::Sandbox,
        }
    }

    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Sandbox => SANDBOX_URL,
            Environment::Live => LIVE_URL,
        }
    }
}

/// GoCardless API configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Bearer access token
    pub access_token: String,

    /// Value of the `GoCardless-Version` header
    pub api_version: String,

    pub environment: Environment,

    /// API base URL, always ending in `/` (overridable for testing)
    pub api_base_url: String,

    /// Webhook endpoint secret
    pub webhook_secret: Option<String>,

    /// Per-request timeout
    pub timeout: Duration,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `GOCARDLESS_ACCESS_TOKEN`
    ///
    /// Optional:
    /// - `GOCARDLESS_VERSION` (default `2015-07-06`)
    /// - `GOCARDLESS_ENVIRONMENT` (`live`/`production`, otherwise sandbox)
    /// - `GOCARDLESS_WEBHOOK_SECRET`
    /// - `GOCARDLESS_API_BASE_URL`
    pub fn from_env() -> Result<Self, ApiError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let access_token = env::var("GOCARDLESS_ACCESS_TOKEN").map_err(|_| {
            ApiError::Configuration("GOCARDLESS_ACCESS_TOKEN not set".to_string())
        })?;

        if access_token.trim().is_empty() {
            return Err(ApiError::Configuration(
                "GOCARDLESS_ACCESS_TOKEN is empty".to_string(),
            ));
        }

        let environment = env::var("GOCARDLESS_ENVIRONMENT")
            .map(|v| Environment::parse(&v))
            .unwrap_or(Environment::Sandbox);

        let mut config = Self::new(access_token, environment);

        if let Ok(version) = env::var("GOCARDLESS_VERSION") {
            config.api_version = version;
        }
        if let Ok(secret) = env::var("GOCARDLESS_WEBHOOK_SECRET") {
            config.webhook_secret = Some(secret);
        }
        if let Ok(url) = env::var("GOCARDLESS_API_BASE_URL") {
            config = config.with_api_base_url(url);
        }

        Ok(config)
    }

    /// Create config with explicit values
    pub fn new(access_token: impl Into<String>, environment: Environment) -> Self {
        Self {
            access_token: access_token.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            environment,
            api_base_url: environment.base_url().to_string(),
            webhook_secret: None,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn is_live(&self) -> bool {
        self.environment == Environment::Live
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        let mut url = url.into();
        if !url.ends_with('/') {
            url.push('/');
        }
        self.api_base_url = url;
        self
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn with_webhook_secret(mut self, secret: impl Into<String>) -> Self {
        self.webhook_secret = Some(secret.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
