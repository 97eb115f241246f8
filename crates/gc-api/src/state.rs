//! # Application State
//!
//! Shared state for the Axum application: the API gateway, the webhook
//! verifier and the handler webhook events are dispatched to.

use gc_client::{ClientConfig, GoCardlessClient, LoggingWebhookHandler, WebhookHandler, WebhookVerifier};
use gc_core::SharedGateway;
use std::net::SocketAddr;
use std::sync::Arc;

/// Service configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid socket address {}:{}: {}", self.host, self.port, e))
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            environment: "development".to_string(),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Upstream API access
    pub gateway: SharedGateway,
    /// `None` when no webhook secret is configured
    pub verifier: Option<WebhookVerifier>,
    /// Receives every verified webhook event
    pub handler: Arc<dyn WebhookHandler>,
    pub config: AppConfig,
}

impl AppState {
    /// Build state from the environment, backed by the live HTTP client
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();
        let client_config = ClientConfig::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to load GoCardless config: {}", e))?;

        let verifier = client_config
            .webhook_secret
            .as_deref()
            .map(WebhookVerifier::new);
        if verifier.is_none() {
            tracing::warn!("GOCARDLESS_WEBHOOK_SECRET not set, webhooks will be rejected");
        }

        let client = GoCardlessClient::new(client_config)
            .map_err(|e| anyhow::anyhow!("Failed to initialize GoCardless client: {}", e))?;

        Ok(Self::with_gateway(Arc::new(client), verifier, config))
    }

    /// Build state around an existing gateway, logging webhook events
    pub fn with_gateway(
        gateway: SharedGateway,
        verifier: Option<WebhookVerifier>,
        config: AppConfig,
    ) -> Self {
        Self {
            gateway,
            verifier,
            handler: Arc::new(LoggingWebhookHandler),
            config,
        }
    }

    /// Replace the webhook handler
    pub fn with_handler(mut self, handler: Arc<dyn WebhookHandler>) -> Self {
        self.handler = handler;
        self
    }
}
