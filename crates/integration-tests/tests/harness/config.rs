//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use atelier_config::{Config, ServerConfig, UpstreamConfig};
use secrecy::SecretString;

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with minimal defaults
    pub fn new() -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    ..ServerConfig::default()
                },
                upstream: UpstreamConfig::default(),
            },
        }
    }

    /// Point the upstream at a mock backend
    pub fn with_upstream(mut self, base_url: &str) -> Self {
        self.config.upstream = UpstreamConfig {
            base_url: Some(base_url.parse().expect("valid URL")),
            model: Some("mock-image-model".to_owned()),
            api_key: Some(SecretString::from("test-key")),
        };
        self
    }

    /// Drop the upstream credential (for startup failure tests)
    pub fn without_api_key(mut self) -> Self {
        self.config.upstream.api_key = None;
        self
    }

    /// Disable the health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
