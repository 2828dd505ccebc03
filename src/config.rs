use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Web server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct WebConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Honour `X-Forwarded-Proto` from a fronting proxy when building URLs
    #[serde(default = "default_trust_forwarded_proto")]
    pub trust_forwarded_proto: bool,
    /// Largest accepted request body, in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_trust_forwarded_proto() -> bool {
    true
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            trust_forwarded_proto: default_trust_forwarded_proto(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl WebConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Root application configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub web: WebConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        Self::builder(Environment::with_prefix("SECRETDROP"))
            .build()?
            .try_deserialize()
    }

    fn builder(env: Environment) -> config::ConfigBuilder<config::builder::DefaultState> {
        Config::builder()
            // Start with default config file
            .add_source(File::with_name("config/default").required(false))
            // Override with local config if present
            .add_source(File::with_name("config/local").required(false))
            // e.g., SECRETDROP_WEB__PORT, SECRETDROP_WEB__TRUST_FORWARDED_PROTO
            .add_source(env.prefix_separator("_").separator("__").try_parsing(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load_with(vars: &[(&str, &str)]) -> AppConfig {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::builder(Environment::with_prefix("SECRETDROP").source(Some(source)))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults_without_any_source() {
        let config = load_with(&[]);
        assert_eq!(config.web.bind_addr(), "0.0.0.0:8080");
        assert!(config.web.trust_forwarded_proto);
        assert_eq!(config.web.max_body_bytes, 65536);
    }

    #[test]
    fn test_environment_overrides() {
        let config = load_with(&[
            ("SECRETDROP_WEB__HOST", "127.0.0.1"),
            ("SECRETDROP_WEB__PORT", "3000"),
            ("SECRETDROP_WEB__TRUST_FORWARDED_PROTO", "false"),
        ]);
        assert_eq!(config.web.bind_addr(), "127.0.0.1:3000");
        assert!(!config.web.trust_forwarded_proto);
    }
}
