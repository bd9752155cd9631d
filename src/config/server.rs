//! Server configuration

use std::net::SocketAddr;

use serde::Deserialize;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub environment: Environment,

    /// `EnvFilter` directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Upper bound for any single request, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Comma-separated browser origins allowed by CORS
    pub cors_origins: Option<String>,

    /// Public URL of the web frontend; allowed by CORS when no explicit
    /// origins are configured
    pub public_base_url: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ValidationError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ValidationError::InvalidHost(self.host.clone()))
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Origins the CORS layer should allow.
    pub fn allowed_origins(&self) -> Vec<String> {
        let explicit: Vec<String> = self
            .cors_origins
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if !explicit.is_empty() {
            return explicit;
        }
        self.public_base_url
            .iter()
            .map(|url| url.trim_end_matches('/').to_string())
            .collect()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        if !(1..=300).contains(&self.request_timeout_secs) {
            return Err(ValidationError::InvalidTimeout);
        }
        self.socket_addr()?;
        if let Some(url) = &self.public_base_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ValidationError::InvalidUrl("SERVER__PUBLIC_BASE_URL"));
            }
            if self.is_production() && !url.starts_with("https://") {
                return Err(ValidationError::MustBeHttps("SERVER__PUBLIC_BASE_URL"));
            }
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: Environment::default(),
            log_level: default_log_level(),
            request_timeout_secs: default_request_timeout(),
            cors_origins: None,
            public_base_url: None,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info,market_academy=debug,sqlx=warn,tower_http=info".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bind_all_interfaces_in_development() {
        let config = ServerConfig::default();
        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:8080");
        assert!(!config.is_production());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn explicit_cors_origins_win_over_base_url() {
        let config = ServerConfig {
            cors_origins: Some("http://localhost:5173, ,https://academy.example.com".to_string()),
            public_base_url: Some("https://ignored.example.com".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.allowed_origins(),
            vec!["http://localhost:5173", "https://academy.example.com"]
        );
    }

    #[test]
    fn base_url_is_the_fallback_origin() {
        let config = ServerConfig {
            public_base_url: Some("https://academy.example.com/".to_string()),
            ..Default::default()
        };
        assert_eq!(config.allowed_origins(), vec!["https://academy.example.com"]);
        assert!(ServerConfig::default().allowed_origins().is_empty());
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        for config in [
            ServerConfig { port: 0, ..Default::default() },
            ServerConfig { request_timeout_secs: 0, ..Default::default() },
            ServerConfig { request_timeout_secs: 301, ..Default::default() },
        ] {
            assert!(config.validate().is_err());
        }
        let bad_host = ServerConfig {
            host: "not a host".to_string(),
            ..Default::default()
        };
        assert!(matches!(bad_host.validate(), Err(ValidationError::InvalidHost(_))));
    }

    #[test]
    fn production_base_url_requires_https() {
        let mut config = ServerConfig {
            public_base_url: Some("http://academy.example.com".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        config.environment = Environment::Production;
        assert!(matches!(config.validate(), Err(ValidationError::MustBeHttps(_))));
    }
}
