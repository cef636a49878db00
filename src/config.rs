//! Application configuration
//!
//! Loads configuration from environment variables with sensible defaults.

use std::env;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Frontend assets directory
    pub frontend_dir: String,
    /// Endpoint of the external category classifier. Unset means keyword
    /// inference only.
    pub classifier_url: Option<String>,
    /// Request timeout for the external classifier
    pub classifier_timeout: Duration,
    /// Fill the store with the demo complaints on startup
    pub seed_demo_data: bool,
    /// CORS allowed origins
    pub cors_origins: Vec<String>,
    /// Environment (development/production)
    pub environment: Environment,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Environment {
    Development,
    Production,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let environment = match var("ENVIRONMENT")
            .unwrap_or_else(|| "development".to_string())
            .to_lowercase()
            .as_str()
        {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        };

        let port = match var("PORT") {
            Some(p) => p
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("PORT must be a port number, got '{}'", p)))?,
            None => 8080,
        };

        let classifier_url = var("CLASSIFIER_URL")
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        if let Some(url) = &classifier_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::Invalid(format!(
                    "CLASSIFIER_URL must be an http(s) URL, got '{}'",
                    url
                )));
            }
        }

        let classifier_timeout_ms: u64 = match var("CLASSIFIER_TIMEOUT_MS") {
            Some(ms) => ms.parse().map_err(|_| {
                ConfigError::Invalid(format!(
                    "CLASSIFIER_TIMEOUT_MS must be a number of milliseconds, got '{}'",
                    ms
                ))
            })?,
            None => 1500,
        };

        // Demo complaints are on by default outside production
        let seed_demo_data = match var("SEED_DEMO_DATA") {
            Some(flag) => parse_flag(&flag).ok_or_else(|| {
                ConfigError::Invalid(format!("SEED_DEMO_DATA must be true or false, got '{}'", flag))
            })?,
            None => environment == Environment::Development,
        };

        let cors_origins: Vec<String> = var("CORS_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_else(|| vec!["http://localhost:8080".to_string()]);
        if environment == Environment::Production && cors_origins.is_empty() {
            return Err(ConfigError::Missing(
                "CORS_ORIGINS is required in production".to_string(),
            ));
        }

        Ok(Config {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            frontend_dir: var("FRONTEND_DIR").unwrap_or_else(|| "./frontend".to_string()),
            classifier_url,
            classifier_timeout: Duration::from_millis(classifier_timeout_ms),
            seed_demo_data,
            cors_origins,
            environment,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Get the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
