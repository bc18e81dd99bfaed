use crate::constants::DEFAULT_NETANYA_ENDPOINT;
use crate::error::{Result, ServiceError};
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub debug_mode: bool,
    pub environment: String,
    pub port: u16,
    pub log_level: String,
    pub netanya_endpoint: String,
    pub request_timeout_seconds: u64,
    pub max_retries: u32,
    pub session_warmup: bool,
}

impl AppConfig {
    /// Load configuration from environment variables with defaults.
    pub fn load() -> Result<Self> {
        let debug_mode = parse_boolean(&env::var("DEBUG_MODE").unwrap_or_else(|_| "true".to_string()));
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let port = parse_int(&env::var("PORT").unwrap_or_else(|_| "8000".to_string()), "PORT")?;
        if port == 0 || port > u64::from(u16::MAX) {
            return Err(ServiceError::Config(format!(
                "Invalid PORT '{}'. Must be between 1 and 65535.",
                port
            )));
        }
        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let netanya_endpoint =
            env::var("NETANYA_ENDPOINT").unwrap_or_else(|_| DEFAULT_NETANYA_ENDPOINT.to_string());
        let request_timeout_seconds = parse_int(
            &env::var("REQUEST_TIMEOUT_SECONDS").unwrap_or_else(|_| "30".to_string()),
            "REQUEST_TIMEOUT_SECONDS",
        )?;
        let max_retries = parse_int(
            &env::var("MAX_RETRIES").unwrap_or_else(|_| "3".to_string()),
            "MAX_RETRIES",
        )?;
        let session_warmup =
            parse_boolean(&env::var("SESSION_WARMUP").unwrap_or_else(|_| "true".to_string()));

        let config = Self {
            debug_mode,
            environment,
            port: port as u16,
            log_level,
            netanya_endpoint,
            request_timeout_seconds,
            max_retries: max_retries as u32,
            session_warmup,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration and fail fast if invalid.
    pub fn validate(&self) -> Result<()> {
        let valid_environments = ["development", "staging", "production"];
        if !valid_environments.contains(&self.environment.as_str()) {
            return Err(ServiceError::Config(format!(
                "Invalid ENVIRONMENT '{}'. Must be one of: {}",
                self.environment,
                valid_environments.join(", ")
            )));
        }

        if self.port == 0 {
            return Err(ServiceError::Config(
                "Invalid PORT '0'. Must be between 1 and 65535.".to_string(),
            ));
        }

        if self.environment == "production"
            && !self.debug_mode
            && !self.netanya_endpoint.starts_with("https://")
        {
            return Err(ServiceError::Config(format!(
                "Production mode requires HTTPS endpoints. NETANYA_ENDPOINT must start with 'https://': {}",
                self.netanya_endpoint
            )));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ServiceError::Config(format!(
                "Invalid LOG_LEVEL '{}'. Must be one of: {}",
                self.log_level,
                valid_log_levels.join(", ")
            )));
        }

        Ok(())
    }
}

fn parse_boolean(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}

fn parse_int(value: &str, name: &str) -> Result<u64> {
    value
        .parse::<u64>()
        .map_err(|_| ServiceError::Config(format!("Invalid integer value for {}: {}", name, value)))
}
