//! Configuration validation.
//!
//! Collects every problem in one pass so a misconfigured deployment
//! reports all of them at startup.

use crate::{AppConfig, DatabaseConfig, ObservabilityConfig, SecurityConfig, ServerConfig, StoreKind};
use std::fmt;
use url::Url;

/// Configuration validation error variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    /// JWT secret is too short.
    JwtSecretTooShort { actual: usize, minimum: usize },
    /// Port number is invalid.
    InvalidPort { value: u16 },
    /// Pool size configuration is invalid (min must be <= max).
    InvalidPoolSize { min: u32, max: u32 },
    /// URL format is invalid.
    InvalidUrl { url_type: String, message: String },
    /// Timeout value must be positive.
    NonPositiveTimeout { name: String },
    /// Password hash cost is out of range.
    InvalidHashCost { value: u32, minimum: u32, maximum: u32 },
    /// Lockout policy is unusable.
    InvalidLockoutPolicy { max_failed_logins: u32, lockout_minutes: u32 },
    /// Log level is invalid.
    InvalidLogLevel { value: String },
    /// Log format is invalid.
    InvalidLogFormat { value: String },
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::JwtSecretTooShort { actual, minimum } => {
                write!(f, "JWT secret too short: {actual} characters (minimum {minimum})")
            }
            Self::InvalidPort { value } => write!(f, "Invalid server port: {value}"),
            Self::InvalidPoolSize { min, max } => write!(
                f,
                "Invalid pool size: min ({min}) cannot be greater than max ({max})"
            ),
            Self::InvalidUrl { url_type, message } => {
                write!(f, "Invalid {url_type} URL: {message}")
            }
            Self::NonPositiveTimeout { name } => write!(f, "Timeout '{name}' must be positive"),
            Self::InvalidHashCost {
                value,
                minimum,
                maximum,
            } => write!(
                f,
                "Invalid password hash cost: {value} (must be between {minimum} and {maximum})"
            ),
            Self::InvalidLockoutPolicy {
                max_failed_logins,
                lockout_minutes,
            } => write!(
                f,
                "Invalid lockout policy: {max_failed_logins} attempts, {lockout_minutes} minutes"
            ),
            Self::InvalidLogLevel { value } => write!(
                f,
                "Invalid log level: '{value}' (valid: trace, debug, info, warn, error)"
            ),
            Self::InvalidLogFormat { value } => {
                write!(f, "Invalid log format: '{value}' (valid: json, pretty)")
            }
        }
    }
}

impl std::error::Error for ConfigValidationError {}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Minimum JWT secret length outside development.
    const MIN_JWT_SECRET_LENGTH: usize = 32;
    /// Argon2 memory cost bounds, in MiB.
    const MIN_HASH_COST: u32 = 1;
    const MAX_HASH_COST: u32 = 256;
    const VALID_LOG_LEVELS: &'static [&'static str] = &["trace", "debug", "info", "warn", "error"];
    const VALID_LOG_FORMATS: &'static [&'static str] = &["json", "pretty"];

    /// Validates the entire application configuration.
    pub fn validate(config: &AppConfig) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        Self::validate_security(&config.security, config.app.is_development(), &mut errors);
        Self::validate_server(&config.server, &mut errors);
        Self::validate_database(&config.database, &mut errors);
        Self::validate_observability(&config.observability, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_security(
        config: &SecurityConfig,
        development: bool,
        errors: &mut Vec<ConfigValidationError>,
    ) {
        if !development && config.jwt_secret.len() < Self::MIN_JWT_SECRET_LENGTH {
            errors.push(ConfigValidationError::JwtSecretTooShort {
                actual: config.jwt_secret.len(),
                minimum: Self::MIN_JWT_SECRET_LENGTH,
            });
        }

        if config.password_hash_cost < Self::MIN_HASH_COST
            || config.password_hash_cost > Self::MAX_HASH_COST
        {
            errors.push(ConfigValidationError::InvalidHashCost {
                value: config.password_hash_cost,
                minimum: Self::MIN_HASH_COST,
                maximum: Self::MAX_HASH_COST,
            });
        }

        if config.max_failed_logins == 0 || config.lockout_minutes == 0 {
            errors.push(ConfigValidationError::InvalidLockoutPolicy {
                max_failed_logins: config.max_failed_logins,
                lockout_minutes: config.lockout_minutes,
            });
        }

        if config.jwt_access_expiration_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "jwt_access_expiration_secs".to_string(),
            });
        }
        if config.jwt_refresh_expiration_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "jwt_refresh_expiration_secs".to_string(),
            });
        }
    }

    fn validate_server(config: &ServerConfig, errors: &mut Vec<ConfigValidationError>) {
        if config.port == 0 {
            errors.push(ConfigValidationError::InvalidPort { value: config.port });
        }
        if config.request_timeout_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "request_timeout_secs".to_string(),
            });
        }
    }

    fn validate_database(config: &DatabaseConfig, errors: &mut Vec<ConfigValidationError>) {
        if config.store == StoreKind::Memory {
            return;
        }

        if config.url.is_empty() {
            errors.push(ConfigValidationError::InvalidUrl {
                url_type: "database".to_string(),
                message: "URL cannot be empty".to_string(),
            });
        } else {
            match Url::parse(&config.url) {
                Ok(url) if matches!(url.scheme(), "postgres" | "postgresql") => {}
                Ok(url) => errors.push(ConfigValidationError::InvalidUrl {
                    url_type: "database".to_string(),
                    message: format!("unsupported scheme '{}'", url.scheme()),
                }),
                Err(e) => errors.push(ConfigValidationError::InvalidUrl {
                    url_type: "database".to_string(),
                    message: e.to_string(),
                }),
            }
        }

        if config.min_connections > config.max_connections {
            errors.push(ConfigValidationError::InvalidPoolSize {
                min: config.min_connections,
                max: config.max_connections,
            });
        }

        if config.connect_timeout_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "database.connect_timeout_secs".to_string(),
            });
        }
    }

    fn validate_observability(
        config: &ObservabilityConfig,
        errors: &mut Vec<ConfigValidationError>,
    ) {
        if !Self::VALID_LOG_LEVELS.contains(&config.log_level.to_lowercase().as_str()) {
            errors.push(ConfigValidationError::InvalidLogLevel {
                value: config.log_level.clone(),
            });
        }
        if !Self::VALID_LOG_FORMATS.contains(&config.log_format.to_lowercase().as_str()) {
            errors.push(ConfigValidationError::InvalidLogFormat {
                value: config.log_format.clone(),
            });
        }
    }
}
