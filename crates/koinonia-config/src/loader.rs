//! Configuration loader with layered sources.

use crate::{AppConfig, ConfigValidator};
use config::{Config, ConfigError, Environment, File};
use koinonia_core::KoinoniaError;
use std::path::Path;
use tracing::{debug, info};

/// Configuration loader with layered sources.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: AppConfig,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml`
    /// 3. `config/local.toml` (not committed)
    /// 4. Environment variables such as `KOINONIA__SERVER__PORT`
    pub fn new(config_dir: impl AsRef<Path>) -> Result<Self, KoinoniaError> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment =
            std::env::var("KOINONIA_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        Self::for_environment(config_dir, &environment)
    }

    /// Creates a loader for an explicit environment name.
    pub fn for_environment(
        config_dir: impl AsRef<Path>,
        environment: &str,
    ) -> Result<Self, KoinoniaError> {
        let config = Self::load_config(config_dir.as_ref(), environment)?;
        Ok(Self { config })
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, KoinoniaError> {
        Self::new("./config")
    }

    /// Returns the loaded configuration.
    #[must_use]
    pub fn get(&self) -> AppConfig {
        self.config.clone()
    }

    fn load_config(config_dir: &Path, environment: &str) -> Result<AppConfig, KoinoniaError> {
        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder()
            .set_default("app.environment", environment)
            .map_err(config_error)?;

        for name in ["default", environment, "local"] {
            let path = config_dir.join(format!("{name}.toml"));
            if path.exists() {
                debug!("Loading config from: {}", path.display());
                builder = builder.add_source(File::from(path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("KOINONIA")
                .separator("__")
                .try_parsing(true),
        );

        let app_config: AppConfig = builder
            .build()
            .and_then(Config::try_deserialize)
            .map_err(config_error)?;

        ConfigValidator::validate(&app_config).map_err(|errors| {
            let joined = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            KoinoniaError::Configuration(joined)
        })?;

        Ok(app_config)
    }
}

fn config_error(err: ConfigError) -> KoinoniaError {
    KoinoniaError::Configuration(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StoreKind;
    use std::fs;

    #[test]
    fn test_layers_environment_file_over_default() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            "[server]\nport = 9000\nhost = \"127.0.0.1\"\n\n\
             [security]\njwt_secret = \"a-test-secret-of-at-least-32-chars\"\n",
        )
        .unwrap();
        fs::write(dir.path().join("test.toml"), "[server]\nport = 9100\n").unwrap();

        let loader = ConfigLoader::for_environment(dir.path(), "test").unwrap();
        let config = loader.get();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.app.environment, "test");
        assert_eq!(config.security.jwt_secret, "a-test-secret-of-at-least-32-chars");
    }

    #[test]
    fn test_default_secret_is_rejected_outside_development() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("test.toml"), "[server]\nport = 9100\n").unwrap();

        let result = ConfigLoader::for_environment(dir.path(), "test");
        assert!(matches!(result, Err(KoinoniaError::Configuration(msg)) if msg.contains("JWT secret")));
    }

    #[test]
    fn test_missing_directory_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ConfigLoader::for_environment(dir.path().join("absent"), "development").unwrap();
        assert_eq!(loader.get().database.store, StoreKind::Postgres);
        assert_eq!(loader.get().server.port, 8080);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            "[security]\njwt_secret = \"short\"\n",
        )
        .unwrap();

        let result = ConfigLoader::for_environment(dir.path(), "production");
        assert!(matches!(result, Err(KoinoniaError::Configuration(msg)) if msg.contains("JWT secret")));
    }
}
