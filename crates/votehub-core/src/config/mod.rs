//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section. Every section has defaults, so an empty configuration yields
//! the canonical voting policy.

pub mod feed;
pub mod logging;
pub mod presence;
pub mod rate_limit;
pub mod store;
pub mod validation;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use self::feed::FeedConfig;
pub use self::logging::LoggingConfig;
pub use self::presence::PresenceConfig;
pub use self::rate_limit::{RateLimitConfig, RateLimitPolicy};
pub use self::store::StoreConfig;
pub use self::validation::ValidationConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Shared store connection settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Presence heartbeat and freshness settings.
    #[serde(default)]
    pub presence: PresenceConfig,
    /// Activity feed settings.
    #[serde(default)]
    pub feed: FeedConfig,
    /// Per-action rate limits.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// Input length bounds.
    #[serde(default)]
    pub validation: ValidationConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `VOTEHUB`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let overlay = format!("config/{env}");
        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&overlay).required(false));
        let config = Self::finish(builder)?;
        debug!(env, backend = %config.store.backend, "Configuration loaded");
        Ok(config)
    }

    /// Load configuration from a single explicit file, plus the environment.
    pub fn load_file(path: &str) -> Result<Self, AppError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name(path).required(false));
        let config = Self::finish(builder)?;
        debug!(path, backend = %config.store.backend, "Configuration loaded");
        Ok(config)
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, AppError> {
        builder
            .add_source(
                config::Environment::with_prefix("VOTEHUB")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| {
                warn!(error = %e, "Configuration sources could not be merged");
                AppError::configuration(format!("Failed to build config: {e}"))
            })?
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
