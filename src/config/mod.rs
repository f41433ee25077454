//! Builds the `AppConfig` from layered sources with `figment`:
//! `config/base.toml`, then `config/{environment}.toml`, then `APP_` prefixed
//! environment variables (`__` separates nested keys).
//! Gets initialized with `OnceLock` so it only needs to get initialized once.

mod data;
mod error;

use std::sync::OnceLock;
use tracing::info;

// Re-export config structs
pub use data::{AppConfig, Environment, NetConfig, ProviderConfig};
pub use error::{ConfigError, ConfigResult};

/// Allocates a static `OnceLock` containing `AppConfig`.
/// This ensures configuration only gets initialized the first time we call this function.
/// Every other caller gets a &'static ref to AppConfig.
/// Panics if anything goes wrong.
pub fn get_or_init_config() -> &'static AppConfig {
    static CONFIG_INIT: OnceLock<AppConfig> = OnceLock::new();
    CONFIG_INIT.get_or_init(|| {
        info!(
            "{:<12} - Initializing the configuration",
            "get_or_init_config"
        );
        AppConfig::load().unwrap_or_else(|er| panic!("Fatal Error: Building config: {er}"))
    })
}
