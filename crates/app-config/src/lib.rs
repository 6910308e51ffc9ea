// In crates/app-config/src/lib.rs

use std::path::Path;

use config::{Config, Environment, File};

pub mod error;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use types::{DashboardSettings, ProviderSettings, ServerSettings, Settings};

/// Loads the application settings from `./config`.
///
/// The environment name comes from `APP_ENVIRONMENT` and defaults to
/// "development". See [`load_settings_from`] for the layering.
pub fn load_settings() -> Result<Settings> {
    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());
    load_settings_from(Path::new("config"), &environment)
}

/// Loads and validates settings rooted at `config_dir`.
///
/// This function orchestrates the layered configuration loading:
/// 1. Built-in defaults (every field has one).
/// 2. An optional `base.toml`.
/// 3. An optional environment-specific file (e.g., `development.toml`).
/// 4. Environment variables, e.g. `APP_SERVER__PORT=9000` or
///    `APP_DASHBOARD__SYMBOLS=BTC-USD,SOL-USD`.
pub fn load_settings_from(config_dir: &Path, environment: &str) -> Result<Settings> {
    let settings = Config::builder()
        .add_source(File::from(config_dir.join("base")).required(false))
        .add_source(File::from(config_dir.join(environment)).required(false))
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("dashboard.symbols"),
        )
        .build()?;

    // Deserialize the configuration into our `Settings` struct.
    let settings: Settings = settings.try_deserialize()?;
    settings.validate()?;

    Ok(settings)
}
