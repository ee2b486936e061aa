use config::{Config, Environment, File};
use mqf_domain::config::FabricSettings;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Default settings file stem, resolved against the working directory (`mqf.toml`).
pub const DEFAULT_CONFIG_FILE: &str = "mqf";
/// Prefix of environment overrides (`MQF__FLEET__DEFAULT_VERSION`).
pub const ENV_PREFIX: &str = "MQF";

/// Custom error type for config loading.
#[mqf_derive::mqf_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// A reusable configuration loader that combines file-based settings with environment overrides.
///
/// Layers, lowest priority first:
/// 1. **Base File**: the given path (must exist), or `mqf.toml` in the working
///    directory when no path is given (may be absent).
/// 2. **Environment Overrides**: variables prefixed with `MQF__`; nested keys use
///    double underscores (`MQF__ORCHESTRATION__PARALLELISM` maps to `orchestration.parallelism`).
///
/// # Errors
/// Returns [`ConfigError::Config`] if an explicitly named file is missing, a value
/// cannot be parsed, or the merged tree does not match `T`.
///
/// # Example
/// ```rust
/// use mqf_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let required = path.is_some();
    let effective_path =
        path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX).prefix_separator("__").separator("__"),
        );

    info!(required, "Loading config from {}", effective_path.display());

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}

/// Loads [`FabricSettings`] through [`load_config`].
///
/// # Errors
/// See [`load_config`].
pub fn load_settings(path: Option<impl AsRef<Path>>) -> Result<FabricSettings, ConfigError> {
    load_config(path)
}
