use config::{Config, Environment, File};
use dormant_domain::config::ApiConfig;
use dormant_domain::constants::MAX_WINDOW_DAYS_LIMIT;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable prefix; `DORMANT__SCANNER__CONCURRENCY` maps to `scanner.concurrency`.
/// Values stay strings until deserialization, so `DORMANT__CRM__API_VERSION=60.0` is kept verbatim.
/// List settings can only be set in the file.
pub const ENV_PREFIX: &str = "DORMANT";

/// Custom error type for config loading and validation.
#[dormant_derive::dormant_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },

    #[error("Invalid configuration{}: {message}", format_context(.context))]
    Invalid { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// A reusable configuration loader that combines file-based settings with environment overrides.
///
/// This function implements a layered configuration strategy:
/// 1. **Base File**: Loads settings from a file (e.g., `server.toml`). If no path is provided, it defaults to `"server"`.
/// 2. **Environment Overrides**: Overlays values from environment variables prefixed with `DORMANT__`.
///    Nested structures are accessed using double underscores (e.g., `DORMANT__SECURITY__TOKEN_KEY`
///    maps to `security.token_key`).
///
/// # Errors
/// This function will return an error if:
/// * The specified (or default) configuration file cannot be found.
/// * The content of the file does not match the structure of type `T`.
///
/// # Example
/// ```rust
/// use dormant_kernel::config::load_config;
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
    load_layered(path, environment())
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX).prefix_separator("__").separator("__")
}

fn load_layered<T>(path: Option<impl AsRef<Path>>, env: Environment) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let effective_path = path.map_or_else(|| PathBuf::from("server"), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(true))
        .add_source(env);

    info!("Loading config from {}", effective_path.display());

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}

/// Rejects settings the service cannot run with.
///
/// The token key itself is checked when the vault is built from it.
pub fn validate(cfg: &ApiConfig) -> Result<(), ConfigError> {
    let scanner = &cfg.scanner;

    if scanner.concurrency == 0 {
        return Err(invalid("must be at least 1", "scanner.concurrency"));
    }
    if scanner.query_timeout_secs == 0 {
        return Err(invalid("must be at least 1 second", "scanner.query_timeout_secs"));
    }
    if scanner.request_timeout_secs == 0 {
        return Err(invalid("must be at least 1 second", "scanner.request_timeout_secs"));
    }
    if !(1..=MAX_WINDOW_DAYS_LIMIT).contains(&scanner.max_window_days) {
        return Err(invalid(
            format!("must be within 1..={MAX_WINDOW_DAYS_LIMIT}"),
            "scanner.max_window_days",
        ));
    }
    if !(1..=scanner.max_window_days).contains(&scanner.default_window_days) {
        return Err(invalid(
            format!("must be within 1..={}", scanner.max_window_days),
            "scanner.default_window_days",
        ));
    }
    if scanner.custom_suffixes.iter().all(|s| s.trim().is_empty()) {
        return Err(invalid("at least one suffix is required", "scanner.custom_suffixes"));
    }
    if cfg.security.token_key.trim().is_empty() {
        return Err(invalid("a 64 character hex key is required", "security.token_key"));
    }
    if cfg.crm.allowed_host_suffixes.iter().all(|s| s.trim().is_empty()) {
        return Err(invalid(
            "at least one org domain suffix is required",
            "crm.allowed_host_suffixes",
        ));
    }
    if cfg.crm.connect_timeout_secs == 0 {
        return Err(invalid("must be at least 1 second", "crm.connect_timeout_secs"));
    }

    Ok(())
}

fn invalid(message: impl Into<Cow<'static, str>>, key: &'static str) -> ConfigError {
    ConfigError::Invalid { message: message.into(), context: Some(key.into()) }
}
