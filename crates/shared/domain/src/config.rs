use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::constants::{
    CUSTOM_OBJECT_SUFFIX, DEFAULT_API_VERSION, DEFAULT_CONCURRENCY, DEFAULT_QUERY_TIMEOUT_SECS,
    DEFAULT_WINDOW_DAYS, SALESFORCE_HOST_SUFFIXES,
};

/// Top-level service configuration.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfigInner {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
    pub crm: CrmConfig,
    pub scanner: ScannerConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(flatten, default)]
    inner: Arc<ApiConfigInner>,
}

impl Deref for ApiConfig {
    type Target = ApiConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for ApiConfig {
    fn deref_mut(&mut self) -> &mut ApiConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: IpAddr,
    pub port: u16,
    pub ssl: Option<SslConfig>,
}

/// TLS certificate/key paths.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SslConfig {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Log sink settings; `RUST_LOG` still overrides `level` and `env_filter`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `compact`, `pretty` or `json`.
    pub format: String,
    pub env_filter: Option<String>,
    /// Enables rolling daily log files in this directory.
    pub directory: Option<PathBuf>,
}

/// Token decryption settings.
#[derive(Default, Clone, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// 32-byte AES key, hex encoded (64 characters).
    pub token_key: String,
    /// Accept `encrypted=false` requests carrying a raw bearer token.
    pub allow_plain_tokens: bool,
}

impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("token_key", &if self.token_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("allow_plain_tokens", &self.allow_plain_tokens)
            .finish()
    }
}

/// Outbound CRM client settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrmConfig {
    /// REST API version, e.g. `59.0`.
    pub api_version: String,
    pub connect_timeout_secs: u64,
    /// The org host must end with one of these suffixes; an empty list admits no host.
    pub allowed_host_suffixes: Vec<String>,
    /// Permit `http://` org endpoints (local mocks only).
    pub allow_insecure_http: bool,
}

/// Activity scanner settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Maximum number of existence queries in flight per request.
    pub concurrency: usize,
    pub query_timeout_secs: u64,
    /// Upper bound for one whole request; on expiry the scan is abandoned.
    pub request_timeout_secs: u64,
    pub default_window_days: u32,
    pub max_window_days: u32,
    /// Name suffixes that mark a custom object as a scan candidate.
    pub custom_suffixes: Vec<String>,
}

impl CrmConfig {
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl ScannerConfig {
    #[must_use]
    pub const fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

// --- Default ---

impl Default for ServerConfig {
    fn default() -> Self {
        Self { address: IpAddr::V4(Ipv4Addr::UNSPECIFIED), port: 4583, ssl: None }
    }
}

impl Default for SslConfig {
    fn default() -> Self {
        Self { cert: PathBuf::from("cert.pem"), key: PathBuf::from("key.pem") }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), format: "compact".to_owned(), env_filter: None, directory: None }
    }
}

impl Default for CrmConfig {
    fn default() -> Self {
        Self {
            api_version: DEFAULT_API_VERSION.to_owned(),
            connect_timeout_secs: 10,
            allowed_host_suffixes: SALESFORCE_HOST_SUFFIXES.map(str::to_owned).to_vec(),
            allow_insecure_http: false,
        }
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            query_timeout_secs: DEFAULT_QUERY_TIMEOUT_SECS,
            request_timeout_secs: 120,
            default_window_days: DEFAULT_WINDOW_DAYS,
            max_window_days: 3650,
            custom_suffixes: vec![CUSTOM_OBJECT_SUFFIX.to_owned()],
        }
    }
}
