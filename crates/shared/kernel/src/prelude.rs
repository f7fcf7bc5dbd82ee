pub use crate::config::{ConfigError, load_config, validate};
pub use dormant_domain::config::ApiConfig;

#[cfg(feature = "server")]
pub use crate::server::{ApiError, ApiState, ApiStateError};
