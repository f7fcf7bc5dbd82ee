//! Kernel utilities shared across slices.
//! Keep this crate lightweight; it provides config loading and, behind the `server`
//! feature, the shared HTTP state, error mapping and system routes.
//!
//! ## Config loading
//! ```rust,ignore
//! use dormant_kernel::config::{load_config, validate};
//! use dormant_kernel::domain::config::ApiConfig;
//!
//! let cfg: ApiConfig = load_config(Some("server"))?;
//! validate(&cfg)?;
//! ```
pub mod config;
pub mod prelude;
#[cfg(feature = "server")]
pub mod server;

pub use dormant_domain as domain;
