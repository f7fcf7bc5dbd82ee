//! Inactive custom object scanner.
//!
//! One request flows through four stages:
//!
//! 1. the token is opened by the vault (or taken as-is when plain tokens are allowed),
//! 2. [`enumerate`] lists the org's objects and keeps custom ones with a known suffix,
//! 3. [`Scanner`] runs one bounded existence query per candidate, concurrently,
//! 4. [`aggregate`](aggregate::aggregate) keeps the inactive names in input order.
//!
//! [`Pipeline`] wires the stages together and owns the request deadline. With the
//! `server` feature the slice also exposes its axum routes through [`router`].

pub mod aggregate;
pub mod enumerate;
mod error;
pub mod model;
mod pipeline;
mod scanner;

#[cfg(feature = "server")]
mod handler;

pub use error::{ScanError, ScanErrorExt};
pub use pipeline::Pipeline;
pub use scanner::{ScanOptions, Scanner};

#[cfg(feature = "server")]
pub use handler::router;
