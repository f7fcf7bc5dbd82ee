mod error;
mod health;
pub mod router;
mod state;

pub use error::{ApiError, ErrorBody};
pub use state::{ApiState, ApiStateBuilder, ApiStateError, ApiStateInner};
