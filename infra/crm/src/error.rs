use std::borrow::Cow;

/// A specialized [`CrmError`] enum of this crate.
#[dormant_derive::dormant_error]
pub enum CrmError {
    /// The org endpoint is not an acceptable base URL.
    #[error("Invalid org endpoint{}: {message}", format_context(.context))]
    InvalidEndpoint { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The object name cannot be placed into a query.
    #[error("Invalid object name{}: {message}", format_context(.context))]
    InvalidObjectName { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("CRM transport failure{}: {source}", format_context(.context))]
    Transport { source: reqwest::Error, context: Option<Cow<'static, str>> },

    /// The CRM answered with a non-success status.
    #[error("CRM returned HTTP {status}{}: {message}", format_context(.context))]
    Status { status: u16, message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("CRM response could not be decoded{}: {source}", format_context(.context))]
    Decode { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("Internal CRM client error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl CrmError {
    /// HTTP status reported by the CRM, if the failure carries one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
