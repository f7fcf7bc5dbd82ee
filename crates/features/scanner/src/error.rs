use dormant_crm::CrmError;
use dormant_vault::VaultError;
use std::borrow::Cow;

/// Request-level failures of a scan. Per-resource failures never end up here;
/// they are recorded as `Errored` outcomes.
#[dormant_derive::dormant_error]
pub enum ScanError {
    /// A request parameter is missing or out of range.
    #[error("Invalid parameter{}: {message}", format_context(.context))]
    InvalidParameter { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The presented token did not yield a usable credential.
    #[error("Invalid credential{}: {message}", format_context(.context))]
    InvalidCredential { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Opening the token failed inside the vault.
    #[error("Token rejected{}: {source}", format_context(.context))]
    Vault { source: VaultError, context: Option<Cow<'static, str>> },

    /// The object listing could not be fetched; no partial result is meaningful.
    #[error("Enumeration failed{}: {source}", format_context(.context))]
    Enumeration { source: CrmError, context: Option<Cow<'static, str>> },

    /// The whole request outlived its deadline and was abandoned.
    #[error("Scan timed out{}: {message}", format_context(.context))]
    Timeout { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal scanner error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl ScanError {
    /// `true` when the failure stems from the token or credential and must be
    /// reported as 401 without further detail.
    #[must_use]
    pub const fn is_credential_error(&self) -> bool {
        match self {
            Self::InvalidCredential { .. } => true,
            Self::Vault { source, .. } => source.is_token_error(),
            _ => false,
        }
    }
}

#[cfg(feature = "server")]
mod http {
    use super::ScanError;
    use dormant_domain::constants::INVALID_CREDENTIAL;
    use dormant_kernel::server::ApiError;

    impl From<ScanError> for ApiError {
        fn from(err: ScanError) -> Self {
            if err.is_credential_error() {
                return Self::unauthorized(INVALID_CREDENTIAL);
            }
            match err {
                ScanError::InvalidParameter { message, .. } => Self::bad_request(message),
                ScanError::Enumeration { source, .. } => {
                    Self::internal(format!("failed to list org objects: {source}"))
                }
                ScanError::Timeout { .. } => Self::internal("scan timed out"),
                _ => Self::internal("internal error"),
            }
        }
    }
}
