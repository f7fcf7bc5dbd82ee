//! # Vault Errors
//!
//! Every token-stage failure has its own variant so callers and tests can tell
//! them apart. Messages never contain token, key or plaintext material.

use std::borrow::Cow;

#[dormant_derive::dormant_error]
pub enum VaultError {
    /// The transport encoding (percent-encoding or Base64url) is invalid.
    #[error("Token decode error{}: {message}", format_context(.context))]
    Decode { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The raw token cannot hold an IV followed by whole cipher blocks.
    #[error("Malformed token{}: {message}", format_context(.context))]
    MalformedToken { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The decrypted block does not end in a valid PKCS#7 padding run.
    #[error("Invalid token padding{}: {message}", format_context(.context))]
    Padding { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The unpadded plaintext is not UTF-8.
    #[error("Token encoding error{}: {source}", format_context(.context))]
    Encoding { source: std::str::Utf8Error, context: Option<Cow<'static, str>> },

    /// The configured key is missing or has the wrong shape.
    #[error("Invalid vault key{}: {message}", format_context(.context))]
    InvalidKey { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Sealing a credential failed.
    #[error("Encryption error{}: {message}", format_context(.context))]
    Encryption { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal vault error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl VaultError {
    /// Returns `true` for failures caused by the presented token rather than by
    /// vault configuration.
    #[must_use]
    pub const fn is_token_error(&self) -> bool {
        matches!(
            self,
            Self::Decode { .. }
                | Self::MalformedToken { .. }
                | Self::Padding { .. }
                | Self::Encoding { .. }
        )
    }
}
