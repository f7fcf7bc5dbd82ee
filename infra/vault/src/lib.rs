//! Token vault: recovers CRM bearer credentials from encrypted, transport-encoded blobs.
//!
//! ## Token Format
//!
//! ```text
//! base64url( [IV(16)][CIPHERTEXT(16 * n)] )      n >= 1, padding '=' optional
//! ```
//!
//! The ciphertext is AES-256-CBC over the UTF-8 credential with PKCS#7 padding.
//! Opening a token runs three stages, each with its own error:
//!
//! 1. [`transport::decode`]: percent-decoding, padding restoration, Base64url
//!    ([`VaultError::Decode`]).
//! 2. [`decrypt`]: IV split and block checks ([`VaultError::MalformedToken`]),
//!    strict padding validation ([`VaultError::Padding`]).
//! 3. UTF-8 validation ([`VaultError::Encoding`]).
//!
//! No stage logs or formats key, IV, ciphertext or plaintext bytes, and the
//! recovered [`Credential`] redacts itself in `Debug` output.
//!
//! ## Example
//!
//! ```rust
//! use dormant_vault::prelude::*;
//!
//! # fn main() -> Result<(), VaultError> {
//! let vault = TokenVault::from_hex(
//!     "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f",
//! )?;
//!
//! let token = vault.seal("00Dxx0000001gPL!AQ4AQ")?;
//! let credential = vault.open(&token)?;
//!
//! assert_eq!(credential.expose(), "00Dxx0000001gPL!AQ4AQ");
//! assert_eq!(format!("{credential:?}"), "Credential(<redacted>)");
//! # Ok(())
//! # }
//! ```

mod credential;
mod engine;
mod error;
pub mod transport;

pub use credential::Credential;
pub use engine::{BLOCK_LEN, IV_LEN, KEY_LEN, TokenVault, decrypt};
pub use error::{VaultError, VaultErrorExt};

pub mod prelude {
    pub use crate::credential::Credential;
    pub use crate::engine::TokenVault;
    pub use crate::error::{VaultError, VaultErrorExt};
}
