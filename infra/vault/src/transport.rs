//! Transport encoding for tokens: URL-safe Base64 with optional `=` padding,
//! optionally percent-encoded on top when the token travelled inside a URL.

use base64::Engine;
use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};

use crate::error::VaultError;

/// Decodes a transport-encoded token into raw bytes.
///
/// Percent-decoding runs first; URL-safe Base64 never contains `%`, so an already
/// decoded token passes through unchanged. Missing `=` padding is restored before
/// decoding.
///
/// # Errors
/// [`VaultError::Decode`] for empty input, invalid percent-encoding, or invalid
/// Base64url after padding restoration.
pub fn decode(input: &str) -> Result<Vec<u8>, VaultError> {
    let unescaped = urlencoding::decode(input).map_err(|_| VaultError::Decode {
        message: "percent-encoded token is not valid UTF-8".into(),
        context: None,
    })?;

    let token = unescaped.trim();
    if token.is_empty() {
        return Err(VaultError::Decode { message: "token is empty".into(), context: None });
    }

    let missing = (4 - token.len() % 4) % 4;
    let mut padded = String::with_capacity(token.len() + missing);
    padded.push_str(token);
    padded.extend(std::iter::repeat_n('=', missing));

    URL_SAFE.decode(padded.as_bytes()).map_err(|_| VaultError::Decode {
        message: "token is not valid URL-safe Base64".into(),
        context: Some(format!("{} characters", token.len()).into()),
    })
}

/// Encodes raw bytes as unpadded URL-safe Base64.
#[must_use]
pub fn encode(raw: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(raw)
}
