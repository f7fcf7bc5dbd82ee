use aes::Aes256;
use cbc::cipher::block_padding::NoPadding;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use getrandom::fill;
use std::sync::Arc;
use zeroize::Zeroizing;

use crate::credential::Credential;
use crate::error::{VaultError, VaultErrorExt};
use crate::transport;

type CbcDecryptor = cbc::Decryptor<Aes256>;
type CbcEncryptor = cbc::Encryptor<Aes256>;

/// AES-256 key length.
pub const KEY_LEN: usize = 32;

/// CBC initialization vector length.
pub const IV_LEN: usize = 16;

/// AES block length; also the upper bound of a PKCS#7 padding run.
pub const BLOCK_LEN: usize = 16;

/// Holds the process-wide token key and opens or seals tokens with it.
///
/// Cloning is cheap; the key lives behind an [`Arc`] and is wiped when the last
/// clone is dropped.
#[derive(Clone)]
pub struct TokenVault {
    key: Arc<Zeroizing<[u8; KEY_LEN]>>,
}

impl std::fmt::Debug for TokenVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVault").field("key", &"<redacted>").finish()
    }
}

impl TokenVault {
    #[must_use]
    pub fn new(key: [u8; KEY_LEN]) -> Self {
        Self { key: Arc::new(Zeroizing::new(key)) }
    }

    /// Builds a vault from a 64-character hex key, as stored in configuration.
    ///
    /// # Errors
    /// [`VaultError::InvalidKey`] if the string is not exactly 32 hex-encoded bytes.
    pub fn from_hex(key: &str) -> Result<Self, VaultError> {
        let mut raw = Zeroizing::new([0u8; KEY_LEN]);
        hex::decode_to_slice(key.trim(), raw.as_mut_slice()).map_err(|_| {
            VaultError::InvalidKey {
                message: format!("expected {} hex characters", KEY_LEN * 2).into(),
                context: Some("security.token_key".into()),
            }
        })?;
        Ok(Self::new(*raw))
    }

    /// Decodes and decrypts a transport-encoded token.
    ///
    /// # Errors
    /// Any token-stage [`VaultError`]; see the crate documentation.
    pub fn open(&self, token: &str) -> Result<Credential, VaultError> {
        let raw = Zeroizing::new(transport::decode(token)?);
        decrypt(&raw, &self.key)
    }

    /// Encrypts `plaintext` under a fresh random IV and returns the transport form.
    ///
    /// # Errors
    /// [`VaultError::Encryption`] if the system RNG is unavailable.
    pub fn seal(&self, plaintext: &str) -> Result<String, VaultError> {
        let mut iv = [0u8; IV_LEN];
        fill(&mut iv).map_err(|e| VaultError::Encryption {
            message: "system RNG unavailable for IV generation".into(),
            context: Some(e.to_string().into()),
        })?;
        self.seal_with_iv(plaintext, iv)
    }

    /// Encrypts `plaintext` under a caller-chosen IV.
    ///
    /// Reusing an IV with the same key leaks plaintext equality; only fixtures should
    /// call this directly.
    ///
    /// # Errors
    /// [`VaultError::Encryption`] if the cipher rejects the buffer.
    pub fn seal_with_iv(&self, plaintext: &str, iv: [u8; IV_LEN]) -> Result<String, VaultError> {
        let mut buf = Zeroizing::new(pad(plaintext.as_bytes()));
        let len = buf.len();

        let encryptor = CbcEncryptor::new_from_slices(self.key.as_slice(), &iv)
            .map_err(|_| VaultError::Internal { message: "cipher init failed".into(), context: None })?;
        encryptor.encrypt_padded_mut::<NoPadding>(buf.as_mut_slice(), len).map_err(|_| {
            VaultError::Encryption { message: "block encryption failed".into(), context: None }
        })?;

        let mut raw = Vec::with_capacity(IV_LEN + len);
        raw.extend_from_slice(&iv);
        raw.extend_from_slice(&buf);
        Ok(transport::encode(&raw))
    }
}

/// Decrypts a raw `[IV][CIPHERTEXT]` token with `key`.
///
/// # Errors
/// * [`VaultError::MalformedToken`] if `raw` is shorter than the IV, or the
///   ciphertext is empty or not a whole number of blocks.
/// * [`VaultError::Padding`] if the PKCS#7 run is invalid.
/// * [`VaultError::Encoding`] if the plaintext is not UTF-8.
pub fn decrypt(raw: &[u8], key: &[u8; KEY_LEN]) -> Result<Credential, VaultError> {
    if raw.len() < IV_LEN {
        return Err(VaultError::MalformedToken {
            message: format!("{} bytes cannot hold a {IV_LEN}-byte IV", raw.len()).into(),
            context: None,
        });
    }

    let (iv, ciphertext) = raw.split_at(IV_LEN);
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
        return Err(VaultError::MalformedToken {
            message: format!(
                "ciphertext length {} is not a positive multiple of {BLOCK_LEN}",
                ciphertext.len()
            )
            .into(),
            context: None,
        });
    }

    let mut buf = Zeroizing::new(ciphertext.to_vec());
    let decryptor = CbcDecryptor::new_from_slices(key, iv)
        .map_err(|_| VaultError::Internal { message: "cipher init failed".into(), context: None })?;
    decryptor.decrypt_padded_mut::<NoPadding>(buf.as_mut_slice()).map_err(|_| {
        VaultError::MalformedToken { message: "ciphertext is not block aligned".into(), context: None }
    })?;

    let plaintext = unpad(&buf)?;
    let text = std::str::from_utf8(plaintext).context("decrypted credential")?;

    Ok(Credential::new(text))
}

/// Appends a PKCS#7 run; always adds between 1 and [`BLOCK_LEN`] bytes.
fn pad(data: &[u8]) -> Vec<u8> {
    let run = BLOCK_LEN - data.len() % BLOCK_LEN;
    let mut buf = Vec::with_capacity(data.len() + run);
    buf.extend_from_slice(data);
    #[allow(clippy::cast_possible_truncation)]
    buf.resize(data.len() + run, run as u8);
    buf
}

/// Strips a PKCS#7 run after checking every padding byte, not just the last one.
fn unpad(data: &[u8]) -> Result<&[u8], VaultError> {
    let Some(&last) = data.last() else {
        return Err(VaultError::Padding { message: "empty plaintext".into(), context: None });
    };

    let run = usize::from(last);
    if run == 0 || run > BLOCK_LEN || run > data.len() {
        return Err(VaultError::Padding {
            message: "padding length out of range".into(),
            context: None,
        });
    }

    let (body, tail) = data.split_at(data.len() - run);
    if tail.iter().any(|&b| b != last) {
        return Err(VaultError::Padding {
            message: "padding bytes are inconsistent".into(),
            context: None,
        });
    }

    Ok(body)
}
