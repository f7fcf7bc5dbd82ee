#![allow(dead_code)]

use aes::Aes256;
use cbc::cipher::block_padding::NoPadding;
use cbc::cipher::{BlockEncryptMut, KeyIvInit};
use dormant_vault::TokenVault;
use dormant_vault::transport;

pub const KEY: [u8; 32] = [
    0x60, 0x3d, 0xeb, 0x10, 0x15, 0xca, 0x71, 0xbe, 0x2b, 0x73, 0xae, 0xf0, 0x85, 0x7d, 0x77, 0x81,
    0x1f, 0x35, 0x2c, 0x07, 0x3b, 0x61, 0x08, 0xd7, 0x2d, 0x98, 0x10, 0xa3, 0x09, 0x14, 0xdf, 0xf4,
];

pub const IV: [u8; 16] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];

#[must_use]
pub fn vault() -> TokenVault {
    TokenVault::new(KEY)
}

/// Encrypts already-padded `blocks` verbatim and returns the transport form, so tests
/// can present arbitrary (including invalid) padding to the decryptor.
///
/// # Panics
/// If `blocks` is not block aligned.
#[must_use]
pub fn raw_token(blocks: &[u8]) -> String {
    let mut buf = blocks.to_vec();
    let len = buf.len();
    cbc::Encryptor::<Aes256>::new_from_slices(&KEY, &IV)
        .expect("valid key and iv")
        .encrypt_padded_mut::<NoPadding>(&mut buf, len)
        .expect("block aligned input");

    let mut raw = IV.to_vec();
    raw.extend_from_slice(&buf);
    transport::encode(&raw)
}
