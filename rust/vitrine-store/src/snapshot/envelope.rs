//! Encrypted container for snapshot files.
//!
//! Layout: `VTRN` magic, one format byte, a 12-byte nonce, then the
//! ChaCha20-Poly1305 ciphertext (tag appended). The cipher key is derived
//! from the caller's key bytes, so keys of any length are accepted.

use chacha20poly1305::{
    ChaCha20Poly1305, Nonce,
    aead::{Aead, KeyInit},
};
use rand::RngCore;

use crate::StoreError;

const MAGIC: &[u8; 4] = b"VTRN";
const FORMAT_CHACHA20_POLY1305: u8 = 1;
const NONCE_SIZE: usize = 12;
const HEADER_SIZE: usize = MAGIC.len() + 1 + NONCE_SIZE;
const KEY_CONTEXT: &str = "vitrine 2024 snapshot envelope key";

/// Whether `bytes` carry the envelope header
pub fn is_sealed(bytes: &[u8]) -> bool {
    bytes.starts_with(MAGIC)
}

fn cipher(key: &[u8]) -> Result<ChaCha20Poly1305, StoreError> {
    if key.is_empty() {
        return Err(StoreError::Encryption("Encryption key is empty".into()));
    }
    let derived = blake3::derive_key(KEY_CONTEXT, key);
    ChaCha20Poly1305::new_from_slice(&derived)
        .map_err(|error| StoreError::Encryption(format!("{error}")))
}

/// Encrypt `plaintext` under `key`
pub fn seal(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, StoreError> {
    let mut nonce = [0u8; NONCE_SIZE];
    rand::thread_rng().fill_bytes(&mut nonce);

    let ciphertext = cipher(key)?
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|error| StoreError::Encryption(format!("{error}")))?;

    let mut sealed = Vec::with_capacity(HEADER_SIZE + ciphertext.len());
    sealed.extend_from_slice(MAGIC);
    sealed.push(FORMAT_CHACHA20_POLY1305);
    sealed.extend_from_slice(&nonce);
    sealed.extend_from_slice(&ciphertext);
    Ok(sealed)
}

/// Decrypt an envelope produced by [`seal`]
pub fn unseal(key: &[u8], sealed: &[u8]) -> Result<Vec<u8>, StoreError> {
    if !is_sealed(sealed) || sealed.len() < HEADER_SIZE {
        return Err(StoreError::Encryption(
            "File is not an encrypted store".into(),
        ));
    }
    let format = sealed[MAGIC.len()];
    if format != FORMAT_CHACHA20_POLY1305 {
        return Err(StoreError::Encryption(format!(
            "Unknown envelope format {format}"
        )));
    }
    let nonce = &sealed[MAGIC.len() + 1..HEADER_SIZE];

    cipher(key)?
        .decrypt(Nonce::from_slice(nonce), &sealed[HEADER_SIZE..])
        .map_err(|_| StoreError::Encryption("Wrong encryption key or corrupt file".into()))
}
