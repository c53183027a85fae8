//! Encrypt-then-MAC file cipher.
//!
//! Layout: `iv (12) || ciphertext || mac (32)`.
//!
//! The body is encrypted with ChaCha20 under a random IV, then a keyed
//! BLAKE3 MAC is computed over `iv || ciphertext`. Encryption and MAC
//! subkeys are derived separately from the 32-byte document key.

use chacha20::cipher::{KeyIvInit, StreamCipher};
use chacha20::{ChaCha20, Key, Nonce};
use rand::RngCore;
use subtle::ConstantTimeEq;

use crate::error::{CoreError, Result};

/// IV length in bytes.
pub const IV_LEN: usize = 12;

/// MAC length in bytes.
pub const MAC_LEN: usize = 32;

/// Smallest valid ciphertext (empty body).
pub const MIN_CIPHERTEXT_LEN: usize = IV_LEN + MAC_LEN;

const ENC_CONTEXT: &str = "docseal-v1-file-encryption";
const MAC_CONTEXT: &str = "docseal-v1-file-authentication";

/// Encrypt `plaintext` under `key`.
pub fn encrypt(plaintext: &[u8], key: &[u8; 32]) -> Vec<u8> {
    let mut iv = [0u8; IV_LEN];
    rand::thread_rng().fill_bytes(&mut iv);
    encrypt_with_iv(plaintext, key, &iv)
}

fn encrypt_with_iv(plaintext: &[u8], key: &[u8; 32], iv: &[u8; IV_LEN]) -> Vec<u8> {
    let mut out = Vec::with_capacity(MIN_CIPHERTEXT_LEN + plaintext.len());
    out.extend_from_slice(iv);
    out.extend_from_slice(plaintext);

    apply_keystream(key, iv, &mut out[IV_LEN..]);

    let mac = compute_mac(key, &out);
    out.extend_from_slice(&mac);
    out
}

/// Decrypt and authenticate `ciphertext` under `key`.
///
/// The MAC is checked in constant time before any decryption happens.
pub fn decrypt(ciphertext: &[u8], key: &[u8; 32]) -> Result<Vec<u8>> {
    if ciphertext.len() < MIN_CIPHERTEXT_LEN {
        return Err(CoreError::InvalidChecksum(format!(
            "ciphertext too short: {} bytes, need at least {}",
            ciphertext.len(),
            MIN_CIPHERTEXT_LEN
        )));
    }

    let (authenticated, mac) = ciphertext.split_at(ciphertext.len() - MAC_LEN);
    let expected = compute_mac(key, authenticated);

    if !bool::from(expected.as_slice().ct_eq(mac)) {
        return Err(CoreError::InvalidChecksum("MAC mismatch".into()));
    }

    let (iv, body) = authenticated.split_at(IV_LEN);
    let iv: [u8; IV_LEN] = iv
        .try_into()
        .map_err(|_| CoreError::InvalidChecksum("malformed IV".into()))?;

    let mut plaintext = body.to_vec();
    apply_keystream(key, &iv, &mut plaintext);
    Ok(plaintext)
}

fn apply_keystream(key: &[u8; 32], iv: &[u8; IV_LEN], buf: &mut [u8]) {
    let enc_key = blake3::derive_key(ENC_CONTEXT, key);
    let mut cipher = ChaCha20::new(Key::from_slice(&enc_key), Nonce::from_slice(iv));
    cipher.apply_keystream(buf);
}

fn compute_mac(key: &[u8; 32], data: &[u8]) -> [u8; MAC_LEN] {
    let mac_key = blake3::derive_key(MAC_CONTEXT, key);
    *blake3::keyed_hash(&mac_key, data).as_bytes()
}
