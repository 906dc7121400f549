//! AES-256 body encryption for the envelope.
//!
//! Every call to [`encrypt`] draws a fresh random IV, so encrypting the same
//! plaintext twice under the same key yields different ciphertexts.
//!
//! # Threat Model
//!
//! The stream mode has no authentication tag. Decrypting with the wrong key or
//! the wrong IV does not fail; it silently produces incorrect bytes. The
//! envelope compensates by verifying a signature over the ciphertext before
//! anything is decrypted, and a digest of the plaintext afterwards.

use aes::Aes256;
use ctr::cipher::{KeyIvInit, StreamCipher};
use rand::{rngs::OsRng, RngCore};
use zeroize::Zeroizing;

use crate::{CryptoError, CryptoResult};

/// Symmetric key size (256 bits / 32 bytes).
pub const KEY_LENGTH: usize = 32;

/// IV size (128 bits / 16 bytes).
pub const IV_LENGTH: usize = 16;

type Aes256Ctr = ctr::Ctr128BE<Aes256>;

/// Ciphertext together with the IV it was produced under.
///
/// The IV must be transmitted alongside the ciphertext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymmetricCiphertext {
    pub ciphertext: Vec<u8>,
    pub iv: [u8; IV_LENGTH],
}

/// Generate a one-time symmetric key from the OS CSPRNG.
///
/// The key is wiped from memory when dropped.
pub fn generate_key() -> Zeroizing<[u8; KEY_LENGTH]> {
    let mut key = Zeroizing::new([0u8; KEY_LENGTH]);
    OsRng.fill_bytes(key.as_mut_slice());
    key
}

/// Encrypt `plaintext` under `key` with a freshly generated IV.
pub fn encrypt(plaintext: &[u8], key: &[u8]) -> CryptoResult<SymmetricCiphertext> {
    check_key(key)?;

    let mut iv = [0u8; IV_LENGTH];
    OsRng.fill_bytes(&mut iv);

    let mut cipher = Aes256Ctr::new_from_slices(key, &iv)
        .map_err(|e| CryptoError::Encryption(e.to_string()))?;
    let mut ciphertext = plaintext.to_vec();
    cipher.apply_keystream(&mut ciphertext);

    Ok(SymmetricCiphertext { ciphertext, iv })
}

/// Decrypt `ciphertext` with `key` and `iv`.
///
/// Only malformed parameters are rejected. A wrong key or IV of the right
/// length produces garbage rather than an error.
pub fn decrypt(ciphertext: &[u8], key: &[u8], iv: &[u8]) -> CryptoResult<Vec<u8>> {
    check_key(key)?;
    if iv.len() != IV_LENGTH {
        return Err(CryptoError::InvalidIvLength {
            expected: IV_LENGTH,
            actual: iv.len(),
        });
    }

    let mut cipher = Aes256Ctr::new_from_slices(key, iv)
        .map_err(|e| CryptoError::Decryption(e.to_string()))?;
    let mut plaintext = ciphertext.to_vec();
    cipher.apply_keystream(&mut plaintext);

    Ok(plaintext)
}

fn check_key(key: &[u8]) -> CryptoResult<()> {
    if key.len() != KEY_LENGTH {
        return Err(CryptoError::InvalidKeyLength {
            expected: KEY_LENGTH,
            actual: key.len(),
        });
    }
    Ok(())
}
