//! RSA-2048 key pairs and OAEP encryption for the one-time key exchange.
//!
//! Keys travel as PEM text: public keys as SPKI (`BEGIN PUBLIC KEY`), private
//! keys as PKCS#8 (`BEGIN PRIVATE KEY`). OAEP padding is randomized, so two
//! encryptions of the same data under the same key never match.

use rand::rngs::OsRng;
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::{CryptoError, CryptoResult};

/// Modulus size in bits.
pub const KEY_BITS: usize = 2048;

/// An RSA key pair in portable PEM form.
///
/// The private key encoding is wiped from memory on drop.
#[derive(Clone)]
pub struct KeyPair {
    /// SPKI PEM public key
    pub public_key: String,
    /// PKCS#8 PEM private key
    pub private_key: Zeroizing<String>,
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &crate::key_fingerprint(&self.public_key))
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Generate a fresh 2048-bit key pair.
pub fn generate_key_pair() -> CryptoResult<KeyPair> {
    let private_key = RsaPrivateKey::new(&mut OsRng, KEY_BITS)
        .map_err(|e| CryptoError::KeyGeneration(e.to_string()))?;
    let public_key = RsaPublicKey::from(&private_key);

    let public_pem = public_key
        .to_public_key_pem(LineEnding::LF)
        .map_err(|e| CryptoError::KeyEncoding(e.to_string()))?;
    let private_pem = private_key
        .to_pkcs8_pem(LineEnding::LF)
        .map_err(|e| CryptoError::KeyEncoding(e.to_string()))?;

    tracing::debug!(
        key_id = %crate::key_fingerprint(&public_pem),
        bits = KEY_BITS,
        "Generated RSA key pair"
    );

    Ok(KeyPair {
        public_key: public_pem,
        private_key: private_pem,
    })
}

/// Encrypt `data` for the holder of `public_key` (RSA-OAEP, SHA-256).
pub fn encrypt(data: &[u8], public_key: &str) -> CryptoResult<Vec<u8>> {
    let key = parse_public_key(public_key)?;
    key.encrypt(&mut OsRng, Oaep::new::<Sha256>(), data)
        .map_err(|e| CryptoError::Encryption(e.to_string()))
}

/// Decrypt `ciphertext` with `private_key`.
///
/// Fails with [`CryptoError::Decryption`] when the ciphertext was not produced
/// for this key pair, was corrupted, or its padding does not check out.
pub fn decrypt(ciphertext: &[u8], private_key: &str) -> CryptoResult<Vec<u8>> {
    let key = parse_private_key(private_key)?;
    key.decrypt(Oaep::new::<Sha256>(), ciphertext)
        .map_err(|e| CryptoError::Decryption(e.to_string()))
}

pub(crate) fn parse_public_key(pem: &str) -> CryptoResult<RsaPublicKey> {
    RsaPublicKey::from_public_key_pem(pem).map_err(|e| CryptoError::KeyEncoding(e.to_string()))
}

pub(crate) fn parse_private_key(pem: &str) -> CryptoResult<RsaPrivateKey> {
    RsaPrivateKey::from_pkcs8_pem(pem).map_err(|e| CryptoError::KeyEncoding(e.to_string()))
}
