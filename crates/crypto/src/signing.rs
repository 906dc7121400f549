//! Signature Service - sender authentication over arbitrary bytes.
//!
//! RSASSA-PKCS1-v1_5 with SHA-256. The signature binds to the exact byte
//! sequence signed: flipping any single bit of the data invalidates it.
//!
//! # Security Model
//!
//! - Private keys never leave the caller; they are parsed per call and dropped
//! - Verification never fails loudly: malformed signatures or keys yield `false`

use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use sha2::Sha256;

use crate::asymmetric::{parse_private_key, parse_public_key};
use crate::{CryptoError, CryptoResult};

/// Sign `data` with `private_key` (PKCS#8 PEM).
///
/// # Examples
/// ```
/// use courier_crypto::{asymmetric, signing};
///
/// let pair = asymmetric::generate_key_pair().unwrap();
/// let signature = signing::sign(b"ciphertext bytes", &pair.private_key).unwrap();
/// assert!(signing::verify(b"ciphertext bytes", &signature, &pair.public_key));
/// ```
pub fn sign(data: &[u8], private_key: &str) -> CryptoResult<Vec<u8>> {
    let key = parse_private_key(private_key)?;
    let signing_key = SigningKey::<Sha256>::new(key);
    let signature = signing_key
        .try_sign(data)
        .map_err(|e| CryptoError::Signing(e.to_string()))?;
    Ok(signature.to_vec())
}

/// Verify `signature` over `data` against `public_key` (SPKI PEM).
pub fn verify(data: &[u8], signature: &[u8], public_key: &str) -> bool {
    let Ok(key) = parse_public_key(public_key) else {
        tracing::debug!("Signature check against malformed public key");
        return false;
    };
    let Ok(signature) = Signature::try_from(signature) else {
        return false;
    };

    VerifyingKey::<Sha256>::new(key)
        .verify(data, &signature)
        .is_ok()
}
