//! SHA-256 content digests for message integrity.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Digest size in bytes.
pub const DIGEST_LENGTH: usize = 32;

/// Compute the SHA-256 digest of `content`.
///
/// Deterministic across process runs; no salt is mixed in.
pub fn digest(content: impl AsRef<[u8]>) -> [u8; DIGEST_LENGTH] {
    Sha256::digest(content.as_ref()).into()
}

/// Compute the digest and return it as lowercase hex.
pub fn digest_hex(content: impl AsRef<[u8]>) -> String {
    hex::encode(digest(content))
}

/// Recompute the digest of `content` and compare it against `expected`.
///
/// The comparison is constant-time. A digest of the wrong length never matches.
pub fn verify(content: impl AsRef<[u8]>, expected: &[u8]) -> bool {
    let computed = digest(content);
    computed.as_slice().ct_eq(expected).into()
}
