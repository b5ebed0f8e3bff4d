//! Hash primitives used by key encoding and address derivation.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256, Sha512};

/// SHA-256 of arbitrary bytes (output 32 bytes).
pub fn sha256(input: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(input));
    out
}

/// SHA-256 applied twice, as used by the key string checksum.
pub fn double_sha256(input: &[u8]) -> [u8; 32] {
    sha256(&sha256(input))
}

/// SHA-512 of arbitrary bytes (output 64 bytes).
pub fn sha512(input: &[u8]) -> [u8; 64] {
    let mut out = [0u8; 64];
    out.copy_from_slice(&Sha512::digest(input));
    out
}

/// RIPEMD-160 of arbitrary bytes (output 20 bytes).
pub fn ripemd160(input: &[u8]) -> [u8; 20] {
    let mut out = [0u8; 20];
    out.copy_from_slice(&Ripemd160::digest(input));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_empty() {
        assert_eq!(
            hex::encode(sha256(b"")),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_double_sha256_matches_nested() {
        let data = b"achain";
        assert_eq!(double_sha256(data), sha256(&sha256(data)));
    }

    #[test]
    fn test_ripemd160_abc() {
        assert_eq!(
            hex::encode(ripemd160(b"abc")),
            "8eb208f7e05d987a9b044a8e98c6b087f15a0bfc"
        );
    }

    #[test]
    fn test_sha512_length() {
        assert_eq!(sha512(b"abc").len(), 64);
    }
}
