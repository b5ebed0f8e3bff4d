//! Achain private key encoding and derivation.
//!
//! A [`PrivateKey`] owns a 32-byte secp256k1 scalar. Everything else (the
//! Base58Check key string, both public key forms, the account address) is
//! derived from it on first use and cached for the life of the key.

use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use once_cell::sync::OnceCell;
use secp256k1::{PublicKey, Secp256k1, SecretKey};

use super::hash::{double_sha256, ripemd160, sha256, sha512};
use super::{Address, AddressType};

/// Version byte prepended to the scalar in the key string.
pub const KEY_VERSION: u8 = 0x80;

/// Decoded length of a key string: version + scalar + checksum.
pub const ENCODED_KEY_LEN: usize = 1 + 32 + 4;

/// Upper bound on rejected scalars before [`PrivateKey::generate`] gives up.
pub const MAX_GENERATION_ATTEMPTS: usize = 64;

/// Prefix of the public key text form.
const PUBLIC_KEY_PREFIX: &str = "ACT";

#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("Invalid Base58 encoding: {0}")]
    InvalidEncoding(#[from] bs58::decode::Error),
    #[error("Malformed private key: expected 37 decoded bytes, got {len}")]
    MalformedKey { len: usize },
    #[error("Private key checksum mismatch")]
    ChecksumMismatch,
    #[error("Invalid private key length: expected 32 bytes, got {len}")]
    InvalidLength { len: usize },
    #[error("Elliptic curve engine failure: {0}")]
    EngineFailure(#[from] secp256k1::Error),
    #[error("No full-width scalar generated after {attempts} attempts")]
    GenerationExhausted { attempts: usize },
}

/// An Achain private key with lazily derived encodings.
///
/// Each derived value lives in its own [`OnceCell`], so it is computed at most
/// once even when several threads ask for it at the same time.
#[derive(Clone)]
pub struct PrivateKey {
    /// The raw scalar (32 bytes, big-endian)
    encoded: [u8; 32],
    key_string: OnceCell<String>,
    scalar: OnceCell<BigUint>,
    secret_key: OnceCell<SecretKey>,
    public_key_compressed: OnceCell<[u8; 33]>,
    public_key_uncompressed: OnceCell<[u8; 65]>,
    address: OnceCell<Address>,
}

impl PrivateKey {
    fn with_scalar(encoded: [u8; 32]) -> Self {
        Self {
            encoded,
            key_string: OnceCell::new(),
            scalar: OnceCell::new(),
            secret_key: OnceCell::new(),
            public_key_compressed: OnceCell::new(),
            public_key_uncompressed: OnceCell::new(),
            address: OnceCell::new(),
        }
    }

    /// Parses a Base58Check key string (`0x80 || scalar || checksum`).
    ///
    /// The supplied text is kept as the key string; it is not re-encoded.
    pub fn from_encoded_text(key_str: &str) -> Result<Self, KeyError> {
        let decoded = bs58::decode(key_str).into_vec()?;
        if decoded.len() != ENCODED_KEY_LEN {
            return Err(KeyError::MalformedKey { len: decoded.len() });
        }
        verify_checksum(&decoded)?;

        let mut encoded = [0u8; 32];
        encoded.copy_from_slice(&decoded[1..33]);

        let key = Self::with_scalar(encoded);
        // Freshly created cell, cannot already be set.
        let _ = key.key_string.set(key_str.to_owned());
        Ok(key)
    }

    /// Wraps a raw 32-byte scalar.
    ///
    /// No curve validation happens here; a zero or out-of-range scalar is
    /// reported by the accessors that need the curve engine.
    pub fn from_raw_scalar(bytes: &[u8]) -> Result<Self, KeyError> {
        let encoded: [u8; 32] = bytes
            .try_into()
            .map_err(|_| KeyError::InvalidLength { len: bytes.len() })?;
        Ok(Self::with_scalar(encoded))
    }

    /// Generates a new random key.
    ///
    /// Scalars with a leading zero byte are rejected so the stored encoding is
    /// always full width.
    pub fn generate() -> Result<Self, KeyError> {
        let secp = Secp256k1::new();

        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let (secret_key, _) = secp.generate_keypair(&mut rand::thread_rng());
            let encoded = secret_key.secret_bytes();

            if encoded[0] != 0 {
                let key = Self::with_scalar(encoded);
                let _ = key.secret_key.set(secret_key);
                return Ok(key);
            }
            log::debug!("rejected short scalar on attempt {}", attempt);
        }

        Err(KeyError::GenerationExhausted {
            attempts: MAX_GENERATION_ATTEMPTS,
        })
    }

    /// Returns the Base58Check key string.
    pub fn to_key_string(&self) -> &str {
        self.key_string.get_or_init(|| {
            let mut payload = [0u8; ENCODED_KEY_LEN];
            payload[0] = KEY_VERSION;
            payload[1..33].copy_from_slice(&self.encoded);
            let checksum = double_sha256(&payload[..33]);
            payload[33..].copy_from_slice(&checksum[..4]);

            bs58::encode(payload).into_string()
        })
    }

    /// Returns the raw scalar bytes.
    pub fn raw_encoded(&self) -> &[u8; 32] {
        &self.encoded
    }

    /// Returns the curve engine's secret key for this scalar.
    pub fn ec_key_handle(&self) -> Result<&SecretKey, KeyError> {
        self.secret_key
            .get_or_try_init(|| SecretKey::from_slice(&self.encoded))
            .map_err(KeyError::from)
    }

    /// Returns the public key, compressed (33 bytes) or uncompressed (65 bytes).
    ///
    /// The two forms are cached separately.
    pub fn public_key(&self, compressed: bool) -> Result<&[u8], KeyError> {
        if compressed {
            let key = self
                .public_key_compressed
                .get_or_try_init(|| Ok::<_, KeyError>(self.derive_public_key()?.serialize()))?;
            Ok(key.as_slice())
        } else {
            let key = self.public_key_uncompressed.get_or_try_init(|| {
                Ok::<_, KeyError>(self.derive_public_key()?.serialize_uncompressed())
            })?;
            Ok(key.as_slice())
        }
    }

    /// Returns the scalar as an unsigned big-endian integer.
    pub fn scalar_as_integer(&self) -> &BigUint {
        self.scalar
            .get_or_init(|| BigUint::from_bytes_be(&self.encoded))
    }

    /// Returns the account address.
    ///
    /// Process:
    /// 1. Serialize the public key in compressed form (33 bytes)
    /// 2. Hash it with SHA-512
    /// 3. Hash the digest with RIPEMD-160
    pub fn address(&self) -> Result<&Address, KeyError> {
        self.address.get_or_try_init(|| {
            let hash = ripemd160(&sha512(self.public_key(true)?));
            Ok::<_, KeyError>(Address::new(hash, AddressType::Address))
        })
    }

    /// Returns the public key text form: `ACT || base58(pubkey || ripemd160(pubkey)[..4])`.
    pub fn public_key_string(&self) -> Result<String, KeyError> {
        let public_key = self.public_key(true)?;
        let checksum = ripemd160(public_key);

        let mut payload = Vec::with_capacity(public_key.len() + 4);
        payload.extend_from_slice(public_key);
        payload.extend_from_slice(&checksum[..4]);

        Ok(format!(
            "{}{}",
            PUBLIC_KEY_PREFIX,
            bs58::encode(payload).into_string()
        ))
    }

    /// Returns the raw scalar as a hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.encoded)
    }

    fn derive_public_key(&self) -> Result<PublicKey, KeyError> {
        let secp = Secp256k1::signing_only();
        Ok(PublicKey::from_secret_key(&secp, self.ec_key_handle()?))
    }
}

/// Checks the trailing 4 bytes of a decoded key string.
///
/// Keys written by older Achain tooling carry the checksum hashed one extra
/// time; those are accepted as well.
fn verify_checksum(decoded: &[u8]) -> Result<(), KeyError> {
    let expected = &decoded[33..];
    let checksum = double_sha256(&decoded[..33]);
    if checksum[..4] == *expected {
        return Ok(());
    }
    if sha256(&checksum)[..4] == *expected {
        log::debug!("private key accepted with legacy checksum");
        return Ok(());
    }
    Err(KeyError::ChecksumMismatch)
}

impl FromStr for PrivateKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_encoded_text(s)
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.encoded == other.encoded
    }
}

impl Eq for PrivateKey {}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("encoded", &"<redacted>")
            .finish()
    }
}
