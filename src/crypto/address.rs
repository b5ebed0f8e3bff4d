//! Achain address representation and utilities.

use std::fmt;
use std::str::FromStr;

use super::hash::ripemd160;

/// Length of the checksum appended to the address hash before Base58 encoding.
const CHECKSUM_LEN: usize = 4;

/// The kind of account an address identifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AddressType {
    /// A regular account address
    #[default]
    Address,
    /// A contract address
    Contract,
}

impl AddressType {
    /// Returns the text prefix for this address type.
    pub const fn prefix(self) -> &'static str {
        match self {
            AddressType::Address => "ACT",
            AddressType::Contract => "CON",
        }
    }
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressType::Address => write!(f, "ADDRESS"),
            AddressType::Contract => write!(f, "CONTRACT"),
        }
    }
}

/// An Achain address: a 20-byte hash tagged with its type.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address {
    hash: [u8; 20],
    kind: AddressType,
}

impl Address {
    /// Creates an address from a raw 20-byte hash.
    #[inline]
    pub const fn new(hash: [u8; 20], kind: AddressType) -> Self {
        Self { hash, kind }
    }

    /// Returns the address hash as raw bytes.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.hash
    }

    /// Returns the address type.
    #[inline]
    pub const fn kind(&self) -> AddressType {
        self.kind
    }

    /// Returns the hash as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.hash)
    }

    /// Returns the prefixed Base58 form: `prefix || base58(hash || ripemd160(hash)[..4])`.
    pub fn to_base58(&self) -> String {
        let checksum = ripemd160(&self.hash);
        let mut payload = [0u8; 20 + CHECKSUM_LEN];
        payload[..20].copy_from_slice(&self.hash);
        payload[20..].copy_from_slice(&checksum[..CHECKSUM_LEN]);

        format!("{}{}", self.kind.prefix(), bs58::encode(payload).into_string())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_base58())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base58())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, body) = [AddressType::Address, AddressType::Contract]
            .into_iter()
            .find_map(|kind| s.strip_prefix(kind.prefix()).map(|body| (kind, body)))
            .ok_or(AddressError::UnknownPrefix)?;

        let decoded = bs58::decode(body).into_vec()?;
        if decoded.len() != 20 + CHECKSUM_LEN {
            return Err(AddressError::InvalidLength { len: decoded.len() });
        }

        let mut hash = [0u8; 20];
        hash.copy_from_slice(&decoded[..20]);
        if ripemd160(&hash)[..CHECKSUM_LEN] != decoded[20..] {
            return Err(AddressError::ChecksumMismatch);
        }

        Ok(Self::new(hash, kind))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AddressError {
    #[error("Unknown address prefix")]
    UnknownPrefix,
    #[error("Invalid Base58 encoding: {0}")]
    InvalidEncoding(#[from] bs58::decode::Error),
    #[error("Invalid address length: expected 24 bytes, got {len}")]
    InvalidLength { len: usize },
    #[error("Address checksum mismatch")]
    ChecksumMismatch,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known_hash() -> [u8; 20] {
        // ripemd160(sha512(G)) for the compressed generator point
        hex::decode("0cb77e141cf93557a06ead56f765d4f121ec84fe")
            .unwrap()
            .try_into()
            .unwrap()
    }

    #[test]
    fn test_base58_address() {
        let addr = Address::new(known_hash(), AddressType::Address);
        assert_eq!(addr.to_string(), "ACT2AEvasXgyVpNhNiwMGFtFFbsr8UH5BXqo");
    }

    #[test]
    fn test_parse_roundtrip() {
        let addr = Address::new(known_hash(), AddressType::Contract);
        let text = addr.to_string();
        assert!(text.starts_with("CON"));

        let parsed: Address = text.parse().unwrap();
        assert_eq!(parsed, addr);
        assert_eq!(parsed.kind(), AddressType::Contract);
    }

    #[test]
    fn test_parse_rejects_tampered() {
        // Last character changed
        let err = "ACT2AEvasXgyVpNhNiwMGFtFFbsr8UH5BXqp"
            .parse::<Address>()
            .unwrap_err();
        assert!(matches!(
            err,
            AddressError::ChecksumMismatch | AddressError::InvalidLength { .. }
        ));
    }

    #[test]
    fn test_parse_rejects_unknown_prefix() {
        let err = "BTC2AEvasXgyVpNhNiwMGFtFFbsr8UH5BXqo"
            .parse::<Address>()
            .unwrap_err();
        assert!(matches!(err, AddressError::UnknownPrefix));
    }

    #[test]
    fn test_hex_output() {
        let addr = Address::new([0u8; 20], AddressType::Address);
        assert_eq!(addr.to_hex(), "0000000000000000000000000000000000000000");
        assert_eq!(addr.kind().to_string(), "ADDRESS");
    }
}
