//! Cryptographic operations for Achain keys and addresses.
//!
//! This module provides:
//! - Base58Check private key encoding and validation
//! - secp256k1 public key derivation
//! - Address derivation using SHA-512 and RIPEMD-160

mod address;
pub mod hash;
mod private_key;

pub use address::{Address, AddressError, AddressType};
pub use private_key::{
    KeyError, PrivateKey, ENCODED_KEY_LEN, KEY_VERSION, MAX_GENERATION_ATTEMPTS,
};
