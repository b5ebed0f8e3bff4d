//! # act_key
//!
//! Achain private key encoding, public key and address derivation.
//!
//! ## Architecture
//!
//! - `crypto`: Private key parsing, encoding and address derivation
//! - `worker`: Parallel key generation and worker pool management
//! - `config`: Runtime configuration

pub mod config;
pub mod crypto;
pub mod worker;

pub use config::Config;
pub use crypto::{Address, AddressType, KeyError, PrivateKey};
pub use worker::{GeneratedKey, WorkerPool};
