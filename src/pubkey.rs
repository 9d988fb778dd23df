//! Solana public key (address) helpers.
//!
//! Wraps `solana_pubkey::Pubkey` with crate error handling and a serde
//! adapter so addresses read from config files stay base58 strings.

use crate::error::Error;
use std::str::FromStr;

/// Re-export the underlying Solana Pubkey type.
pub use solana_pubkey::Pubkey;

/// Extension trait for Pubkey to add crate-level error handling.
pub trait PubkeyExt {
    fn from_base58(address: &str) -> Result<Pubkey, Error>;
    fn from_bytes_checked(bytes: &[u8]) -> Result<Pubkey, Error>;
}

impl PubkeyExt for Pubkey {
    /// Create a Pubkey from a base58 string.
    fn from_base58(address: &str) -> Result<Pubkey, Error> {
        Pubkey::from_str(address).map_err(|e| Error::InvalidAddress {
            address: address.to_string(),
            reason: e.to_string(),
        })
    }

    /// Create a Pubkey from a byte slice with length validation.
    fn from_bytes_checked(bytes: &[u8]) -> Result<Pubkey, Error> {
        let array: [u8; 32] = bytes.try_into().map_err(|_| Error::InvalidAddress {
            address: format!("<{} bytes>", bytes.len()),
            reason: "expected 32 bytes".to_string(),
        })?;
        Ok(Pubkey::new_from_array(array))
    }
}

/// Serde adapter: `Pubkey` as a base58 string.
///
/// Use with `#[serde(with = "crate::pubkey::base58")]`.
pub mod base58 {
    use super::Pubkey;
    use serde::{de, Deserialize, Deserializer, Serializer};
    use std::str::FromStr;

    pub fn serialize<S: Serializer>(pubkey: &Pubkey, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(pubkey)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Pubkey, D::Error> {
        let s = String::deserialize(deserializer)?;
        Pubkey::from_str(&s).map_err(|e| de::Error::custom(format!("invalid pubkey {s}: {e}")))
    }
}
