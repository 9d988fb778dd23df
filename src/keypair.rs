//! Ed25519 keypair loading and backend credentials.
//!
//! Backend-authorized flows (the fusion authority co-signing a transfer)
//! need a server-held key. It is loaded once by the caller into a
//! [`Credentials`] value and passed explicitly to whatever signs.

use crate::error::Error;
use solana_signer::Signer;

/// Re-export the underlying Solana Keypair type.
pub use solana_keypair::Keypair;

/// Extension trait for Keypair to add crate-level constructors.
pub trait KeypairExt {
    fn from_secret_key_bytes(secret_key: &[u8]) -> Result<Keypair, Error>;
    fn from_solana_secret_key(secret_key: &[u8]) -> Result<Keypair, Error>;
    fn address(&self) -> String;
}

impl KeypairExt for Keypair {
    /// Create a keypair from a 32-byte secret key (Ed25519 seed).
    fn from_secret_key_bytes(secret_key: &[u8]) -> Result<Keypair, Error> {
        let bytes: [u8; 32] = secret_key.try_into().map_err(|_| {
            Error::Credentials(format!(
                "Secret key must be 32 bytes, got {}",
                secret_key.len()
            ))
        })?;
        Ok(Keypair::new_from_array(bytes))
    }

    /// Create a keypair from a 64-byte Solana secret key (secret + public concatenated).
    fn from_solana_secret_key(secret_key: &[u8]) -> Result<Keypair, Error> {
        if secret_key.len() != 64 {
            return Err(Error::Credentials(format!(
                "Solana secret key must be 64 bytes, got {}",
                secret_key.len()
            )));
        }

        Keypair::try_from(secret_key).map_err(|e| Error::Credentials(format!("Invalid keypair: {}", e)))
    }

    /// Get the Solana address (base58-encoded public key).
    fn address(&self) -> String {
        self.pubkey().to_string()
    }
}

/// Signing key held by a backend service.
pub struct Credentials {
    keypair: Keypair,
}

impl Credentials {
    pub fn new(keypair: Keypair) -> Self {
        Self { keypair }
    }

    /// Parse a base58 secret key, either the 64-byte Solana export or a
    /// 32-byte seed.
    pub fn from_base58(secret: &str) -> Result<Self, Error> {
        let bytes = solana_sdk::bs58::decode(secret.trim())
            .into_vec()
            .map_err(|e| Error::Credentials(format!("Failed to decode secret key: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let keypair = match bytes.len() {
            32 => Keypair::from_secret_key_bytes(bytes)?,
            _ => Keypair::from_solana_secret_key(bytes)?,
        };
        Ok(Self::new(keypair))
    }

    /// Load the base58 secret stored in environment variable `var`.
    pub fn from_env(var: &str) -> Result<Self, Error> {
        let secret = std::env::var(var)
            .map_err(|_| Error::Credentials(format!("Environment variable {} not set", var)))?;
        let credentials = Self::from_base58(&secret)?;
        tracing::info!(address = %credentials.keypair.pubkey(), "Loaded signing credentials");
        Ok(credentials)
    }

    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }

    pub fn pubkey(&self) -> solana_pubkey::Pubkey {
        self.keypair.pubkey()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("pubkey", &self.keypair.pubkey())
            .finish()
    }
}
