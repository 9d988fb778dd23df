use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by the request builder, the fusion helper and the
/// game-state client.
///
/// Network and service failures are passed through with their original
/// payload. An on-chain account that does not exist yet is not an error:
/// those lookups return `Ok(None)`.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport-level HTTP failure (connect, TLS, body decode).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The game-state service answered with a non-2xx status.
    #[error("game-state API returned {status}: {body}")]
    Api { status: u16, body: String },

    /// Solana RPC call failed.
    #[error("RPC error: {0}")]
    Rpc(#[from] Box<solana_client::client_error::ClientError>),

    #[error("signing failed: {0}")]
    Signing(String),

    #[error("serialization failed: {0}")]
    Serialization(String),

    /// Account or response data did not have the expected layout.
    #[error("failed to decode {what}: {reason}")]
    Decode { what: &'static str, reason: String },

    #[error("invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    /// A fee amount that cannot be expressed in lamports.
    #[error("invalid amount: {0}")]
    InvalidAmount(f64),

    /// `GET /state/{id}` returned no `Item`.
    #[error("no game state record for '{0}'")]
    MissingStateItem(String),

    /// No token account holds the mint.
    #[error("no holder found for mint {0}")]
    NoTokenHolder(String),

    #[error("credentials error: {0}")]
    Credentials(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<solana_client::client_error::ClientError> for Error {
    fn from(err: solana_client::client_error::ClientError) -> Self {
        Error::Rpc(Box::new(err))
    }
}

impl Error {
    pub(crate) fn decode(what: &'static str, reason: impl ToString) -> Self {
        Error::Decode {
            what,
            reason: reason.to_string(),
        }
    }
}

/// Result type for every fallible operation in this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_keeps_body() {
        let err = Error::Api {
            status: 429,
            body: r#"{"status":429,"error":"on cooldown"}"#.to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("429"));
        assert!(msg.contains("on cooldown"));
    }

    #[test]
    fn test_decode_helper() {
        let err = Error::decode("trifle account", "unexpected key 7");
        assert_eq!(
            err.to_string(),
            "failed to decode trifle account: unexpected key 7"
        );
    }
}
