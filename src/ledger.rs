//! Solana RPC access.
//!
//! The builders only need three reads from the cluster. They go through
//! [`LedgerRpc`] so the nonblocking `RpcClient` can be swapped for an
//! in-memory ledger in tests.

use std::str::FromStr;

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_pubkey::Pubkey;
use solana_sdk::hash::Hash;

use crate::config::ClientConfig;
use crate::error::{Error, Result};

/// Nonblocking RPC client for the configured endpoint.
pub fn rpc_client(config: &ClientConfig) -> RpcClient {
    RpcClient::new(config.rpc_url.clone())
}

#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// Most recent blockhash, used as the transaction freshness token.
    async fn latest_blockhash(&self) -> Result<Hash>;

    /// Raw account data, or `None` when no account exists at `address`.
    async fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>>;

    /// The token account holding the largest balance of `mint`.
    async fn largest_token_account(&self, mint: &Pubkey) -> Result<Option<Pubkey>>;
}

#[async_trait]
impl LedgerRpc for RpcClient {
    async fn latest_blockhash(&self) -> Result<Hash> {
        let blockhash = self.get_latest_blockhash().await?;
        tracing::debug!(%blockhash, "Fetched latest blockhash");
        Ok(blockhash)
    }

    async fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        let response = self
            .get_account_with_commitment(address, self.commitment())
            .await?;
        Ok(response.value.map(|account| account.data))
    }

    async fn largest_token_account(&self, mint: &Pubkey) -> Result<Option<Pubkey>> {
        let balances = self.get_token_largest_accounts(mint).await?;
        balances
            .first()
            .map(|balance| {
                Pubkey::from_str(&balance.address).map_err(|e| Error::InvalidAddress {
                    address: balance.address.clone(),
                    reason: e.to_string(),
                })
            })
            .transpose()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rpc_client_uses_configured_url() {
        let config = ClientConfig::new("https://api.example.com").with_rpc_url("http://127.0.0.1:8899");
        assert_eq!(rpc_client(&config).url(), "http://127.0.0.1:8899");
    }
}
