//! Token ownership and metadata lookups.

use solana_pubkey::Pubkey;
use spl_token::solana_program::program_pack::Pack;
use spl_token::state::Account as SplTokenAccount;
use tracing::debug;

use super::pda::{find_master_edition_address_with_program_id, find_metadata_address_with_program_id};
use super::state::TokenMetadata;
use crate::config::ProgramIds;
use crate::error::{Error, Result};
use crate::ledger::LedgerRpc;

/// An NFT or SFT as seen by the custody instructions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRecord {
    pub mint: Pubkey,
    /// Wallet owning `token_account`.
    pub owner: Pubkey,
    /// Token account holding the largest balance of `mint`.
    pub token_account: Pubkey,
    pub metadata: Pubkey,
    /// Master edition, when the account exists. SFTs have none.
    pub edition: Option<Pubkey>,
    /// Collection mint from the metadata, verified or not.
    pub collection: Option<Pubkey>,
}

/// Owner of the token account holding the largest balance of `mint`.
pub async fn resolve_token_owner<L>(ledger: &L, mint: &Pubkey) -> Result<Pubkey>
where
    L: LedgerRpc + ?Sized,
{
    Ok(resolve_holder(ledger, mint).await?.1)
}

/// `(token account, owner)` of the largest holder of `mint`.
async fn resolve_holder<L>(ledger: &L, mint: &Pubkey) -> Result<(Pubkey, Pubkey)>
where
    L: LedgerRpc + ?Sized,
{
    let token_account = ledger
        .largest_token_account(mint)
        .await?
        .ok_or_else(|| Error::NoTokenHolder(mint.to_string()))?;
    let data = ledger
        .account_data(&token_account)
        .await?
        .ok_or_else(|| Error::NoTokenHolder(mint.to_string()))?;

    let account = data
        .get(..SplTokenAccount::LEN)
        .ok_or_else(|| Error::decode("token account", format!("{} bytes", data.len())))
        .and_then(|bytes| {
            SplTokenAccount::unpack(bytes).map_err(|e| Error::decode("token account", e))
        })?;
    let owner = Pubkey::new_from_array(account.owner.to_bytes());

    debug!(%mint, %token_account, %owner, "Resolved token holder");
    Ok((token_account, owner))
}

/// Holder, metadata, edition and collection of `mint`.
pub async fn resolve_token<L>(ledger: &L, programs: &ProgramIds, mint: &Pubkey) -> Result<TokenRecord>
where
    L: LedgerRpc + ?Sized,
{
    let (token_account, owner) = resolve_holder(ledger, mint).await?;

    let metadata = find_metadata_address_with_program_id(mint, &programs.token_metadata);
    let metadata_data = ledger
        .account_data(&metadata)
        .await?
        .ok_or_else(|| Error::decode("token metadata", format!("no metadata account for {mint}")))?;
    let collection = TokenMetadata::from_account_data(&metadata_data)?
        .collection
        .map(|c| c.key);

    let edition_address = find_master_edition_address_with_program_id(mint, &programs.token_metadata);
    let edition = ledger
        .account_data(&edition_address)
        .await?
        .map(|_| edition_address);

    Ok(TokenRecord {
        mint: *mint,
        owner,
        token_account,
        metadata,
        edition,
        collection,
    })
}

#[cfg(test)]
pub(crate) mod test_data {
    use super::*;
    use spl_token::state::AccountState;

    pub fn token_account(mint: &Pubkey, owner: &Pubkey, amount: u64) -> Vec<u8> {
        let account = SplTokenAccount {
            mint: spl_token::solana_program::pubkey::Pubkey::new_from_array(mint.to_bytes()),
            owner: spl_token::solana_program::pubkey::Pubkey::new_from_array(owner.to_bytes()),
            amount,
            state: AccountState::Initialized,
            ..Default::default()
        };
        let mut data = vec![0u8; SplTokenAccount::LEN];
        SplTokenAccount::pack(account, &mut data).unwrap();
        data
    }
}
