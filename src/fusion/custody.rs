//! Custody account lifecycle: creation, reads and slot transfers.

use std::fmt;
use std::str::FromStr;

use solana_pubkey::Pubkey;
use tracing::{info, warn};

use super::instructions::{
    create_trifle_account, transfer_in, transfer_out, CreateTrifleAccounts, TransferInAccounts,
    TransferOutAccounts,
};
use super::pda::{
    find_custody_address_with_program_id, find_escrow_address_with_program_id,
    find_master_edition_address_with_program_id, find_metadata_address_with_program_id,
    get_associated_token_address_with_program_id,
};
use super::state::{CustodyRecord, SlotTokens};
use super::token::{resolve_token, TokenRecord};
use crate::config::ProgramIds;
use crate::error::{Error, Result};
use crate::ledger::LedgerRpc;
use crate::transaction::UnsignedTransaction;

/// Transaction creating the custody account of `token`, bound to
/// `constraint_model` and controlled by `authority`. `owner` pays.
pub fn create_custody_account(
    token: &TokenRecord,
    owner: &Pubkey,
    constraint_model: &Pubkey,
    authority: &Pubkey,
    programs: &ProgramIds,
) -> Result<UnsignedTransaction> {
    let (custody, _) = find_custody_address_with_program_id(&token.mint, authority, &programs.fusion);
    let (escrow, _) =
        find_escrow_address_with_program_id(&token.mint, &custody, &programs.token_metadata);

    let accounts = CreateTrifleAccounts {
        escrow,
        metadata: token.metadata,
        mint: token.mint,
        token_account: associated_token_address(owner, &token.mint, programs),
        edition: token.edition.unwrap_or_else(|| {
            find_master_edition_address_with_program_id(&token.mint, &programs.token_metadata)
        }),
        trifle_account: custody,
        trifle_authority: *authority,
        constraint_model: *constraint_model,
        payer: *owner,
    };
    let tx = UnsignedTransaction::from(create_trifle_account(programs, &accounts)?);

    info!(mint = %token.mint, %custody, %escrow, "Built custody account creation");
    Ok(tx)
}

/// Custody record at `custody`, or `None` if the account does not exist.
pub async fn fetch_custody_record<L>(ledger: &L, custody: &Pubkey) -> Result<Option<CustodyRecord>>
where
    L: LedgerRpc + ?Sized,
{
    match ledger.account_data(custody).await? {
        Some(data) => CustodyRecord::from_account_data(&data).map(Some),
        None => {
            warn!(%custody, "Custody account not found");
            Ok(None)
        }
    }
}

/// Result of [`get_escrow_tokens`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EscrowContents {
    /// The whole decoded account.
    Record(CustodyRecord),
    /// Slot name → tokens only.
    Slots(SlotTokens),
}

/// Read the tokens held by the custody account at `custody`.
///
/// With `full_record` the decoded account is returned as is. `None` when
/// the account does not exist.
pub async fn get_escrow_tokens<L>(
    ledger: &L,
    custody: &Pubkey,
    full_record: bool,
) -> Result<Option<EscrowContents>>
where
    L: LedgerRpc + ?Sized,
{
    Ok(fetch_custody_record(ledger, custody).await?.map(|record| {
        if full_record {
            EscrowContents::Record(record)
        } else {
            EscrowContents::Slots(record.into_tokens())
        }
    }))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferDirection {
    In,
    Out,
}

impl FromStr for TransferDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "in" => Ok(TransferDirection::In),
            "out" => Ok(TransferDirection::Out),
            other => Err(Error::decode(
                "transfer direction",
                format!("expected 'in' or 'out', got '{other}'"),
            )),
        }
    }
}

impl fmt::Display for TransferDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TransferDirection::In => "in",
            TransferDirection::Out => "out",
        })
    }
}

/// Move one child token into or out of a slot of a parent's escrow.
#[derive(Debug, Clone)]
pub struct TransferRequest {
    /// Wallet holding the parent; pays and signs.
    pub token_owner: Pubkey,
    pub parent_mint: Pubkey,
    /// Escrow account of the parent's custody account.
    pub escrow: Pubkey,
    pub child_mint: Pubkey,
    /// Custody authority; co-signs.
    pub authority: Pubkey,
    pub slot: String,
    pub direction: TransferDirection,
}

/// Build the slot transfer described by `request`.
///
/// `None` when the parent has no custody account yet.
pub async fn transfer_token<L>(
    ledger: &L,
    programs: &ProgramIds,
    request: &TransferRequest,
) -> Result<Option<UnsignedTransaction>>
where
    L: LedgerRpc + ?Sized,
{
    let (custody, _) = find_custody_address_with_program_id(
        &request.parent_mint,
        &request.authority,
        &programs.fusion,
    );
    let Some(record) = fetch_custody_record(ledger, &custody).await? else {
        return Ok(None);
    };

    let child = resolve_token(ledger, programs, &request.child_mint).await?;
    let parent = resolve_token(ledger, programs, &request.parent_mint).await?;

    let instruction = match request.direction {
        TransferDirection::In => {
            let accounts = TransferInAccounts {
                trifle: custody,
                trifle_authority: request.authority,
                payer: request.token_owner,
                constraint_model: record.escrow_constraint_model,
                escrow: request.escrow,
                escrow_mint: parent.mint,
                escrow_token: parent.token_account,
                escrow_edition: parent.edition.unwrap_or_else(|| {
                    find_master_edition_address_with_program_id(
                        &parent.mint,
                        &programs.token_metadata,
                    )
                }),
                attribute_mint: child.mint,
                attribute_src_token: child.token_account,
                attribute_dst_token: associated_token_address(&request.escrow, &child.mint, programs),
                attribute_metadata: child.metadata,
                attribute_edition: child.edition,
                attribute_collection_metadata: child.collection.map(|collection| {
                    find_metadata_address_with_program_id(&collection, &programs.token_metadata)
                }),
            };
            transfer_in(programs, &accounts, &request.slot, 1)?
        }
        TransferDirection::Out => {
            let accounts = TransferOutAccounts {
                trifle_account: custody,
                constraint_model: record.escrow_constraint_model,
                escrow_account: request.escrow,
                escrow_token_account: parent.token_account,
                escrow_mint: parent.mint,
                escrow_metadata: parent.metadata,
                payer: request.token_owner,
                trifle_authority: request.authority,
                attribute_mint: child.mint,
                attribute_src_token: child.token_account,
                attribute_dst_token: associated_token_address(
                    &request.token_owner,
                    &child.mint,
                    programs,
                ),
                attribute_metadata: child.metadata,
            };
            transfer_out(programs, &accounts, &request.slot, 1)?
        }
    };

    info!(
        direction = %request.direction,
        slot = %request.slot,
        parent = %request.parent_mint,
        child = %request.child_mint,
        "Built custody transfer"
    );
    Ok(Some(UnsignedTransaction::from(instruction)))
}

fn associated_token_address(wallet: &Pubkey, mint: &Pubkey, programs: &ProgramIds) -> Pubkey {
    get_associated_token_address_with_program_id(
        wallet,
        mint,
        &programs.token,
        &programs.associated_token,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fusion::state::test_data::{custody_account, metadata_account};
    use crate::fusion::state::AccountKey;
    use crate::fusion::token::test_data::token_account;
    use crate::ledger::testing::MemoryLedger;

    fn key(n: u8) -> Pubkey {
        Pubkey::new_from_array([n; 32])
    }

    /// Parent NFT (mint 10) held by 1, child SFT (mint 20, collection 30)
    /// held by 1 as well.
    fn ledger_with_tokens(programs: &ProgramIds) -> MemoryLedger {
        let owner = key(1);
        let (parent, child, collection) = (key(10), key(20), key(30));
        let (parent_holder, child_holder) = (key(11), key(21));

        let mut ledger = MemoryLedger::default()
            .with_account(parent_holder, token_account(&parent, &owner, 1))
            .with_account(child_holder, token_account(&child, &owner, 3))
            .with_account(
                find_metadata_address_with_program_id(&parent, &programs.token_metadata),
                metadata_account(&parent, None, true),
            )
            .with_account(
                find_master_edition_address_with_program_id(&parent, &programs.token_metadata),
                vec![6u8; 282],
            )
            .with_account(
                find_metadata_address_with_program_id(&child, &programs.token_metadata),
                metadata_account(&child, Some(&collection), true),
            );
        ledger.largest_holders.insert(parent, parent_holder);
        ledger.largest_holders.insert(child, child_holder);
        ledger
    }

    fn request(direction: TransferDirection) -> TransferRequest {
        TransferRequest {
            token_owner: key(1),
            parent_mint: key(10),
            escrow: key(40),
            child_mint: key(20),
            authority: key(50),
            slot: "attack".to_string(),
            direction,
        }
    }

    fn with_custody(mut ledger: MemoryLedger, programs: &ProgramIds) -> MemoryLedger {
        let (custody, _) =
            find_custody_address_with_program_id(&key(10), &key(50), &programs.fusion);
        ledger
            .accounts
            .insert(custody, custody_account(&key(40), &key(60), &[]));
        ledger
    }

    #[test]
    fn test_transfer_direction_parse() {
        assert_eq!("in".parse::<TransferDirection>().unwrap(), TransferDirection::In);
        assert_eq!("out".parse::<TransferDirection>().unwrap(), TransferDirection::Out);
        assert!("sideways".parse::<TransferDirection>().is_err());
        assert_eq!(TransferDirection::Out.to_string(), "out");
    }

    #[test]
    fn test_create_custody_account() {
        let programs = ProgramIds::default();
        let token = TokenRecord {
            mint: key(10),
            owner: key(1),
            token_account: key(11),
            metadata: key(12),
            edition: Some(key(13)),
            collection: None,
        };

        let tx = create_custody_account(&token, &key(1), &key(60), &key(50), &programs).unwrap();
        assert_eq!(tx.len(), 1);

        let ix = &tx.instructions()[0];
        let (custody, _) = find_custody_address_with_program_id(&key(10), &key(50), &programs.fusion);
        let (escrow, _) =
            find_escrow_address_with_program_id(&key(10), &custody, &programs.token_metadata);
        assert_eq!(ix.program_id, programs.fusion);
        assert_eq!(ix.data, vec![1]);
        assert_eq!(ix.accounts[0].pubkey, escrow);
        assert_eq!(ix.accounts[1].pubkey, key(12));
        assert_eq!(
            ix.accounts[3].pubkey,
            associated_token_address(&key(1), &key(10), &programs)
        );
        assert_eq!(ix.accounts[4].pubkey, key(13));
        assert_eq!(ix.accounts[5].pubkey, custody);
        assert_eq!(ix.accounts[7].pubkey, key(60));
        assert_eq!(ix.accounts[8].pubkey, key(1));
    }

    #[tokio::test]
    async fn test_get_escrow_tokens_absent() {
        let ledger = MemoryLedger::default();
        assert_eq!(get_escrow_tokens(&ledger, &key(1), false).await.unwrap(), None);
        assert_eq!(get_escrow_tokens(&ledger, &key(1), true).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_escrow_tokens_slots_and_record() {
        let weapon = key(20);
        let ledger = MemoryLedger::default().with_account(
            key(5),
            custody_account(&key(40), &key(60), &[("attack", &[(weapon, 1)][..])]),
        );

        match get_escrow_tokens(&ledger, &key(5), false).await.unwrap() {
            Some(EscrowContents::Slots(slots)) => {
                assert_eq!(slots["attack"][0].mint, weapon);
                assert_eq!(slots["attack"][0].amount, 1);
            }
            other => panic!("expected slots, got {other:?}"),
        }

        match get_escrow_tokens(&ledger, &key(5), true).await.unwrap() {
            Some(EscrowContents::Record(record)) => {
                assert_eq!(record.key, AccountKey::Trifle);
                assert_eq!(record.escrow_constraint_model, key(60));
            }
            other => panic!("expected record, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_transfer_token_without_custody() {
        let programs = ProgramIds::default();
        let ledger = ledger_with_tokens(&programs);

        let tx = transfer_token(&ledger, &programs, &request(TransferDirection::In))
            .await
            .unwrap();
        assert!(tx.is_none());
    }

    #[tokio::test]
    async fn test_transfer_in_wiring() {
        let programs = ProgramIds::default();
        let ledger = with_custody(ledger_with_tokens(&programs), &programs);

        let tx = transfer_token(&ledger, &programs, &request(TransferDirection::In))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(tx.len(), 1);

        let ix = &tx.instructions()[0];
        let accounts: Vec<Pubkey> = ix.accounts.iter().map(|a| a.pubkey).collect();
        let (custody, _) = find_custody_address_with_program_id(&key(10), &key(50), &programs.fusion);

        assert_eq!(ix.program_id, programs.fusion);
        assert_eq!(ix.data[0], 2);
        assert_eq!(accounts[0], custody);
        assert_eq!(accounts[1], key(50));
        assert_eq!(accounts[2], key(1));
        assert_eq!(accounts[3], key(60));
        assert_eq!(accounts[4], key(40));
        assert_eq!(accounts[5], key(10));
        assert_eq!(accounts[6], key(11));
        assert_eq!(
            accounts[7],
            find_master_edition_address_with_program_id(&key(10), &programs.token_metadata)
        );
        assert_eq!(accounts[8], key(20));
        assert_eq!(accounts[9], key(21));
        assert_eq!(accounts[10], associated_token_address(&key(40), &key(20), &programs));
        // child has no master edition; collection metadata is derived
        assert_eq!(accounts[12], programs.fusion);
        assert_eq!(
            accounts[13],
            find_metadata_address_with_program_id(&key(30), &programs.token_metadata)
        );
    }

    #[tokio::test]
    async fn test_transfer_out_wiring() {
        let programs = ProgramIds::default();
        let ledger = with_custody(ledger_with_tokens(&programs), &programs);

        let tx = transfer_token(&ledger, &programs, &request(TransferDirection::Out))
            .await
            .unwrap()
            .unwrap();
        let ix = &tx.instructions()[0];
        let accounts: Vec<Pubkey> = ix.accounts.iter().map(|a| a.pubkey).collect();

        assert_eq!(ix.data[0], 3);
        assert_eq!(accounts[1], key(60));
        assert_eq!(accounts[2], key(40));
        assert_eq!(accounts[3], key(11));
        assert_eq!(accounts[4], key(10));
        assert_eq!(
            accounts[5],
            find_metadata_address_with_program_id(&key(10), &programs.token_metadata)
        );
        assert_eq!(accounts[10], associated_token_address(&key(1), &key(20), &programs));
    }
}
