//! On-chain account decoding for custody records and token metadata.

use std::collections::BTreeMap;

use borsh::BorshDeserialize;
use serde::Serialize;
use solana_pubkey::Pubkey;

use crate::error::{Error, Result};

/// Account discriminant of fusion program accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, BorshDeserialize)]
pub enum AccountKey {
    Uninitialized,
    EscrowConstraintModel,
    Trifle,
}

/// One token held in a custody slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenAmount {
    #[serde(with = "crate::pubkey::base58")]
    pub mint: Pubkey,
    pub amount: u64,
}

/// Slot name → tokens held in that slot.
pub type SlotTokens = BTreeMap<String, Vec<TokenAmount>>;

/// Decoded custody (trifle) account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustodyRecord {
    pub key: AccountKey,
    #[serde(with = "crate::pubkey::base58")]
    pub token_escrow: Pubkey,
    pub tokens: SlotTokens,
    #[serde(with = "crate::pubkey::base58")]
    pub escrow_constraint_model: Pubkey,
}

impl CustodyRecord {
    /// Decode account data. Trailing bytes (account padding) are ignored.
    pub fn from_account_data(data: &[u8]) -> Result<Self> {
        let mut cursor = data;
        let raw = RawTrifle::deserialize(&mut cursor)
            .map_err(|e| Error::decode("custody account", e))?;
        if raw.key != AccountKey::Trifle {
            return Err(Error::decode(
                "custody account",
                format!("unexpected account key {:?}", raw.key),
            ));
        }

        let tokens = raw
            .tokens
            .into_iter()
            .map(|(slot, held)| {
                let held = held
                    .into_iter()
                    .map(|t| TokenAmount {
                        mint: Pubkey::new_from_array(t.mint),
                        amount: t.amount,
                    })
                    .collect();
                (slot, held)
            })
            .collect();

        Ok(Self {
            key: raw.key,
            token_escrow: Pubkey::new_from_array(raw.token_escrow),
            tokens,
            escrow_constraint_model: Pubkey::new_from_array(raw.escrow_constraint_model),
        })
    }

    pub fn into_tokens(self) -> SlotTokens {
        self.tokens
    }
}

#[derive(BorshDeserialize)]
struct RawTokenAmount {
    mint: [u8; 32],
    amount: u64,
}

// `tokens` is a borsh map: u32 length then (key, value) pairs, which reads
// the same as a vec of tuples.
#[derive(BorshDeserialize)]
struct RawTrifle {
    key: AccountKey,
    token_escrow: [u8; 32],
    tokens: Vec<(String, Vec<RawTokenAmount>)>,
    escrow_constraint_model: [u8; 32],
}

/// Fields of a token metadata account this crate needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMetadata {
    pub update_authority: Pubkey,
    pub mint: Pubkey,
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub token_standard: Option<u8>,
    pub collection: Option<MetadataCollection>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetadataCollection {
    pub verified: bool,
    pub key: Pubkey,
}

const METADATA_KEY_V1: u8 = 4;

impl TokenMetadata {
    /// Decode a metadata account. Accounts written before the optional
    /// tail fields existed decode with those fields as `None`.
    pub fn from_account_data(data: &[u8]) -> Result<Self> {
        let mut cursor = data;
        let head = RawMetadataHead::deserialize(&mut cursor)
            .map_err(|e| Error::decode("token metadata", e))?;
        if head.key != METADATA_KEY_V1 {
            return Err(Error::decode(
                "token metadata",
                format!("unexpected account key {}", head.key),
            ));
        }

        let _edition_nonce: Option<u8> = optional_tail(&mut cursor)?;
        let token_standard: Option<u8> = optional_tail(&mut cursor)?;
        let collection: Option<RawCollection> = optional_tail(&mut cursor)?;

        Ok(Self {
            update_authority: Pubkey::new_from_array(head.update_authority),
            mint: Pubkey::new_from_array(head.mint),
            name: trim_padding(head.name),
            symbol: trim_padding(head.symbol),
            uri: trim_padding(head.uri),
            token_standard,
            collection: collection.map(|c| MetadataCollection {
                verified: c.verified,
                key: Pubkey::new_from_array(c.key),
            }),
        })
    }
}

/// Read an `Option<T>` field, treating end of data as `None`.
fn optional_tail<T: BorshDeserialize>(cursor: &mut &[u8]) -> Result<Option<T>> {
    if cursor.is_empty() {
        return Ok(None);
    }
    Option::<T>::deserialize(cursor).map_err(|e| Error::decode("token metadata", e))
}

fn trim_padding(s: String) -> String {
    s.trim_end_matches('\0').to_string()
}

#[derive(BorshDeserialize)]
struct RawCreator {
    _address: [u8; 32],
    _verified: bool,
    _share: u8,
}

#[derive(BorshDeserialize)]
struct RawMetadataHead {
    key: u8,
    update_authority: [u8; 32],
    mint: [u8; 32],
    name: String,
    symbol: String,
    uri: String,
    _seller_fee_basis_points: u16,
    _creators: Option<Vec<RawCreator>>,
    _primary_sale_happened: bool,
    _is_mutable: bool,
}

#[derive(BorshDeserialize)]
struct RawCollection {
    verified: bool,
    key: [u8; 32],
}
