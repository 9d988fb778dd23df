//! Token custody ("fusion") on the trifle program.
//!
//! A parent NFT gets a custody account, derived from its mint and a
//! backend authority, that owns an escrow. Child tokens move in and out of
//! named slots of that escrow under the rules of a constraint model.
//!
//! Builders here return an [`UnsignedTransaction`](crate::transaction::UnsignedTransaction);
//! the token owner signs it, and the relay adds the authority signature.

mod custody;
mod instructions;
mod pda;
mod state;
mod token;

pub use custody::{
    create_custody_account, fetch_custody_record, get_escrow_tokens, transfer_token,
    EscrowContents, TransferDirection, TransferRequest,
};
pub use instructions::{
    add_collection_constraint, add_none_constraint, create_constraint_model, create_trifle_account,
    transfer_in, transfer_out, AddConstraintArgs, ConstraintAccounts, CreateConstraintModelArgs,
    CreateTrifleAccounts, TransferArgs, TransferEffects, TransferInAccounts, TransferOutAccounts,
    TrifleInstruction,
};
pub use pda::*;
pub use state::{
    AccountKey, CustodyRecord, MetadataCollection, SlotTokens, TokenAmount, TokenMetadata,
};
pub use token::{resolve_token, resolve_token_owner, TokenRecord};
