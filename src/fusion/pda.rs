//! Program-derived addresses used by the custody flow.
//!
//! Each derivation has a `_with_program_id` form taking the owning program
//! explicitly; the short form uses the mainnet program id.

use solana_pubkey::Pubkey;

use crate::config::schema::{
    ATA_PROGRAM_ID, FUSION_PROGRAM_ID, TOKEN_METADATA_PROGRAM_ID, TOKEN_PROGRAM_ID,
};

const TRIFLE_SEED: &[u8] = b"trifle";
const METADATA_SEED: &[u8] = b"metadata";
const EDITION_SEED: &[u8] = b"edition";
const ESCROW_SEED: &[u8] = b"escrow";

/// Token-metadata escrow authority kind for a custody-owned escrow.
const ESCROW_AUTHORITY_CREATOR: u8 = 1;

/// Custody (trifle) account for `mint`, controlled by `authority`.
pub fn find_custody_address(mint: &Pubkey, authority: &Pubkey) -> (Pubkey, u8) {
    find_custody_address_with_program_id(mint, authority, &FUSION_PROGRAM_ID)
}

pub fn find_custody_address_with_program_id(
    mint: &Pubkey,
    authority: &Pubkey,
    fusion_program: &Pubkey,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[TRIFLE_SEED, mint.as_ref(), authority.as_ref()],
        fusion_program,
    )
}

/// Escrow sub-account of `mint` owned by the custody account `custody`.
pub fn find_escrow_address(mint: &Pubkey, custody: &Pubkey) -> (Pubkey, u8) {
    find_escrow_address_with_program_id(mint, custody, &TOKEN_METADATA_PROGRAM_ID)
}

pub fn find_escrow_address_with_program_id(
    mint: &Pubkey,
    custody: &Pubkey,
    token_metadata_program: &Pubkey,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            METADATA_SEED,
            token_metadata_program.as_ref(),
            mint.as_ref(),
            &[ESCROW_AUTHORITY_CREATOR],
            custody.as_ref(),
            ESCROW_SEED,
        ],
        token_metadata_program,
    )
}

/// Token metadata account of `mint`.
pub fn find_metadata_address(mint: &Pubkey) -> Pubkey {
    find_metadata_address_with_program_id(mint, &TOKEN_METADATA_PROGRAM_ID)
}

pub fn find_metadata_address_with_program_id(
    mint: &Pubkey,
    token_metadata_program: &Pubkey,
) -> Pubkey {
    Pubkey::find_program_address(
        &[METADATA_SEED, token_metadata_program.as_ref(), mint.as_ref()],
        token_metadata_program,
    )
    .0
}

/// Master edition account of `mint`.
pub fn find_master_edition_address(mint: &Pubkey) -> Pubkey {
    find_master_edition_address_with_program_id(mint, &TOKEN_METADATA_PROGRAM_ID)
}

pub fn find_master_edition_address_with_program_id(
    mint: &Pubkey,
    token_metadata_program: &Pubkey,
) -> Pubkey {
    Pubkey::find_program_address(
        &[
            METADATA_SEED,
            token_metadata_program.as_ref(),
            mint.as_ref(),
            EDITION_SEED,
        ],
        token_metadata_program,
    )
    .0
}

/// Associated token account of `wallet` for `mint`. `wallet` may be off
/// curve (an escrow PDA).
pub fn get_associated_token_address(wallet: &Pubkey, mint: &Pubkey) -> Pubkey {
    get_associated_token_address_with_program_id(wallet, mint, &TOKEN_PROGRAM_ID, &ATA_PROGRAM_ID)
}

pub fn get_associated_token_address_with_program_id(
    wallet: &Pubkey,
    mint: &Pubkey,
    token_program: &Pubkey,
    ata_program: &Pubkey,
) -> Pubkey {
    Pubkey::find_program_address(
        &[wallet.as_ref(), token_program.as_ref(), mint.as_ref()],
        ata_program,
    )
    .0
}

/// Constraint model account named `name`, created by `creator`.
pub fn find_constraint_model_address(creator: &Pubkey, name: &str) -> (Pubkey, u8) {
    find_constraint_model_address_with_program_id(creator, name, &FUSION_PROGRAM_ID)
}

pub fn find_constraint_model_address_with_program_id(
    creator: &Pubkey,
    name: &str,
    fusion_program: &Pubkey,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[ESCROW_SEED, creator.as_ref(), name.as_bytes()],
        fusion_program,
    )
}
