//! Fusion (trifle) program instruction builders.
//!
//! Instruction data is the borsh encoding of [`TrifleInstruction`]: a one
//! byte variant index followed by the variant's arguments.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_pubkey::Pubkey;
use solana_sdk::instruction::{AccountMeta, Instruction};

use crate::config::ProgramIds;
use crate::error::{Error, Result};

// =============================================================================
// Instruction data
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum TrifleInstruction {
    CreateEscrowConstraintModelAccount(CreateConstraintModelArgs),
    CreateTrifleAccount,
    TransferIn(TransferArgs),
    TransferOut(TransferArgs),
    AddNoneConstraintToEscrowConstraintModel(AddConstraintArgs),
    AddCollectionConstraintToEscrowConstraintModel(AddConstraintArgs),
}

impl TrifleInstruction {
    pub fn data(&self) -> Result<Vec<u8>> {
        borsh::to_vec(self)
            .map_err(|e| Error::Serialization(format!("Failed to encode trifle instruction: {}", e)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct CreateConstraintModelArgs {
    pub name: String,
    pub schema_uri: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct TransferArgs {
    pub slot: String,
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct AddConstraintArgs {
    pub constraint_name: String,
    pub token_limit: u64,
    pub transfer_effects: u16,
}

/// What the program does to a token when it moves in or out of a slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferEffects(u16);

impl TransferEffects {
    pub const TRACK: u16 = 1 << 0;
    pub const BURN: u16 = 1 << 1;
    pub const FREEZE: u16 = 1 << 2;
    pub const FREEZE_PARENT: u16 = 1 << 3;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_track(self) -> Self {
        Self(self.0 | Self::TRACK)
    }

    pub fn with_burn(self) -> Self {
        Self(self.0 | Self::BURN)
    }

    pub fn with_freeze(self) -> Self {
        Self(self.0 | Self::FREEZE)
    }

    pub fn with_freeze_parent(self) -> Self {
        Self(self.0 | Self::FREEZE_PARENT)
    }

    pub fn bits(self) -> u16 {
        self.0
    }

    pub fn contains(self, flag: u16) -> bool {
        self.0 & flag == flag
    }
}

impl From<TransferEffects> for u16 {
    fn from(effects: TransferEffects) -> Self {
        effects.0
    }
}

/// Optional accounts that are absent are passed as the program id itself.
fn optional_account(address: Option<Pubkey>, program_id: &Pubkey, writable: bool) -> AccountMeta {
    match (address, writable) {
        (Some(key), true) => AccountMeta::new(key, false),
        (Some(key), false) => AccountMeta::new_readonly(key, false),
        (None, _) => AccountMeta::new_readonly(*program_id, false),
    }
}

// =============================================================================
// Custody account
// =============================================================================

/// Accounts for [`create_trifle_account`].
#[derive(Debug, Clone)]
pub struct CreateTrifleAccounts {
    pub escrow: Pubkey,
    pub metadata: Pubkey,
    pub mint: Pubkey,
    pub token_account: Pubkey,
    pub edition: Pubkey,
    pub trifle_account: Pubkey,
    pub trifle_authority: Pubkey,
    pub constraint_model: Pubkey,
    pub payer: Pubkey,
}

pub fn create_trifle_account(
    programs: &ProgramIds,
    accounts: &CreateTrifleAccounts,
) -> Result<Instruction> {
    let metas = vec![
        AccountMeta::new(accounts.escrow, false),
        AccountMeta::new(accounts.metadata, false),
        AccountMeta::new_readonly(accounts.mint, false),
        AccountMeta::new_readonly(accounts.token_account, false),
        AccountMeta::new_readonly(accounts.edition, false),
        AccountMeta::new(accounts.trifle_account, false),
        AccountMeta::new_readonly(accounts.trifle_authority, true),
        AccountMeta::new(accounts.constraint_model, false),
        AccountMeta::new(accounts.payer, true),
        AccountMeta::new_readonly(programs.token_metadata, false),
        AccountMeta::new_readonly(programs.system, false),
        AccountMeta::new_readonly(programs.sysvar_instructions, false),
    ];
    Ok(Instruction::new_with_bytes(
        programs.fusion,
        &TrifleInstruction::CreateTrifleAccount.data()?,
        metas,
    ))
}

// =============================================================================
// Transfers
// =============================================================================

/// Accounts for [`transfer_in`].
#[derive(Debug, Clone)]
pub struct TransferInAccounts {
    pub trifle: Pubkey,
    pub trifle_authority: Pubkey,
    pub payer: Pubkey,
    pub constraint_model: Pubkey,
    pub escrow: Pubkey,
    pub escrow_mint: Pubkey,
    pub escrow_token: Pubkey,
    pub escrow_edition: Pubkey,
    pub attribute_mint: Pubkey,
    pub attribute_src_token: Pubkey,
    pub attribute_dst_token: Pubkey,
    pub attribute_metadata: Pubkey,
    pub attribute_edition: Option<Pubkey>,
    pub attribute_collection_metadata: Option<Pubkey>,
}

/// Move `amount` of the attribute token into `slot` of the escrow.
pub fn transfer_in(
    programs: &ProgramIds,
    accounts: &TransferInAccounts,
    slot: &str,
    amount: u64,
) -> Result<Instruction> {
    let metas = vec![
        AccountMeta::new(accounts.trifle, false),
        AccountMeta::new_readonly(accounts.trifle_authority, true),
        AccountMeta::new(accounts.payer, true),
        AccountMeta::new(accounts.constraint_model, false),
        AccountMeta::new_readonly(accounts.escrow, false),
        AccountMeta::new_readonly(accounts.escrow_mint, false),
        AccountMeta::new(accounts.escrow_token, false),
        AccountMeta::new_readonly(accounts.escrow_edition, false),
        AccountMeta::new_readonly(accounts.attribute_mint, false),
        AccountMeta::new(accounts.attribute_src_token, false),
        AccountMeta::new(accounts.attribute_dst_token, false),
        AccountMeta::new_readonly(accounts.attribute_metadata, false),
        optional_account(accounts.attribute_edition, &programs.fusion, false),
        optional_account(accounts.attribute_collection_metadata, &programs.fusion, false),
        AccountMeta::new_readonly(programs.system, false),
        AccountMeta::new_readonly(programs.token, false),
        AccountMeta::new_readonly(programs.associated_token, false),
        AccountMeta::new_readonly(programs.token_metadata, false),
    ];
    let data = TrifleInstruction::TransferIn(TransferArgs {
        slot: slot.to_string(),
        amount,
    })
    .data()?;
    Ok(Instruction::new_with_bytes(programs.fusion, &data, metas))
}

/// Accounts for [`transfer_out`].
#[derive(Debug, Clone)]
pub struct TransferOutAccounts {
    pub trifle_account: Pubkey,
    pub constraint_model: Pubkey,
    pub escrow_account: Pubkey,
    pub escrow_token_account: Pubkey,
    pub escrow_mint: Pubkey,
    pub escrow_metadata: Pubkey,
    pub payer: Pubkey,
    pub trifle_authority: Pubkey,
    pub attribute_mint: Pubkey,
    pub attribute_src_token: Pubkey,
    pub attribute_dst_token: Pubkey,
    pub attribute_metadata: Pubkey,
}

/// Move `amount` of the attribute token out of `slot` of the escrow.
pub fn transfer_out(
    programs: &ProgramIds,
    accounts: &TransferOutAccounts,
    slot: &str,
    amount: u64,
) -> Result<Instruction> {
    let metas = vec![
        AccountMeta::new(accounts.trifle_account, false),
        AccountMeta::new(accounts.constraint_model, false),
        AccountMeta::new_readonly(accounts.escrow_account, false),
        AccountMeta::new(accounts.escrow_token_account, false),
        AccountMeta::new(accounts.escrow_mint, false),
        AccountMeta::new(accounts.escrow_metadata, false),
        AccountMeta::new(accounts.payer, true),
        AccountMeta::new_readonly(accounts.trifle_authority, true),
        AccountMeta::new_readonly(accounts.attribute_mint, false),
        AccountMeta::new(accounts.attribute_src_token, false),
        AccountMeta::new(accounts.attribute_dst_token, false),
        AccountMeta::new_readonly(accounts.attribute_metadata, false),
        AccountMeta::new_readonly(programs.system, false),
        AccountMeta::new_readonly(programs.associated_token, false),
        AccountMeta::new_readonly(programs.token, false),
        AccountMeta::new_readonly(programs.token_metadata, false),
        AccountMeta::new_readonly(programs.sysvar_instructions, false),
    ];
    let data = TrifleInstruction::TransferOut(TransferArgs {
        slot: slot.to_string(),
        amount,
    })
    .data()?;
    Ok(Instruction::new_with_bytes(programs.fusion, &data, metas))
}

// =============================================================================
// Constraint models
// =============================================================================

/// Create the constraint model account `constraint_model` named `name`.
pub fn create_constraint_model(
    programs: &ProgramIds,
    constraint_model: &Pubkey,
    payer: &Pubkey,
    update_authority: &Pubkey,
    name: &str,
    schema_uri: Option<&str>,
) -> Result<Instruction> {
    let data = TrifleInstruction::CreateEscrowConstraintModelAccount(CreateConstraintModelArgs {
        name: name.to_string(),
        schema_uri: schema_uri.map(str::to_string),
    })
    .data()?;
    Ok(Instruction::new_with_bytes(
        programs.fusion,
        &data,
        vec![
            AccountMeta::new(*constraint_model, false),
            AccountMeta::new(*payer, true),
            AccountMeta::new_readonly(*update_authority, true),
            AccountMeta::new_readonly(programs.system, false),
        ],
    ))
}

/// Accounts shared by the add-constraint instructions.
#[derive(Debug, Clone)]
pub struct ConstraintAccounts {
    pub constraint_model: Pubkey,
    pub payer: Pubkey,
    pub update_authority: Pubkey,
}

/// Slot `constraint_name` that accepts any token.
pub fn add_none_constraint(
    programs: &ProgramIds,
    accounts: &ConstraintAccounts,
    constraint_name: &str,
    token_limit: u64,
    effects: TransferEffects,
) -> Result<Instruction> {
    let data = TrifleInstruction::AddNoneConstraintToEscrowConstraintModel(AddConstraintArgs {
        constraint_name: constraint_name.to_string(),
        token_limit,
        transfer_effects: effects.bits(),
    })
    .data()?;
    Ok(Instruction::new_with_bytes(
        programs.fusion,
        &data,
        vec![
            AccountMeta::new(accounts.constraint_model, false),
            AccountMeta::new(accounts.payer, true),
            AccountMeta::new_readonly(accounts.update_authority, true),
            AccountMeta::new_readonly(programs.system, false),
            AccountMeta::new_readonly(programs.sysvar_instructions, false),
        ],
    ))
}

/// Slot `constraint_name` restricted to members of `collection_mint`.
pub fn add_collection_constraint(
    programs: &ProgramIds,
    accounts: &ConstraintAccounts,
    collection_mint: &Pubkey,
    collection_metadata: &Pubkey,
    constraint_name: &str,
    token_limit: u64,
    effects: TransferEffects,
) -> Result<Instruction> {
    let data =
        TrifleInstruction::AddCollectionConstraintToEscrowConstraintModel(AddConstraintArgs {
            constraint_name: constraint_name.to_string(),
            token_limit,
            transfer_effects: effects.bits(),
        })
        .data()?;
    Ok(Instruction::new_with_bytes(
        programs.fusion,
        &data,
        vec![
            AccountMeta::new(accounts.constraint_model, false),
            AccountMeta::new(accounts.payer, true),
            AccountMeta::new_readonly(accounts.update_authority, true),
            AccountMeta::new_readonly(*collection_mint, false),
            AccountMeta::new_readonly(*collection_metadata, false),
            AccountMeta::new_readonly(programs.system, false),
            AccountMeta::new_readonly(programs.sysvar_instructions, false),
        ],
    ))
}
