//! Unsigned transactions and wire-format helpers.
//!
//! Builders in this crate return an [`UnsignedTransaction`]: an ordered
//! instruction list with no fee payer and no blockhash. Those are fixed when
//! the transaction is compiled into a `solana_transaction::Transaction` for
//! signing.
//!
//! # Wire Format
//!
//! Solana transactions use a compact binary format:
//! - Signatures (variable length array)
//! - Message (contains instructions, accounts, blockhash)

use crate::error::Error;
use solana_pubkey::Pubkey;
use solana_sdk::hash::Hash;
use solana_sdk::instruction::Instruction;
use solana_sdk::message::Message;
use solana_signature::Signature;

/// Re-export the underlying Solana Transaction type.
pub use solana_transaction::Transaction;

/// Ordered instruction list awaiting a fee payer, blockhash and signatures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnsignedTransaction {
    instructions: Vec<Instruction>,
}

impl UnsignedTransaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an instruction.
    pub fn add(&mut self, instruction: Instruction) -> &mut Self {
        self.instructions.push(instruction);
        self
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Program ids in instruction order.
    pub fn program_ids(&self) -> Vec<Pubkey> {
        self.instructions.iter().map(|ix| ix.program_id).collect()
    }

    /// Compile into a message paid for by `fee_payer`.
    pub fn compile(&self, fee_payer: &Pubkey, blockhash: &Hash) -> Transaction {
        let message = Message::new_with_blockhash(&self.instructions, Some(fee_payer), blockhash);
        Transaction::new_unsigned(message)
    }
}

impl From<Instruction> for UnsignedTransaction {
    fn from(instruction: Instruction) -> Self {
        Self {
            instructions: vec![instruction],
        }
    }
}

impl From<Vec<Instruction>> for UnsignedTransaction {
    fn from(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }
}

/// Extension trait for Transaction to add wire-format helpers.
pub trait TransactionExt {
    /// Deserialize a transaction from raw bytes (wire format).
    fn from_bytes(bytes: &[u8]) -> Result<Transaction, Error>;

    /// Serialize transaction to bytes (wire format).
    fn to_bytes(&self) -> Result<Vec<u8>, Error>;

    /// Get the fee payer address.
    fn fee_payer(&self) -> Option<Pubkey>;

    /// Get the number of instructions.
    fn num_instructions(&self) -> usize;

    /// Program ids in instruction order.
    fn program_ids(&self) -> Vec<Pubkey>;

    /// Get the index of a pubkey in the account keys, if it's a signer.
    fn signer_index(&self, pubkey: &Pubkey) -> Option<usize>;

    /// Whether the signature slot for `pubkey` has been filled.
    fn is_signed_by(&self, pubkey: &Pubkey) -> bool;
}

impl TransactionExt for Transaction {
    fn from_bytes(bytes: &[u8]) -> Result<Transaction, Error> {
        bincode::deserialize(bytes)
            .map_err(|e| Error::Serialization(format!("Failed to deserialize transaction: {}", e)))
    }

    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        bincode::serialize(self)
            .map_err(|e| Error::Serialization(format!("Failed to serialize transaction: {}", e)))
    }

    fn fee_payer(&self) -> Option<Pubkey> {
        self.message.account_keys.first().copied()
    }

    fn num_instructions(&self) -> usize {
        self.message.instructions.len()
    }

    fn program_ids(&self) -> Vec<Pubkey> {
        self.message
            .instructions
            .iter()
            .map(|ix| *ix.program_id(&self.message.account_keys))
            .collect()
    }

    fn signer_index(&self, pubkey: &Pubkey) -> Option<usize> {
        let num_signers = self.message.header.num_required_signatures as usize;
        self.message
            .account_keys
            .get(..num_signers)?
            .iter()
            .position(|x| x == pubkey)
    }

    fn is_signed_by(&self, pubkey: &Pubkey) -> bool {
        self.signer_index(pubkey)
            .and_then(|idx| self.signatures.get(idx))
            .is_some_and(|sig| *sig != Signature::default())
    }
}
