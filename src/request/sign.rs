//! Signing and wire serialization.

use solana_keypair::Keypair;
use solana_signer::Signer;
use tracing::debug;

use crate::error::{Error, Result};
use crate::ledger::LedgerRpc;
use crate::transaction::{Transaction, TransactionExt, UnsignedTransaction};

/// Compile `tx` with `signer` as fee payer against the latest blockhash and
/// add `signer`'s signature.
///
/// Other required signatures (the action recipient on a memo, the fusion
/// authority on a transfer) are left zeroed for the relay to fill in.
pub async fn sign_transaction<L>(
    ledger: &L,
    signer: &Keypair,
    tx: &UnsignedTransaction,
) -> Result<Transaction>
where
    L: LedgerRpc + ?Sized,
{
    let blockhash = ledger.latest_blockhash().await?;
    let fee_payer = signer.pubkey();

    let mut compiled = tx.compile(&fee_payer, &blockhash);
    compiled
        .try_partial_sign(&[signer], blockhash)
        .map_err(|e| Error::Signing(e.to_string()))?;

    debug!(
        %fee_payer,
        %blockhash,
        signatures = compiled.signatures.len(),
        "Signed transaction"
    );
    Ok(compiled)
}

/// [`sign_transaction`], then serialize to wire bytes.
pub async fn sign_and_serialize<L>(
    ledger: &L,
    signer: &Keypair,
    tx: &UnsignedTransaction,
) -> Result<Vec<u8>>
where
    L: LedgerRpc + ?Sized,
{
    sign_transaction(ledger, signer, tx).await?.to_bytes()
}
