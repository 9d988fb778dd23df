//! Action transaction building.
//!
//! Builds the memo (and, for attacks, fee transfers) directly as SDK
//! instructions from an [`ActionIntent`] and the season's [`GameState`].

use solana_pubkey::Pubkey;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_system_interface::instruction as system_ix;
use tracing::{debug, info};

use super::types::{ActionIntent, MemoContent};
use crate::config::ProgramIds;
use crate::error::{Error, Result};
use crate::pubkey::PubkeyExt;
use crate::state::{GameState, StateSource};
use crate::transaction::UnsignedTransaction;

pub const LAMPORTS_PER_SOL: f64 = 1_000_000_000.0;

/// Convert a SOL amount to lamports, rounding to the nearest lamport.
pub fn sol_to_lamports(sol: f64) -> Result<u64> {
    if !sol.is_finite() || sol < 0.0 {
        return Err(Error::InvalidAmount(sol));
    }
    let lamports = (sol * LAMPORTS_PER_SOL).round();
    if lamports > u64::MAX as f64 {
        return Err(Error::InvalidAmount(sol));
    }
    Ok(lamports as u64)
}

/// Memo instruction carrying `content`, signed by both the actor and the
/// action recipient.
pub fn create_memo_instruction(
    signer: &Pubkey,
    recipient: &Pubkey,
    memo_program: &Pubkey,
    content: &str,
) -> Instruction {
    Instruction::new_with_bytes(
        *memo_program,
        content.as_bytes(),
        vec![
            AccountMeta::new(*signer, true),
            AccountMeta::new(*recipient, true),
        ],
    )
}

/// System transfer of `sol` SOL from `from` to `to`.
pub fn create_transfer_instruction(from: &Pubkey, to: &Pubkey, sol: f64) -> Result<Instruction> {
    Ok(system_ix::transfer(from, to, sol_to_lamports(sol)?))
}

/// Build the action transaction against an already-fetched state.
///
/// `None` state is treated like a state without fees.
pub fn build_request_tx(
    intent: &ActionIntent,
    state: Option<&GameState>,
    programs: &ProgramIds,
) -> Result<UnsignedTransaction> {
    let memo = serde_json::to_string(&MemoContent::from(intent))
        .map_err(|e| Error::Serialization(format!("Failed to encode memo: {}", e)))?;

    let mut tx = UnsignedTransaction::from(create_memo_instruction(
        &intent.actor,
        &programs.action_recipient,
        &programs.memo,
        &memo,
    ));

    if intent.action.charges_fees() {
        let fees = match state {
            Some(state) => state.fees()?,
            None => Vec::new(),
        };
        for fee in &fees {
            let to = Pubkey::from_base58(&fee.address)?;
            tx.add(create_transfer_instruction(&intent.actor, &to, fee.sol)?);
        }
    }

    Ok(tx)
}

/// Builds action transactions against live season state.
pub struct RequestBuilder<S> {
    state: S,
    programs: ProgramIds,
}

impl<S: StateSource> RequestBuilder<S> {
    pub fn new(state: S, programs: ProgramIds) -> Self {
        Self { state, programs }
    }

    pub fn programs(&self) -> &ProgramIds {
        &self.programs
    }

    pub fn state_source(&self) -> &S {
        &self.state
    }

    /// Fetch the state for `intent.season_id` and build the transaction.
    pub async fn create_request_tx(&self, intent: &ActionIntent) -> Result<UnsignedTransaction> {
        let state = self.state.fetch_state_record(&intent.season_id).await?;
        if state.is_none() {
            debug!(season = %intent.season_id, "No state record; building without fees");
        }

        let tx = build_request_tx(intent, state.as_ref(), &self.programs)?;
        info!(
            action = %intent.action,
            season = %intent.season_id,
            token = %intent.token_address,
            instructions = tx.len(),
            "Built action transaction"
        );
        Ok(tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::types::ActionKind;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;

    const FEE_ADDRESS: &str = "FKjSjCqByQRwSzZoMXA7bKnDbJe41YgJTHFFzBeC42bH";

    struct FixedState(HashMap<String, GameState>);

    #[async_trait]
    impl StateSource for FixedState {
        async fn fetch_state_record(&self, id: &str) -> Result<Option<GameState>> {
            Ok(self.0.get(id).cloned())
        }
    }

    struct FailingState;

    #[async_trait]
    impl StateSource for FailingState {
        async fn fetch_state_record(&self, _id: &str) -> Result<Option<GameState>> {
            Err(Error::Api {
                status: 503,
                body: "unavailable".to_string(),
            })
        }
    }

    fn intent(action: ActionKind) -> ActionIntent {
        ActionIntent {
            actor: Pubkey::new_from_array([9u8; 32]),
            token_address: Pubkey::new_from_array([2u8; 32]),
            collection_address: Pubkey::new_from_array([3u8; 32]),
            season_id: "s1".to_string(),
            target: json!("boss"),
            action,
        }
    }

    fn state_with_fees(fees: &[(&str, f64)]) -> GameState {
        GameState {
            id: Some(json!("s1")),
            fees: Some(
                fees.iter()
                    .map(|(address, sol)| json!({ "address": address, "sol": sol }))
                    .collect(),
            ),
            ..Default::default()
        }
    }

    fn transfer_lamports(ix: &Instruction) -> u64 {
        // SystemInstruction::Transfer: u32 tag 2, then u64 lamports
        assert_eq!(&ix.data[..4], &[2, 0, 0, 0]);
        u64::from_le_bytes(ix.data[4..12].try_into().unwrap())
    }

    #[test]
    fn test_sol_to_lamports() {
        assert_eq!(sol_to_lamports(0.1).unwrap(), 100_000_000);
        assert_eq!(sol_to_lamports(1.0).unwrap(), 1_000_000_000);
        assert_eq!(sol_to_lamports(0.0).unwrap(), 0);
        assert_eq!(sol_to_lamports(0.000000001).unwrap(), 1);
        assert_eq!(sol_to_lamports(0.3).unwrap(), 300_000_000);
        assert!(matches!(sol_to_lamports(-0.5), Err(Error::InvalidAmount(_))));
        assert!(sol_to_lamports(f64::NAN).is_err());
        assert!(sol_to_lamports(f64::INFINITY).is_err());
    }

    #[test]
    fn test_memo_instruction_accounts() {
        let signer = Pubkey::new_from_array([1u8; 32]);
        let recipient = Pubkey::new_from_array([4u8; 32]);
        let program = ProgramIds::default().memo;

        let ix = create_memo_instruction(&signer, &recipient, &program, "{}");
        assert_eq!(ix.program_id, program);
        assert_eq!(ix.data, b"{}");
        assert_eq!(ix.accounts.len(), 2);
        assert!(ix.accounts.iter().all(|a| a.is_signer && a.is_writable));
        assert_eq!(ix.accounts[0].pubkey, signer);
        assert_eq!(ix.accounts[1].pubkey, recipient);
    }

    #[test]
    fn test_non_attack_never_charges() {
        let state = state_with_fees(&[(FEE_ADDRESS, 0.1), (FEE_ADDRESS, 0.2)]);
        let programs = ProgramIds::default();

        for action in [
            ActionKind::Loot,
            ActionKind::Boss,
            ActionKind::Other("heal".into()),
        ] {
            let tx = build_request_tx(&intent(action), Some(&state), &programs).unwrap();
            assert_eq!(tx.len(), 1);
            assert_eq!(tx.program_ids(), vec![programs.memo]);
        }
    }

    #[test]
    fn test_attack_appends_one_transfer_per_fee() {
        let second = Pubkey::new_from_array([5u8; 32]).to_string();
        let state = state_with_fees(&[(FEE_ADDRESS, 0.1), (second.as_str(), 0.25)]);
        let programs = ProgramIds::default();
        let intent = intent(ActionKind::Attack);

        let tx = build_request_tx(&intent, Some(&state), &programs).unwrap();
        assert_eq!(tx.len(), 3);

        let ixs = tx.instructions();
        assert_eq!(ixs[0].program_id, programs.memo);
        assert_eq!(ixs[1].program_id, programs.system);
        assert_eq!(transfer_lamports(&ixs[1]), 100_000_000);
        assert_eq!(transfer_lamports(&ixs[2]), 250_000_000);
        assert_eq!(ixs[1].accounts[0].pubkey, intent.actor);
        assert_eq!(ixs[1].accounts[1].pubkey.to_string(), FEE_ADDRESS);
        assert_eq!(ixs[2].accounts[1].pubkey.to_string(), second);
    }

    #[test]
    fn test_attack_without_state_or_fees() {
        let programs = ProgramIds::default();
        let attack = intent(ActionKind::Attack);

        assert_eq!(build_request_tx(&attack, None, &programs).unwrap().len(), 1);
        let empty = GameState::default();
        assert_eq!(
            build_request_tx(&attack, Some(&empty), &programs)
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn test_attack_with_bad_fee_address() {
        let state = state_with_fees(&[("not-an-address", 0.1)]);
        let err = build_request_tx(&intent(ActionKind::Attack), Some(&state), &ProgramIds::default())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidAddress { .. }));
    }

    #[test]
    fn test_malformed_fee_schedule_only_blocks_attacks() {
        let state = GameState {
            id: Some(json!(1)),
            fees: Some(json!([{ "address": FEE_ADDRESS, "sol": "0.1" }])),
            ..Default::default()
        };
        let programs = ProgramIds::default();

        let loot = build_request_tx(&intent(ActionKind::Loot), Some(&state), &programs).unwrap();
        assert_eq!(loot.len(), 1);

        let err = build_request_tx(&intent(ActionKind::Attack), Some(&state), &programs)
            .unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[tokio::test]
    async fn test_create_request_tx_loot_ignores_fee_shape() {
        let state = GameState {
            fees: Some(json!({ "unexpected": true })),
            ..Default::default()
        };
        let states = HashMap::from([("s1".to_string(), state)]);
        let builder = RequestBuilder::new(FixedState(states), ProgramIds::default());

        let tx = builder
            .create_request_tx(&intent(ActionKind::Loot))
            .await
            .unwrap();
        assert_eq!(tx.len(), 1);
    }

    #[tokio::test]
    async fn test_create_request_tx_from_state() {
        let states = HashMap::from([("s1".to_string(), state_with_fees(&[(FEE_ADDRESS, 0.1)]))]);
        let builder = RequestBuilder::new(FixedState(states), ProgramIds::default());
        let intent = intent(ActionKind::Attack);

        let tx = builder.create_request_tx(&intent).await.unwrap();
        let ixs = tx.instructions();
        assert_eq!(ixs.len(), 2);

        let memo: serde_json::Value = serde_json::from_slice(&ixs[0].data).unwrap();
        assert_eq!(memo["seasonId"], "s1");
        assert_eq!(memo["action"], "attack");
        assert_eq!(memo["nftAddress"], intent.token_address.to_string());
        assert_eq!(ixs[0].accounts[1].pubkey, builder.programs().action_recipient);

        assert_eq!(transfer_lamports(&ixs[1]), 100_000_000);
        assert_eq!(ixs[1].accounts[0].pubkey, intent.actor);
        assert_eq!(ixs[1].accounts[1].pubkey.to_string(), FEE_ADDRESS);
    }

    #[tokio::test]
    async fn test_create_request_tx_missing_state() {
        let builder = RequestBuilder::new(FixedState(HashMap::new()), ProgramIds::default());
        let tx = builder
            .create_request_tx(&intent(ActionKind::Attack))
            .await
            .unwrap();
        assert_eq!(tx.len(), 1);
    }

    #[tokio::test]
    async fn test_create_request_tx_propagates_fetch_error() {
        let builder = RequestBuilder::new(FailingState, ProgramIds::default());
        let err = builder
            .create_request_tx(&intent(ActionKind::Loot))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Api { status: 503, .. }));
    }
}
