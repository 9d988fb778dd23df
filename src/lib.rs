//! nfraid-solana: client library for the NFT raid game on Solana.
//!
//! Builds action transactions (a JSON memo plus optional fee transfers),
//! builds custody ("fusion") transactions that move child tokens in and out
//! of a parent NFT's escrow, and talks to the game-state service that
//! validates and relays them.
//!
//! # Architecture
//!
//! 1. **Core types** (`keypair`, `pubkey`, `transaction`) - Re-exports from the Solana SDK with extension traits
//! 2. **Builders** (`request`, `fusion`) - Turn intents and on-chain state into unsigned transactions
//! 3. **Transports** (`ledger`, `state`) - Solana RPC and the game-state HTTP API, behind traits
//!
//! # Usage from Rust
//!
//! ```rust
//! use nfraid_solana::config::ProgramIds;
//! use nfraid_solana::request::{build_request_tx, ActionIntent, ActionKind};
//! use nfraid_solana::{Pubkey, PubkeyExt};
//!
//! let intent = ActionIntent {
//!     actor: Pubkey::from_base58("FKjSjCqByQRwSzZoMXA7bKnDbJe41YgJTHFFzBeC42bH").unwrap(),
//!     token_address: Pubkey::new_from_array([2u8; 32]),
//!     collection_address: Pubkey::new_from_array([3u8; 32]),
//!     season_id: "s1".to_string(),
//!     target: serde_json::json!("boss"),
//!     action: ActionKind::Loot,
//! };
//!
//! let tx = build_request_tx(&intent, None, &ProgramIds::default()).unwrap();
//! assert_eq!(tx.len(), 1);
//! ```

pub mod config;
mod error;
pub mod fusion;
pub mod keypair;
pub mod ledger;
pub mod pubkey;
pub mod request;
pub mod state;
pub mod transaction;

// Re-export core types at crate root
pub use config::{load_config, ClientConfig, ProgramIds};
pub use error::{Error, Result};
pub use keypair::{Credentials, Keypair, KeypairExt};
pub use ledger::LedgerRpc;
pub use pubkey::{Pubkey, PubkeyExt};
pub use request::{sign_and_serialize, ActionIntent, ActionKind, RequestBuilder};
pub use state::{GameState, GameStateClient, StateSource};
pub use transaction::{Transaction, TransactionExt, UnsignedTransaction};
