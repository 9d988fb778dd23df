//! Action request building.
//!
//! Every write path follows the same three steps:
//!
//! ```text
//! ActionIntent + GameState ──build──▶ UnsignedTransaction
//!                                       │ sign_and_serialize (wallet or Credentials)
//!                                       ▼
//!                              wire bytes ──GameStateClient::send_tx_for_execution──▶ relay
//! ```
//!
//! No step retries. A failed submission means building, signing and
//! submitting again.

mod build;
mod sign;
mod types;

pub use build::{
    build_request_tx, create_memo_instruction, create_transfer_instruction, sol_to_lamports,
    RequestBuilder, LAMPORTS_PER_SOL,
};
pub use sign::{sign_and_serialize, sign_transaction};
pub use types::{ActionIntent, ActionKind, MemoContent};
