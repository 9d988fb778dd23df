//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use solana_pubkey::Pubkey;

/// Default Solana RPC endpoint (devnet, where the game program is deployed).
pub const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";

/// Environment variable holding the backend signing key (base58).
pub const DEFAULT_SIGNER_ENV_VAR: &str = "NFRAID_KEY";

/// Memo program (v2).
pub const MEMO_PROGRAM_ID: Pubkey =
    Pubkey::from_str_const("MemoSq4gqABAXKb96qnH8TysNcWxMyWCqXgDLGmfcHr");
/// Co-signing recipient that action memos are addressed to.
pub const ACTION_RECIPIENT: Pubkey =
    Pubkey::from_str_const("227e3WpzvA7yjyFdE6uGbVSfQKY7uZohGcPJXssNrDuy");
/// Metaplex Trifle (fusion) program.
pub const FUSION_PROGRAM_ID: Pubkey =
    Pubkey::from_str_const("trifMWutwBxkSuatmpPVnEe7NoE3BJKgjVi8sSyoXWX");
/// Metaplex Token Metadata program.
pub const TOKEN_METADATA_PROGRAM_ID: Pubkey =
    Pubkey::from_str_const("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");
/// SPL Token program.
pub const TOKEN_PROGRAM_ID: Pubkey =
    Pubkey::from_str_const("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA");
/// Associated Token Account program.
pub const ATA_PROGRAM_ID: Pubkey =
    Pubkey::from_str_const("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");
pub const SYSTEM_PROGRAM_ID: Pubkey = Pubkey::from_str_const("11111111111111111111111111111111");
pub const SYSVAR_INSTRUCTIONS_ID: Pubkey =
    Pubkey::from_str_const("Sysvar1nstructions1111111111111111111111111");

/// Root configuration for the game client.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Base URL of the game-state API, without trailing slash.
    pub api_base_url: String,

    /// Solana JSON-RPC endpoint.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    /// Environment variable the backend signing key is read from.
    #[serde(default = "default_signer_env_var")]
    pub signer_env_var: String,

    #[serde(default)]
    pub programs: ProgramIds,
}

fn default_rpc_url() -> String {
    DEFAULT_RPC_URL.to_string()
}

fn default_signer_env_var() -> String {
    DEFAULT_SIGNER_ENV_VAR.to_string()
}

impl ClientConfig {
    /// Config with default RPC endpoint and program ids.
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            rpc_url: default_rpc_url(),
            signer_env_var: default_signer_env_var(),
            programs: ProgramIds::default(),
        }
    }

    pub fn with_rpc_url(mut self, rpc_url: impl Into<String>) -> Self {
        self.rpc_url = rpc_url.into();
        self
    }
}

/// Well-known program and recipient addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProgramIds {
    #[serde(with = "crate::pubkey::base58")]
    pub memo: Pubkey,

    #[serde(with = "crate::pubkey::base58")]
    pub action_recipient: Pubkey,

    #[serde(with = "crate::pubkey::base58")]
    pub fusion: Pubkey,

    #[serde(with = "crate::pubkey::base58")]
    pub token_metadata: Pubkey,

    #[serde(with = "crate::pubkey::base58")]
    pub token: Pubkey,

    #[serde(with = "crate::pubkey::base58")]
    pub associated_token: Pubkey,

    #[serde(with = "crate::pubkey::base58")]
    pub system: Pubkey,

    #[serde(with = "crate::pubkey::base58")]
    pub sysvar_instructions: Pubkey,
}

impl Default for ProgramIds {
    fn default() -> Self {
        Self {
            memo: MEMO_PROGRAM_ID,
            action_recipient: ACTION_RECIPIENT,
            fusion: FUSION_PROGRAM_ID,
            token_metadata: TOKEN_METADATA_PROGRAM_ID,
            token: TOKEN_PROGRAM_ID,
            associated_token: ATA_PROGRAM_ID,
            system: SYSTEM_PROGRAM_ID,
            sysvar_instructions: SYSVAR_INSTRUCTIONS_ID,
        }
    }
}
