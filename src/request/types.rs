//! Types for action requests.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use solana_pubkey::Pubkey;

/// Action discriminant. Only `attack` changes how the transaction is built;
/// any other name the service accepts is carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Attack,
    Loot,
    Boss,
    Other(String),
}

impl ActionKind {
    pub fn as_str(&self) -> &str {
        match self {
            ActionKind::Attack => "attack",
            ActionKind::Loot => "loot",
            ActionKind::Boss => "boss",
            ActionKind::Other(name) => name,
        }
    }

    /// Whether the season's fee schedule applies.
    pub fn charges_fees(&self) -> bool {
        matches!(self, ActionKind::Attack)
    }
}

impl FromStr for ActionKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "attack" => ActionKind::Attack,
            "loot" => ActionKind::Loot,
            "boss" => ActionKind::Boss,
            other => ActionKind::Other(other.to_string()),
        })
    }
}

impl From<&str> for ActionKind {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(kind) => kind,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ActionKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ActionKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ActionKind::from(s.as_str()))
    }
}

/// What a player wants to do, and with which token.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionIntent {
    /// Wallet submitting the action; signs the memo and pays fees.
    pub actor: Pubkey,
    /// NFT performing the action.
    pub token_address: Pubkey,
    pub collection_address: Pubkey,
    pub season_id: String,
    /// Action target as understood by the game service.
    pub target: Value,
    pub action: ActionKind,
}

/// JSON payload written into the memo instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoContent {
    pub nft_address: String,
    pub collection_address: String,
    pub season_id: String,
    pub target: Value,
    pub action: ActionKind,
}

impl From<&ActionIntent> for MemoContent {
    fn from(intent: &ActionIntent) -> Self {
        Self {
            nft_address: intent.token_address.to_string(),
            collection_address: intent.collection_address.to_string(),
            season_id: intent.season_id.clone(),
            target: intent.target.clone(),
            action: intent.action.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_kind_names() {
        assert_eq!(ActionKind::from("attack"), ActionKind::Attack);
        assert_eq!(ActionKind::from("loot"), ActionKind::Loot);
        assert_eq!(
            ActionKind::from("heal"),
            ActionKind::Other("heal".to_string())
        );
        assert_eq!(ActionKind::Other("heal".into()).to_string(), "heal");
        assert!(ActionKind::Attack.charges_fees());
        assert!(!ActionKind::Boss.charges_fees());
        assert!(!ActionKind::Other("Attack".into()).charges_fees());
    }

    #[test]
    fn test_memo_content_field_order() {
        let intent = ActionIntent {
            actor: Pubkey::new_from_array([1u8; 32]),
            token_address: Pubkey::new_from_array([2u8; 32]),
            collection_address: Pubkey::new_from_array([3u8; 32]),
            season_id: "s1".to_string(),
            target: json!("boss"),
            action: ActionKind::Attack,
        };
        let memo = serde_json::to_string(&MemoContent::from(&intent)).unwrap();
        let expected = format!(
            r#"{{"nftAddress":"{}","collectionAddress":"{}","seasonId":"s1","target":"boss","action":"attack"}}"#,
            intent.token_address, intent.collection_address
        );
        assert_eq!(memo, expected);

        let parsed: MemoContent = serde_json::from_str(&memo).unwrap();
        assert_eq!(parsed.action, ActionKind::Attack);
    }
}
