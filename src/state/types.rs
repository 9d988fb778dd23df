//! Wire types for the game-state API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Season state as stored by the game service.
///
/// Fields are kept as raw JSON so a record with unexpected shapes still
/// decodes; each field is interpreted only where it is used. Everything
/// else the service adds is kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub name: Option<Value>,
    /// Fee schedule, charged on `attack` actions. See [`GameState::fees`].
    #[serde(default)]
    pub fees: Option<Value>,
    /// Authority the season's custody accounts are derived with.
    #[serde(default)]
    pub trifle_authority: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GameState {
    /// Parse the fee schedule. A missing or null schedule is empty.
    pub fn fees(&self) -> Result<Vec<FeeEntry>> {
        match &self.fees {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(fees) => serde_json::from_value(fees.clone())
                .map_err(|e| Error::decode("fee schedule", e)),
        }
    }
}

/// One entry of the fee schedule.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FeeEntry {
    /// Recipient (base58).
    pub address: String,
    /// Amount in SOL.
    pub sol: f64,
}

/// Response of `POST /state/cooldown`. Passed through as the service
/// sent it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CooldownsAndBuffs {
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(default)]
    pub cooldowns: Value,
    #[serde(default)]
    pub buffs: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response of `POST /{route}`. Passed through as the service sent it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ExecutionResponse {
    #[serde(default, alias = "statusCode")]
    pub status: Option<Value>,
    /// Transaction signature once relayed.
    #[serde(default)]
    pub signature: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ExecutionResponse {
    /// `status` is `200`, `"200"` or `"success"`.
    pub fn is_success(&self) -> bool {
        match &self.status {
            Some(Value::Number(n)) => n.as_u64() == Some(200),
            Some(Value::String(s)) => s == "200" || s.eq_ignore_ascii_case("success"),
            _ => false,
        }
    }

    /// Signature, when the service returned it as a string.
    pub fn signature_str(&self) -> Option<&str> {
        self.signature.as_ref().and_then(Value::as_str)
    }
}

/// Envelope of `GET /state/{id}`.
#[derive(Debug, Deserialize)]
pub(crate) struct StateEnvelope {
    #[serde(rename = "Item", default)]
    pub item: Option<Value>,
}

/// Body of `POST /state/cooldown`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CooldownRequest<'a> {
    pub id: &'a str,
    pub nft_address: String,
}

/// Body of `POST /{route}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExecutionRequest<'a> {
    pub serialized_tx: BufferJson<'a>,
}

/// Node.js `Buffer.toJSON()` layout, which the relay rebuilds the
/// transaction from.
#[derive(Debug, Serialize)]
pub(crate) struct BufferJson<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub data: &'a [u8],
}

impl<'a> From<&'a [u8]> for BufferJson<'a> {
    fn from(data: &'a [u8]) -> Self {
        Self {
            kind: "Buffer",
            data,
        }
    }
}
