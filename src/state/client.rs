//! HTTP client for the game-state service.

use async_trait::async_trait;
use solana_pubkey::Pubkey;
use tracing::debug;
use url::Url;

use super::dynamo::unmarshall;
use super::types::{
    BufferJson, CooldownRequest, CooldownsAndBuffs, ExecutionRequest, ExecutionResponse,
    GameState, StateEnvelope,
};
use crate::config::{ClientConfig, ConfigError};
use crate::error::{Error, Result};

/// Anything that can produce the season state a request is built against.
#[async_trait]
pub trait StateSource: Send + Sync {
    /// State record for `id`, or `None` if the service has no item for it.
    async fn fetch_state_record(&self, id: &str) -> Result<Option<GameState>>;
}

/// Client for the game-state API rooted at a configurable base URL.
#[derive(Debug, Clone)]
pub struct GameStateClient {
    base_url: Url,
    http: reqwest::Client,
}

impl GameStateClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(&config.api_base_url)
    }

    /// Use a preconfigured `reqwest::Client` (proxies, headers, timeouts).
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/')).map_err(|e| {
            ConfigError::Validation(vec![format!("api_base_url '{base_url}': {e}")])
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::Validation(vec![format!(
                "api_base_url '{base_url}' cannot be a base URL"
            )])
            .into());
        }
        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/seg1/seg2/...`, each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// `GET /state/{id}` decoded into a [`GameState`].
    pub async fn fetch_game_state(&self, id: &str) -> Result<GameState> {
        self.fetch_state_record(id)
            .await?
            .ok_or_else(|| Error::MissingStateItem(id.to_string()))
    }

    /// `POST /state/cooldown` for one token.
    pub async fn fetch_cooldowns_and_buffs(
        &self,
        id: &str,
        token_address: &Pubkey,
    ) -> Result<CooldownsAndBuffs> {
        let url = self.endpoint(&["state", "cooldown"]);
        debug!(%url, season = id, token = %token_address, "Fetching cooldowns and buffs");

        let body = CooldownRequest {
            id,
            nft_address: token_address.to_string(),
        };
        let response = self.http.post(url).json(&body).send().await?;
        Ok(check_status(response).await?.json().await?)
    }

    /// `POST /{route}` with a serialized transaction.
    ///
    /// The response is returned as parsed; the caller decides what its
    /// `status` means.
    pub async fn send_tx_for_execution(
        &self,
        serialized_tx: &[u8],
        route: &str,
    ) -> Result<ExecutionResponse> {
        let segments: Vec<&str> = route.split('/').filter(|s| !s.is_empty()).collect();
        let url = self.endpoint(&segments);
        debug!(%url, bytes = serialized_tx.len(), "Submitting transaction for execution");

        let body = ExecutionRequest {
            serialized_tx: BufferJson::from(serialized_tx),
        };
        let response = self.http.post(url).json(&body).send().await?;
        let parsed: ExecutionResponse = check_status(response).await?.json().await?;
        debug!(status = ?parsed.status, signature = ?parsed.signature, "Execution response");
        Ok(parsed)
    }
}

#[async_trait]
impl StateSource for GameStateClient {
    async fn fetch_state_record(&self, id: &str) -> Result<Option<GameState>> {
        let url = self.endpoint(&["state", id]);
        debug!(%url, "Fetching game state");

        let response = self.http.get(url).send().await?;
        let envelope: StateEnvelope = check_status(response).await?.json().await?;
        decode_state_item(envelope.item)
    }
}

fn decode_state_item(item: Option<serde_json::Value>) -> Result<Option<GameState>> {
    match item {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(item) => {
            let plain = unmarshall(&item)?;
            serde_json::from_value(plain)
                .map(Some)
                .map_err(|e| Error::decode("game state", e))
        }
    }
}

/// Non-2xx responses become [`Error::Api`] carrying the body as sent.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|e| format!("<unreadable body: {e}>"));
    Err(Error::Api {
        status: status.as_u16(),
        body,
    })
}
