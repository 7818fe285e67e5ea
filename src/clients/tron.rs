use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use super::Endpoints;
use crate::models::Chain;
use crate::utils::error::{AppError, InspectorResult};

/// Header carrying the TronGrid API key.
const API_KEY_HEADER: &str = "TRON-PRO-API-KEY";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TronTransaction {
    #[serde(rename = "txID")]
    pub tx_id: String,
    pub raw_data: TronRawData,
    #[serde(default)]
    pub ret: Vec<TronRet>,
}

impl TronTransaction {
    /// The embedded contract operation, when the transaction carries exactly
    /// one. Transfers never share a transaction with other operations.
    pub fn operation(&self) -> Option<&TronContract> {
        match self.raw_data.contract.as_slice() {
            [operation] => Some(operation),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TronRawData {
    #[serde(default)]
    pub contract: Vec<TronContract>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TronContract {
    #[serde(rename = "type")]
    pub contract_type: String,
    pub parameter: TronParameter,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TronParameter {
    pub value: TronContractValue,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TronContractValue {
    #[serde(default)]
    pub owner_address: Option<String>,
    #[serde(default)]
    pub to_address: Option<String>,
    #[serde(default)]
    pub amount: Option<u64>,
    #[serde(default)]
    pub contract_address: Option<String>,
    #[serde(default)]
    pub data: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TronRet {
    #[serde(rename = "contractRet", default)]
    pub contract_ret: Option<String>,
}

impl TronRet {
    /// `SUCCESS` and the unset `DEFAULT` code are the only non-failures.
    pub fn is_failure(&self) -> bool {
        matches!(self.contract_ret.as_deref(), Some(code) if code != "SUCCESS" && code != "DEFAULT")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TronTransactionInfo {
    pub id: String,
    #[serde(default)]
    pub fee: Option<u64>,
    #[serde(rename = "blockNumber")]
    pub block_number: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TronBlock {
    pub block_header: TronBlockHeader,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TronBlockHeader {
    pub raw_data: TronBlockRawData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TronBlockRawData {
    pub number: u64,
}

impl TronBlock {
    pub fn number(&self) -> u64 {
        self.block_header.raw_data.number
    }
}

#[async_trait]
pub trait TronNodeClient: Send + Sync {
    /// Make the chain's node reachable through this client.
    async fn add_chain(&self, chain: &Chain) -> InspectorResult<()>;
    async fn get_transaction(&self, chain_id: u64, hash: &str) -> InspectorResult<Option<TronTransaction>>;
    async fn get_transaction_info(&self, chain_id: u64, hash: &str) -> InspectorResult<Option<TronTransactionInfo>>;
    async fn get_current_block(&self, chain_id: u64) -> InspectorResult<TronBlock>;
}

/// Full-node HTTP API client, one endpoint per registered chain.
pub struct TronHttpClient {
    client: Client,
    endpoints: Endpoints,
}

impl TronHttpClient {
    pub fn new() -> Self {
        TronHttpClient {
            client: Client::new(),
            endpoints: Endpoints::default(),
        }
    }

    async fn make_http_request(&self, chain_id: u64, method: &str, params: Value) -> Result<Value, AppError> {
        let node = self.endpoints.get(chain_id).await?;
        let url = format!("{}/{}", node.provider.trim_end_matches('/'), method);
        debug!(chain_id, method, "tron http request");

        let mut request = self.client.post(&url).json(&params);
        if let Some(api_key) = &node.api_key {
            request = request.header(API_KEY_HEADER, api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            return Err(AppError::ApiError(format!(
                "HTTP error: {}, body: {}",
                status, body
            )));
        }

        serde_json::from_str(&body).map_err(|e| AppError::JsonParseError(e.to_string()))
    }
}

impl Default for TronHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

/// The node answers unknown ids with `{}`.
fn from_lookup<T: DeserializeOwned>(value: Value) -> InspectorResult<Option<T>> {
    match &value {
        Value::Null => return Ok(None),
        Value::Object(fields) if fields.is_empty() => return Ok(None),
        _ => {}
    }
    serde_json::from_value(value)
        .map(Some)
        .map_err(|e| AppError::JsonParseError(e.to_string()))
}

#[async_trait]
impl TronNodeClient for TronHttpClient {
    async fn add_chain(&self, chain: &Chain) -> InspectorResult<()> {
        self.endpoints.insert(chain).await;
        Ok(())
    }

    async fn get_transaction(&self, chain_id: u64, hash: &str) -> InspectorResult<Option<TronTransaction>> {
        let result = self
            .make_http_request(chain_id, "wallet/gettransactionbyid", json!({ "value": hash }))
            .await?;
        from_lookup(result)
    }

    async fn get_transaction_info(&self, chain_id: u64, hash: &str) -> InspectorResult<Option<TronTransactionInfo>> {
        let result = self
            .make_http_request(chain_id, "wallet/gettransactioninfobyid", json!({ "value": hash }))
            .await?;
        from_lookup(result)
    }

    async fn get_current_block(&self, chain_id: u64) -> InspectorResult<TronBlock> {
        let result = self
            .make_http_request(chain_id, "wallet/getnowblock", json!({}))
            .await?;
        serde_json::from_value(result).map_err(|e| AppError::JsonParseError(e.to_string()))
    }
}
