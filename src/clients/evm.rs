use async_trait::async_trait;
use num_bigint::BigInt;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::Endpoints;
use crate::models::Chain;
use crate::utils::decimal::{parse_hex_quantity, parse_hex_u64};
use crate::utils::error::{AppError, InspectorResult};

/// Transaction as returned by `eth_getTransactionByHash`, numbers decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvmTransaction {
    pub hash: String,
    pub from: String,
    pub to: Option<String>,
    pub value: BigInt,
    pub input: String,
    /// `None` while the transaction is still in the mempool.
    pub block_number: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvmReceipt {
    pub transaction_hash: String,
    pub gas_used: BigInt,
    pub effective_gas_price: BigInt,
    pub status: bool,
    pub block_number: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcTransaction {
    hash: String,
    from: String,
    to: Option<String>,
    value: String,
    input: String,
    block_number: Option<String>,
}

impl TryFrom<RpcTransaction> for EvmTransaction {
    type Error = AppError;

    fn try_from(tx: RpcTransaction) -> Result<Self, Self::Error> {
        Ok(EvmTransaction {
            value: parse_hex_quantity(&tx.value)?,
            block_number: tx.block_number.as_deref().map(parse_hex_u64).transpose()?,
            hash: tx.hash,
            from: tx.from,
            to: tx.to,
            input: tx.input,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcReceipt {
    transaction_hash: String,
    gas_used: String,
    effective_gas_price: Option<String>,
    status: Option<String>,
    block_number: String,
}

impl TryFrom<RpcReceipt> for EvmReceipt {
    type Error = AppError;

    fn try_from(receipt: RpcReceipt) -> Result<Self, Self::Error> {
        let effective_gas_price = receipt.effective_gas_price.as_deref().ok_or_else(|| {
            AppError::ParseError("Receipt is missing effectiveGasPrice".to_string())
        })?;
        // Pre-Byzantium receipts carry `root` instead of `status`; without a
        // success flag the transaction counts as failed.
        let status = match receipt.status.as_deref() {
            Some(status) => parse_hex_u64(status)? == 1,
            None => false,
        };

        Ok(EvmReceipt {
            gas_used: parse_hex_quantity(&receipt.gas_used)?,
            effective_gas_price: parse_hex_quantity(effective_gas_price)?,
            status,
            block_number: parse_hex_u64(&receipt.block_number)?,
            transaction_hash: receipt.transaction_hash,
        })
    }
}

#[async_trait]
pub trait EvmNodeClient: Send + Sync {
    /// Make the chain's node reachable through this client.
    async fn add_chain(&self, chain: &Chain) -> InspectorResult<()>;
    async fn get_transaction(&self, chain_id: u64, hash: &str) -> InspectorResult<Option<EvmTransaction>>;
    async fn get_transaction_receipt(&self, chain_id: u64, hash: &str) -> InspectorResult<Option<EvmReceipt>>;
    async fn get_block_height(&self, chain_id: u64) -> InspectorResult<u64>;
}

/// JSON-RPC client over HTTP, one endpoint per registered chain.
pub struct EvmHttpClient {
    client: Client,
    endpoints: Endpoints,
}

impl EvmHttpClient {
    pub fn new() -> Self {
        EvmHttpClient {
            client: Client::new(),
            endpoints: Endpoints::default(),
        }
    }

    async fn make_request(&self, chain_id: u64, method: &str, params: Value) -> Result<Value, AppError> {
        let node = self.endpoints.get(chain_id).await?;
        debug!(chain_id, method, "evm rpc request");

        let response = self
            .client
            .post(&node.provider)
            .json(&json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": method,
                "params": params
            }))
            .send()
            .await
            .map_err(|e| AppError::NetworkError(e.to_string()))?
            .json::<Value>()
            .await
            .map_err(|e| AppError::JsonParseError(e.to_string()))?;

        if let Some(error) = response.get("error") {
            return Err(AppError::ApiError(error.to_string()));
        }

        Ok(response["result"].clone())
    }
}

impl Default for EvmHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

fn from_result<T, R>(result: Value) -> InspectorResult<Option<T>>
where
    R: serde::de::DeserializeOwned,
    T: TryFrom<R, Error = AppError>,
{
    if result.is_null() {
        return Ok(None);
    }
    let raw: R = serde_json::from_value(result).map_err(|e| AppError::JsonParseError(e.to_string()))?;
    <T as TryFrom<R>>::try_from(raw).map(Some)
}

#[async_trait]
impl EvmNodeClient for EvmHttpClient {
    async fn add_chain(&self, chain: &Chain) -> InspectorResult<()> {
        self.endpoints.insert(chain).await;
        Ok(())
    }

    async fn get_transaction(&self, chain_id: u64, hash: &str) -> InspectorResult<Option<EvmTransaction>> {
        let result = self
            .make_request(chain_id, "eth_getTransactionByHash", json!([hash]))
            .await?;
        from_result::<EvmTransaction, RpcTransaction>(result)
    }

    async fn get_transaction_receipt(&self, chain_id: u64, hash: &str) -> InspectorResult<Option<EvmReceipt>> {
        let result = self
            .make_request(chain_id, "eth_getTransactionReceipt", json!([hash]))
            .await?;
        from_result::<EvmReceipt, RpcReceipt>(result)
    }

    async fn get_block_height(&self, chain_id: u64) -> InspectorResult<u64> {
        let result = self.make_request(chain_id, "eth_blockNumber", json!([])).await?;
        let block_number = result
            .as_str()
            .ok_or_else(|| AppError::ParseError("Failed to parse block number".to_string()))?;
        parse_hex_u64(block_number)
    }
}
