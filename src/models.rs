//! Domain types shared by the inspectors, the dispatcher and the
//! recorder/notifier collaborators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Currency identifier used for a chain's base coin in `currencyIn`/`currencyOut`.
pub const NATIVE_CURRENCY: &str = "0x0000000000000000000000000000000000000000";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChainFamily {
    Evm,
    Tron,
}

/// Node access details. Opaque to the inspectors; only the node clients read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    pub provider: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chain {
    pub id: u64,
    pub family: ChainFamily,
    pub decimal: u32,
    pub confirmations_min: u64,
    pub node: NodeConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContractKind {
    Token,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub id: u64,
    pub address: String,
    pub chain_id: u64,
    pub kind: ContractKind,
    pub decimal: u32,
}

impl Contract {
    pub fn is_token(&self) -> bool {
        self.kind == ContractKind::Token
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionStatus {
    Pending,
    Finished,
    Rejected,
}

/// Normalized output of a transfer interpreter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    pub amount: String,
    pub amount_in: String,
    pub amount_out: String,
    pub convertation_fee: String,
    pub to: String,
    pub currency_in: String,
    pub currency_out: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,
    pub chain_out_id: u64,
}

impl ParseResult {
    /// Same-chain transfer of `amount` with no convertation.
    pub fn transfer(
        chain_id: u64,
        to: String,
        amount: String,
        currency: String,
        contract_address: Option<String>,
    ) -> Self {
        ParseResult {
            amount_in: amount.clone(),
            amount_out: amount.clone(),
            amount,
            convertation_fee: "0".to_string(),
            to,
            currency_in: currency.clone(),
            currency_out: currency,
            contract_address,
            chain_out_id: chain_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionScanResult {
    pub id: u64,
    pub hash_in: String,
    pub hash_out: String,
    pub from: String,
    pub block_number: u64,
    pub chain_in_id: u64,
    pub status: TransactionStatus,
    pub network_fee: String,
    #[serde(flatten)]
    pub parse: ParseResult,
}

impl TransactionScanResult {
    /// Token contract of the transfer; an empty address counts as none.
    pub fn contract_address(&self) -> Option<&str> {
        self.parse
            .contract_address
            .as_deref()
            .filter(|address| !address.is_empty())
    }

    /// Overwrite the settlement fields with a validation outcome.
    pub fn apply(&mut self, validation: &ValidateResponse) {
        self.hash_out = validation.hash_out.clone();
        self.parse.amount_out = validation.amount_out.clone();
        self.block_number = validation.block_number;
        self.network_fee = validation.network_fee.clone();
        self.status = validation.status;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    pub status: TransactionStatus,
    pub network_fee: String,
    pub block_number: u64,
    pub hash_out: String,
    pub amount_out: String,
}

/// Minimal result for operations that never produced parse data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanOutcome {
    pub id: u64,
    pub hash_in: String,
    pub hash_out: String,
    pub status: TransactionStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NotifyData {
    Full(TransactionScanResult),
    Minimal(ScanOutcome),
}

impl NotifyData {
    pub fn status(&self) -> TransactionStatus {
        match self {
            NotifyData::Full(result) => result.status,
            NotifyData::Minimal(outcome) => outcome.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectorMeta {
    pub amount_in: String,
    pub amount_out: String,
    pub convertation_fee: String,
    pub currency_in: String,
    pub currency_out: String,
    pub hash_out: String,
    pub chain_out_id: u64,
}

/// Persisted row, unique on (`hash`, `chain_id`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: Option<u64>,
    pub hash: String,
    pub chain_id: u64,
    pub block_number: u64,
    pub from: String,
    pub to: String,
    pub amount: String,
    pub fee: String,
    pub contract_id: Option<u64>,
    pub meta: InspectorMeta,
    pub status: TransactionStatus,
    pub updated_at: DateTime<Utc>,
}
