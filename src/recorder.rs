use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::models::{InspectorMeta, TransactionRecord, TransactionScanResult};
use crate::registry::ContractStore;
use crate::repository::TransactionStore;
use crate::utils::error::InspectorResult;

/// Persists scan results, one row per (hash, chain id).
pub struct Recorder {
    transactions: Arc<dyn TransactionStore>,
    contracts: Arc<dyn ContractStore>,
}

impl Recorder {
    pub fn new(transactions: Arc<dyn TransactionStore>, contracts: Arc<dyn ContractStore>) -> Self {
        Recorder {
            transactions,
            contracts,
        }
    }

    /// Insert the result, or update the existing row for its hash and chain
    /// in place.
    pub async fn record(&self, result: &TransactionScanResult) -> InspectorResult<TransactionRecord> {
        let contract_id = match result.contract_address() {
            Some(address) => {
                let contract = self.contracts.find_one(address, result.chain_in_id).await?;
                if contract.is_none() {
                    warn!(address, chain_id = result.chain_in_id, "contract not registered, recorded without contract id");
                }
                contract.map(|contract| contract.id)
            }
            None => None,
        };

        let existing = self
            .transactions
            .find_by_hash(&result.hash_in, result.chain_in_id)
            .await?;

        let record = TransactionRecord {
            id: existing.and_then(|row| row.id),
            hash: result.hash_in.clone(),
            chain_id: result.chain_in_id,
            block_number: result.block_number,
            from: result.from.clone(),
            to: result.parse.to.clone(),
            amount: result.parse.amount.clone(),
            fee: result.network_fee.clone(),
            contract_id,
            meta: InspectorMeta {
                amount_in: result.parse.amount_in.clone(),
                amount_out: result.parse.amount_out.clone(),
                convertation_fee: result.parse.convertation_fee.clone(),
                currency_in: result.parse.currency_in.clone(),
                currency_out: result.parse.currency_out.clone(),
                hash_out: result.hash_out.clone(),
                chain_out_id: result.parse.chain_out_id,
            },
            status: result.status,
            updated_at: Utc::now(),
        };

        let saved = self.transactions.save(record).await?;
        debug!(id = ?saved.id, hash = %saved.hash, status = ?saved.status, "transaction recorded");
        Ok(saved)
    }
}
