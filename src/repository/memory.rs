use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::models::{Chain, Contract, TransactionRecord};
use crate::registry::{ChainStore, ContractStore};
use crate::repository::TransactionStore;
use crate::utils::error::{AppError, InspectorResult};

/// In-memory chain store, filled from configuration.
#[derive(Clone, Default)]
pub struct MemoryChainStore {
    chains: Arc<RwLock<HashMap<u64, Chain>>>,
}

impl MemoryChainStore {
    pub fn from_chains(chains: impl IntoIterator<Item = Chain>) -> Self {
        let chains = chains.into_iter().map(|chain| (chain.id, chain)).collect();
        Self {
            chains: Arc::new(RwLock::new(chains)),
        }
    }
}

#[async_trait]
impl ChainStore for MemoryChainStore {
    async fn find_one(&self, chain_id: u64) -> InspectorResult<Option<Chain>> {
        Ok(self.chains.read().await.get(&chain_id).cloned())
    }
}

/// In-memory contract store keyed by (normalized address, chain id).
#[derive(Clone, Default)]
pub struct MemoryContractStore {
    contracts: Arc<RwLock<HashMap<(String, u64), Contract>>>,
}

impl MemoryContractStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_contracts(contracts: impl IntoIterator<Item = Contract>) -> Self {
        let contracts = contracts
            .into_iter()
            .map(|contract| ((contract.address.clone(), contract.chain_id), contract))
            .collect();
        Self {
            contracts: Arc::new(RwLock::new(contracts)),
        }
    }

    pub async fn insert(&self, contract: Contract) {
        self.contracts
            .write()
            .await
            .insert((contract.address.clone(), contract.chain_id), contract);
    }
}

#[async_trait]
impl ContractStore for MemoryContractStore {
    async fn find_one(&self, address: &str, chain_id: u64) -> InspectorResult<Option<Contract>> {
        let contracts = self.contracts.read().await;
        Ok(contracts.get(&(address.to_string(), chain_id)).cloned())
    }
}

/// In-memory transaction table. Rows are keyed by (hash, chain id) so that a
/// save for an existing pair keeps the row id even when two writers race.
#[derive(Clone)]
pub struct MemoryTransactionStore {
    rows: Arc<RwLock<HashMap<(String, u64), TransactionRecord>>>,
    next_id: Arc<AtomicU64>,
}

impl Default for MemoryTransactionStore {
    fn default() -> Self {
        Self {
            rows: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }
}

impl MemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl TransactionStore for MemoryTransactionStore {
    async fn find_by_hash(&self, hash: &str, chain_id: u64) -> InspectorResult<Option<TransactionRecord>> {
        let rows = self.rows.read().await;
        Ok(rows.get(&(hash.to_string(), chain_id)).cloned())
    }

    async fn save(&self, mut record: TransactionRecord) -> InspectorResult<TransactionRecord> {
        let key = (record.hash.clone(), record.chain_id);
        let mut rows = self.rows.write().await;

        let existing_id = rows.get(&key).and_then(|row| row.id);
        match (record.id, existing_id) {
            (Some(id), Some(existing)) if id != existing => {
                return Err(AppError::StorageError(format!(
                    "Transaction {} on chain {} already stored with id {}",
                    record.hash, record.chain_id, existing
                )));
            }
            (None, Some(existing)) => record.id = Some(existing),
            (None, None) => record.id = Some(self.next_id.fetch_add(1, Ordering::SeqCst)),
            _ => {}
        }

        debug!(hash = %record.hash, chain_id = record.chain_id, id = ?record.id, "transaction saved");
        rows.insert(key, record.clone());
        Ok(record)
    }
}
