pub mod memory;

use async_trait::async_trait;

use crate::models::TransactionRecord;
use crate::utils::error::InspectorResult;

pub use memory::{MemoryChainStore, MemoryContractStore, MemoryTransactionStore};

/// Persistence for inspected transactions, unique on (hash, chain id).
#[async_trait]
pub trait TransactionStore: Send + Sync {
    async fn find_by_hash(&self, hash: &str, chain_id: u64) -> InspectorResult<Option<TransactionRecord>>;

    /// Insert when `record.id` is `None`, otherwise replace the row with that id.
    /// Returns the stored row with its id assigned.
    async fn save(&self, record: TransactionRecord) -> InspectorResult<TransactionRecord>;
}
