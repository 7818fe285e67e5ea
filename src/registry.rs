//! Chain and contract lookups.
//!
//! Chains are read through [`ChainRegistry`], a fill-once cache in front of the
//! chain store: an entry, once loaded or primed, is never replaced for the
//! lifetime of the process. Contracts are not cached; every lookup goes to
//! the store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::models::{Chain, Contract};
use crate::utils::error::{AppError, InspectorResult};

#[async_trait]
pub trait ChainStore: Send + Sync {
    async fn find_one(&self, chain_id: u64) -> InspectorResult<Option<Chain>>;
}

#[async_trait]
pub trait ContractStore: Send + Sync {
    async fn find_one(&self, address: &str, chain_id: u64) -> InspectorResult<Option<Contract>>;
}

/// Look up `address` on `chain_id` and keep it only if it is a token contract.
pub async fn find_token(
    store: &dyn ContractStore,
    address: &str,
    chain_id: u64,
) -> InspectorResult<Option<Contract>> {
    let contract = store.find_one(address, chain_id).await?;
    Ok(contract.filter(Contract::is_token))
}

pub struct ChainRegistry {
    store: Arc<dyn ChainStore>,
    chains: RwLock<HashMap<u64, Arc<Chain>>>,
}

impl ChainRegistry {
    pub fn new(store: Arc<dyn ChainStore>) -> Self {
        ChainRegistry {
            store,
            chains: RwLock::new(HashMap::new()),
        }
    }

    /// Cached chain, loaded from the store on first use.
    pub async fn chain(&self, chain_id: u64) -> InspectorResult<Arc<Chain>> {
        if let Some(chain) = self.chains.read().await.get(&chain_id) {
            return Ok(Arc::clone(chain));
        }

        // Not holding the lock while the store is queried; a concurrent
        // miss for the same id may load twice, the first insert wins.
        let loaded = self
            .store
            .find_one(chain_id)
            .await?
            .ok_or(AppError::UnknownChain(chain_id))?;
        debug!(chain_id, "chain loaded into registry");

        let mut chains = self.chains.write().await;
        let chain = chains.entry(chain_id).or_insert_with(|| Arc::new(loaded));
        Ok(Arc::clone(chain))
    }

    /// Seed the cache with a chain known at bootstrap. Existing entries win.
    pub async fn prime(&self, chain: Chain) {
        let mut chains = self.chains.write().await;
        chains.entry(chain.id).or_insert_with(|| Arc::new(chain));
    }
}
