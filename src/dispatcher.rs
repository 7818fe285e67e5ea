//! Routes scan/validate requests to the inspector of the right chain family.

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::inspectors::FamilyInspector;
use crate::models::{Chain, TransactionScanResult, ValidateResponse};
use crate::utils::error::InspectorResult;

pub struct ChainDispatcher {
    inspectors: Vec<Arc<dyn FamilyInspector>>,
    /// Registered chain ids in registration order, with the index of the
    /// inspector serving each.
    chains: RwLock<Vec<(u64, usize)>>,
}

impl ChainDispatcher {
    pub fn new(inspectors: Vec<Arc<dyn FamilyInspector>>) -> Self {
        ChainDispatcher {
            inspectors,
            chains: RwLock::new(Vec::new()),
        }
    }

    /// Bind `chain` to the inspector of its family. Returns `false` when the
    /// chain was already registered or no inspector serves its family.
    #[instrument(skip(self, chain), fields(chain_id = chain.id, family = ?chain.family))]
    pub async fn add_chain(&self, chain: &Chain) -> InspectorResult<bool> {
        if self.chain_ids().await.contains(&chain.id) {
            debug!("chain already registered");
            return Ok(false);
        }

        let Some(index) = self
            .inspectors
            .iter()
            .position(|inspector| inspector.family() == chain.family)
        else {
            warn!("no inspector for chain family, chain ignored");
            return Ok(false);
        };

        self.inspectors[index].register_chain(chain).await?;

        let mut chains = self.chains.write().await;
        if chains.iter().any(|(id, _)| *id == chain.id) {
            return Ok(false);
        }
        chains.push((chain.id, index));
        info!("chain registered");
        Ok(true)
    }

    pub async fn chain_ids(&self) -> Vec<u64> {
        self.chains.read().await.iter().map(|(id, _)| *id).collect()
    }

    /// Try every registered chain in registration order; the first chain
    /// that recognizes the hash wins.
    #[instrument(skip(self))]
    pub async fn scan(&self, operation_id: u64, hash: &str) -> InspectorResult<Option<TransactionScanResult>> {
        let chains = self.chains.read().await.clone();

        for (chain_id, index) in chains {
            if let Some(result) = self.inspectors[index].scan(operation_id, hash, chain_id).await? {
                return Ok(Some(result));
            }
        }

        debug!("hash not found on any chain");
        Ok(None)
    }

    async fn inspector_for(&self, chain_id: u64) -> Option<usize> {
        self.chains
            .read()
            .await
            .iter()
            .find(|(id, _)| *id == chain_id)
            .map(|(_, index)| *index)
    }

    /// Validate on the chain the result was scanned on.
    #[instrument(skip(self, result), fields(operation_id = result.id, chain_id = result.chain_in_id))]
    pub async fn validate(&self, result: &TransactionScanResult) -> InspectorResult<Option<ValidateResponse>> {
        match self.inspector_for(result.chain_in_id).await {
            Some(index) => self.inspectors[index].validate(result).await,
            None => {
                debug!("chain not registered");
                Ok(None)
            }
        }
    }

    /// Current block of a registered chain; `None` when the chain is unknown.
    pub async fn current_height(&self, chain_id: u64) -> InspectorResult<Option<u64>> {
        match self.inspector_for(chain_id).await {
            Some(index) => self.inspectors[index].current_height(chain_id).await.map(Some),
            None => Ok(None),
        }
    }
}
