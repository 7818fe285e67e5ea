pub mod abi;
pub mod evm;
pub mod tron;

use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::models::{Chain, NodeConfig};
use crate::utils::error::{AppError, InspectorResult};

pub use evm::{EvmHttpClient, EvmNodeClient, EvmReceipt, EvmTransaction};
pub use tron::{TronBlock, TronHttpClient, TronNodeClient, TronTransaction, TronTransactionInfo};

/// Per-chain node endpoints. The lock is only held to copy an entry out,
/// never across a request.
#[derive(Default)]
pub(crate) struct Endpoints {
    nodes: RwLock<HashMap<u64, NodeConfig>>,
}

impl Endpoints {
    pub(crate) async fn insert(&self, chain: &Chain) {
        self.nodes.write().await.insert(chain.id, chain.node.clone());
    }

    pub(crate) async fn get(&self, chain_id: u64) -> InspectorResult<NodeConfig> {
        self.nodes
            .read()
            .await
            .get(&chain_id)
            .cloned()
            .ok_or(AppError::UnknownChain(chain_id))
    }
}
