//! EVM-style chains: receipts settle transactions, a missing receipt is a
//! rejection.

pub mod native;
pub mod token;

use async_trait::async_trait;
use std::sync::Arc;

use super::{
    ChainFamilyOps, Inspector, MissingSettlement, Origin, RawTransaction, Settlement,
    TransferInterpreter,
};
use crate::clients::{EvmNodeClient, EvmTransaction};
use crate::models::{Chain, ChainFamily};
use crate::registry::{ChainRegistry, ContractStore};
use crate::utils::error::InspectorResult;

pub use native::EvmNative;
pub use token::EvmToken;

pub type EvmInspector = Inspector<EvmFamily>;

/// `0x` followed by 32 bytes of hex.
pub fn is_evm_hash(hash: &str) -> bool {
    hash.len() == 66
        && hash.starts_with("0x")
        && hash[2..].chars().all(|c| c.is_ascii_hexdigit())
}

pub struct EvmFamily {
    client: Arc<dyn EvmNodeClient>,
}

impl EvmFamily {
    pub fn new(client: Arc<dyn EvmNodeClient>) -> Self {
        EvmFamily { client }
    }
}

#[async_trait]
impl ChainFamilyOps for EvmFamily {
    type Transaction = EvmTransaction;

    const FAMILY: ChainFamily = ChainFamily::Evm;
    const MISSING_SETTLEMENT: MissingSettlement = MissingSettlement::Reject;

    fn is_hash(hash: &str) -> bool {
        is_evm_hash(hash)
    }

    fn is_execution_failure(_tx: &EvmTransaction) -> bool {
        // The success flag lives on the receipt and is applied in settlement.
        false
    }

    async fn register_chain(&self, chain: &Chain) -> InspectorResult<()> {
        self.client.add_chain(chain).await
    }

    async fn fetch_transaction(&self, chain_id: u64, hash: &str) -> InspectorResult<Option<EvmTransaction>> {
        self.client.get_transaction(chain_id, hash).await
    }

    async fn fetch_settlement(&self, chain_id: u64, hash: &str) -> InspectorResult<Option<Settlement>> {
        let receipt = self.client.get_transaction_receipt(chain_id, hash).await?;
        Ok(receipt.map(|receipt| Settlement {
            fee: &receipt.gas_used * &receipt.effective_gas_price,
            block_number: receipt.block_number,
            succeeded: receipt.status,
        }))
    }

    async fn current_height(&self, chain_id: u64) -> InspectorResult<u64> {
        self.client.get_block_height(chain_id).await
    }

    async fn origin(&self, tx: &RawTransaction<EvmTransaction>) -> InspectorResult<Origin> {
        Ok(Origin {
            from: tx.data.from.to_lowercase(),
            block_number: tx.data.block_number.unwrap_or_default(),
        })
    }
}

/// EVM inspector with the native interpreter tried before the token one.
pub fn evm_inspector(
    client: Arc<dyn EvmNodeClient>,
    registry: Arc<ChainRegistry>,
    contracts: Arc<dyn ContractStore>,
) -> EvmInspector {
    let mut interpreters: Vec<Box<dyn TransferInterpreter<EvmTransaction>>> = Vec::new();
    interpreters.push(Box::new(EvmNative::new(Arc::clone(&registry))));
    interpreters.push(Box::new(EvmToken::new(contracts)));

    Inspector::new(EvmFamily::new(client), registry, interpreters)
}
