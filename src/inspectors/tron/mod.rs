//! Tron-style chains: execution info settles transactions, and a missing
//! record is tolerated for a propagation window before rejection.

pub mod native;
pub mod token;

use async_trait::async_trait;
use num_bigint::BigInt;
use std::sync::Arc;

use super::{
    ChainFamilyOps, Inspector, MissingSettlement, Origin, RawTransaction, Settlement,
    TransferInterpreter,
};
use crate::clients::{TronNodeClient, TronTransaction};
use crate::models::{Chain, ChainFamily};
use crate::registry::{ChainRegistry, ContractStore};
use crate::utils::error::{AppError, InspectorResult};
use crate::utils::tron::{canonicalize_address, is_tron_txhash};

pub use native::TronNative;
pub use token::TronToken;

pub type TronInspector = Inspector<TronFamily>;

/// Blocks a transaction may stay without execution info before it counts
/// as dropped.
pub const REJECTION_WINDOW: u64 = 50;

pub struct TronFamily {
    client: Arc<dyn TronNodeClient>,
}

impl TronFamily {
    pub fn new(client: Arc<dyn TronNodeClient>) -> Self {
        TronFamily { client }
    }
}

#[async_trait]
impl ChainFamilyOps for TronFamily {
    type Transaction = TronTransaction;

    const FAMILY: ChainFamily = ChainFamily::Tron;
    const MISSING_SETTLEMENT: MissingSettlement = MissingSettlement::TolerateBlocks(REJECTION_WINDOW);

    fn is_hash(hash: &str) -> bool {
        is_tron_txhash(hash)
    }

    fn is_execution_failure(tx: &TronTransaction) -> bool {
        tx.ret.iter().any(|ret| ret.is_failure())
    }

    async fn register_chain(&self, chain: &Chain) -> InspectorResult<()> {
        self.client.add_chain(chain).await
    }

    async fn fetch_transaction(&self, chain_id: u64, hash: &str) -> InspectorResult<Option<TronTransaction>> {
        self.client.get_transaction(chain_id, hash).await
    }

    async fn fetch_settlement(&self, chain_id: u64, hash: &str) -> InspectorResult<Option<Settlement>> {
        let info = self.client.get_transaction_info(chain_id, hash).await?;
        Ok(info.map(|info| Settlement {
            fee: BigInt::from(info.fee.unwrap_or_default()),
            block_number: info.block_number,
            succeeded: true,
        }))
    }

    async fn current_height(&self, chain_id: u64) -> InspectorResult<u64> {
        Ok(self.client.get_current_block(chain_id).await?.number())
    }

    /// Tron transactions carry no block number, so the scan is anchored at
    /// the chain's current block.
    async fn origin(&self, tx: &RawTransaction<TronTransaction>) -> InspectorResult<Origin> {
        let owner = tx
            .data
            .operation()
            .and_then(|operation| operation.parameter.value.owner_address.as_deref())
            .ok_or_else(|| {
                AppError::ParseError(format!("Transaction {} has no owner address", tx.data.tx_id))
            })?;

        Ok(Origin {
            from: canonicalize_address(owner)?,
            block_number: self.current_height(tx.chain_id).await?,
        })
    }
}

/// Tron inspector with the native interpreter tried before the token one.
pub fn tron_inspector(
    client: Arc<dyn TronNodeClient>,
    registry: Arc<ChainRegistry>,
    contracts: Arc<dyn ContractStore>,
) -> TronInspector {
    let mut interpreters: Vec<Box<dyn TransferInterpreter<TronTransaction>>> = Vec::new();
    interpreters.push(Box::new(TronNative::new(Arc::clone(&registry))));
    interpreters.push(Box::new(TronToken::new(contracts)));

    Inspector::new(TronFamily::new(client), registry, interpreters)
}

/// Unset and empty optional fields are treated alike by the node encoding.
pub(crate) fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}
