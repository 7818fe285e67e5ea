use async_trait::async_trait;
use std::sync::Arc;

use crate::clients::EvmTransaction;
use crate::inspectors::{Interpretation, RawTransaction, TransferInterpreter};
use crate::models::{ParseResult, TransactionScanResult, NATIVE_CURRENCY};
use crate::registry::ChainRegistry;
use crate::utils::decimal::to_units;
use crate::utils::error::InspectorResult;

/// Plain value transfer: no calldata, amount in the chain's base coin.
pub struct EvmNative {
    registry: Arc<ChainRegistry>,
}

impl EvmNative {
    pub fn new(registry: Arc<ChainRegistry>) -> Self {
        EvmNative { registry }
    }
}

#[async_trait]
impl TransferInterpreter<EvmTransaction> for EvmNative {
    fn name(&self) -> &'static str {
        "evm-native"
    }

    async fn parse(&self, tx: &RawTransaction<EvmTransaction>) -> InspectorResult<Interpretation> {
        if tx.data.input != "0x" {
            return Ok(Interpretation::NotApplicable);
        }
        let Some(to) = tx.data.to.as_deref() else {
            return Ok(Interpretation::NotApplicable);
        };

        let chain = self.registry.chain(tx.chain_id).await?;
        let amount = to_units(&tx.data.value, chain.decimal);

        Ok(Interpretation::Matched(ParseResult::transfer(
            tx.chain_id,
            to.to_lowercase(),
            amount,
            NATIVE_CURRENCY.to_string(),
            None,
        )))
    }

    async fn owns(&self, result: &TransactionScanResult) -> InspectorResult<bool> {
        Ok(result.contract_address().is_none())
    }
}
