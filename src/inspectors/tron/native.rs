use async_trait::async_trait;
use num_bigint::BigInt;
use std::sync::Arc;
use tracing::debug;

use super::present;
use crate::clients::TronTransaction;
use crate::inspectors::{Interpretation, RawTransaction, TransferInterpreter};
use crate::models::{ParseResult, TransactionScanResult, NATIVE_CURRENCY};
use crate::registry::ChainRegistry;
use crate::utils::decimal::to_units;
use crate::utils::error::InspectorResult;
use crate::utils::tron::canonicalize_address;

const TRANSFER_CONTRACT: &str = "TransferContract";

/// TRX transfer through a `TransferContract` operation.
pub struct TronNative {
    registry: Arc<ChainRegistry>,
}

impl TronNative {
    pub fn new(registry: Arc<ChainRegistry>) -> Self {
        TronNative { registry }
    }
}

#[async_trait]
impl TransferInterpreter<TronTransaction> for TronNative {
    fn name(&self) -> &'static str {
        "tron-native"
    }

    async fn parse(&self, tx: &RawTransaction<TronTransaction>) -> InspectorResult<Interpretation> {
        let Some(operation) = tx.data.operation() else {
            return Ok(Interpretation::NotApplicable);
        };
        let value = &operation.parameter.value;
        if operation.contract_type != TRANSFER_CONTRACT
            || present(&value.contract_address).is_some()
            || present(&value.data).is_some()
        {
            return Ok(Interpretation::NotApplicable);
        }
        let Some(to) = present(&value.to_address) else {
            return Ok(Interpretation::NotApplicable);
        };

        let to = match canonicalize_address(to) {
            Ok(to) => to,
            Err(e) => {
                debug!(hash = %tx.data.tx_id, error = %e, "unreadable recipient");
                return Ok(Interpretation::NotApplicable);
            }
        };

        let chain = self.registry.chain(tx.chain_id).await?;
        let amount = to_units(&BigInt::from(value.amount.unwrap_or_default()), chain.decimal);

        Ok(Interpretation::Matched(ParseResult::transfer(
            tx.chain_id,
            to,
            amount,
            NATIVE_CURRENCY.to_string(),
            None,
        )))
    }

    async fn owns(&self, result: &TransactionScanResult) -> InspectorResult<bool> {
        Ok(result.contract_address().is_none())
    }
}
