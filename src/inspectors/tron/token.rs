use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::present;
use crate::clients::abi::{decode_tron_parameters, transfer_params, AbiValue, TRANSFER_SELECTOR};
use crate::clients::TronTransaction;
use crate::inspectors::{Interpretation, RawTransaction, TransferInterpreter};
use crate::models::{ParseResult, TransactionScanResult};
use crate::registry::{find_token, ContractStore};
use crate::utils::decimal::to_units;
use crate::utils::error::InspectorResult;
use crate::utils::tron::canonicalize_address;

const TRIGGER_SMART_CONTRACT: &str = "TriggerSmartContract";

/// TRC-20 `transfer(address,uint256)` through a `TriggerSmartContract` call.
pub struct TronToken {
    contracts: Arc<dyn ContractStore>,
}

impl TronToken {
    pub fn new(contracts: Arc<dyn ContractStore>) -> Self {
        TronToken { contracts }
    }
}

#[async_trait]
impl TransferInterpreter<TronTransaction> for TronToken {
    fn name(&self) -> &'static str {
        "tron-token"
    }

    async fn parse(&self, tx: &RawTransaction<TronTransaction>) -> InspectorResult<Interpretation> {
        let Some(operation) = tx.data.operation() else {
            return Ok(Interpretation::NotApplicable);
        };
        let value = &operation.parameter.value;
        if operation.contract_type != TRIGGER_SMART_CONTRACT {
            return Ok(Interpretation::NotApplicable);
        }
        let (Some(target), Some(data)) = (present(&value.contract_address), present(&value.data)) else {
            return Ok(Interpretation::NotApplicable);
        };

        let is_transfer = data
            .get(..8)
            .is_some_and(|selector| selector.eq_ignore_ascii_case(TRANSFER_SELECTOR));
        if !is_transfer {
            return Ok(Interpretation::NotApplicable);
        }

        let Ok(contract_address) = canonicalize_address(target) else {
            return Ok(Interpretation::NotApplicable);
        };
        let Some(contract) = find_token(self.contracts.as_ref(), &contract_address, tx.chain_id).await? else {
            return Ok(Interpretation::NotApplicable);
        };

        let values = match decode_tron_parameters(&transfer_params(), &data[8..], true) {
            Ok(values) => values,
            Err(e) => {
                debug!(chain_id = tx.chain_id, hash = %tx.data.tx_id, error = %e, "transfer calldata not decodable");
                return Ok(Interpretation::NotApplicable);
            }
        };
        let [AbiValue::Address(recipient), AbiValue::Uint(amount)] = values.as_slice() else {
            return Ok(Interpretation::NotApplicable);
        };
        let Ok(recipient) = canonicalize_address(recipient) else {
            return Ok(Interpretation::NotApplicable);
        };

        let amount = to_units(amount, contract.decimal);
        Ok(Interpretation::Matched(ParseResult::transfer(
            tx.chain_id,
            recipient,
            amount,
            contract.address.clone(),
            Some(contract_address),
        )))
    }

    async fn owns(&self, result: &TransactionScanResult) -> InspectorResult<bool> {
        let Some(address) = result.contract_address() else {
            return Ok(false);
        };
        let token = find_token(self.contracts.as_ref(), address, result.chain_in_id).await?;
        Ok(token.is_some())
    }
}
