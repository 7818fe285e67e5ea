use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::clients::abi::{decode_evm_parameters, transfer_params, AbiValue, TRANSFER_SELECTOR};
use crate::clients::EvmTransaction;
use crate::inspectors::{Interpretation, RawTransaction, TransferInterpreter};
use crate::models::{ParseResult, TransactionScanResult};
use crate::registry::{find_token, ContractStore};
use crate::utils::decimal::to_units;
use crate::utils::error::InspectorResult;

/// ERC-20 `transfer(address,uint256)` sent straight to a registered token.
pub struct EvmToken {
    contracts: Arc<dyn ContractStore>,
}

impl EvmToken {
    pub fn new(contracts: Arc<dyn ContractStore>) -> Self {
        EvmToken { contracts }
    }
}

#[async_trait]
impl TransferInterpreter<EvmTransaction> for EvmToken {
    fn name(&self) -> &'static str {
        "evm-token"
    }

    async fn parse(&self, tx: &RawTransaction<EvmTransaction>) -> InspectorResult<Interpretation> {
        let payload = tx.data.input.trim_start_matches("0x");
        let is_transfer = payload
            .get(..8)
            .is_some_and(|selector| selector.eq_ignore_ascii_case(TRANSFER_SELECTOR));
        if !is_transfer {
            return Ok(Interpretation::NotApplicable);
        }
        let Some(to) = tx.data.to.as_deref() else {
            return Ok(Interpretation::NotApplicable);
        };

        let contract_address = to.to_lowercase();
        let Some(contract) = find_token(self.contracts.as_ref(), &contract_address, tx.chain_id).await? else {
            return Ok(Interpretation::NotApplicable);
        };

        let values = match decode_evm_parameters(&transfer_params(), &payload[8..]) {
            Ok(values) => values,
            Err(e) => {
                debug!(chain_id = tx.chain_id, hash = %tx.data.hash, error = %e, "transfer calldata not decodable");
                return Ok(Interpretation::NotApplicable);
            }
        };
        let [AbiValue::Address(recipient), AbiValue::Uint(value)] = values.as_slice() else {
            return Ok(Interpretation::NotApplicable);
        };

        let amount = to_units(value, contract.decimal);
        Ok(Interpretation::Matched(ParseResult::transfer(
            tx.chain_id,
            recipient.to_lowercase(),
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
