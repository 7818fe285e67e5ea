//! Scan → parse → validate pipeline shared by every chain family.
//!
//! A family plugs in through [`ChainFamilyOps`] (node access, hash shape,
//! settlement lookup and the policy for a missing settlement record) and an
//! ordered list of [`TransferInterpreter`]s. [`Inspector`] runs the common
//! algorithm and is exposed to the dispatcher as a [`FamilyInspector`].

pub mod evm;
pub mod tron;

use async_trait::async_trait;
use num_bigint::BigInt;
use std::sync::Arc;
use tracing::{debug, info};

use crate::models::{
    Chain, ChainFamily, ParseResult, TransactionScanResult, TransactionStatus, ValidateResponse,
};
use crate::registry::ChainRegistry;
use crate::utils::decimal::to_units;
use crate::utils::error::InspectorResult;

pub use evm::{EvmFamily, EvmInspector};
pub use tron::{TronFamily, TronInspector};

/// A transaction as fetched from a node, tagged with the chain it was found on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTransaction<T> {
    pub chain_id: u64,
    pub data: T,
}

/// Outcome of one interpreter looking at one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interpretation {
    Matched(ParseResult),
    NotApplicable,
}

/// Recognizes one transfer shape of a family's transactions.
#[async_trait]
pub trait TransferInterpreter<T: Send + Sync>: Send + Sync {
    fn name(&self) -> &'static str;

    async fn parse(&self, tx: &RawTransaction<T>) -> InspectorResult<Interpretation>;

    /// Whether a scan result is a transfer of the kind this interpreter produces.
    async fn owns(&self, result: &TransactionScanResult) -> InspectorResult<bool>;
}

/// What to conclude when the node has no receipt/execution record for a hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingSettlement {
    /// The transaction is rejected outright.
    Reject,
    /// Pending until the chain is more than this many blocks past the
    /// result's block number, rejected afterwards.
    TolerateBlocks(u64),
}

/// Execution record of a mined transaction, in the family-neutral shape the
/// pipeline needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    /// Network fee in the chain's smallest unit.
    pub fee: BigInt,
    pub block_number: u64,
    pub succeeded: bool,
}

/// Sender and reference block of a freshly scanned transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub from: String,
    pub block_number: u64,
}

#[async_trait]
pub trait ChainFamilyOps: Send + Sync + 'static {
    type Transaction: Send + Sync + 'static;

    const FAMILY: ChainFamily;
    const MISSING_SETTLEMENT: MissingSettlement;

    /// Shape check done before any node call.
    fn is_hash(hash: &str) -> bool;

    /// Failure flagged by the transaction itself, independent of confirmations.
    fn is_execution_failure(tx: &Self::Transaction) -> bool;

    async fn register_chain(&self, chain: &Chain) -> InspectorResult<()>;

    async fn fetch_transaction(&self, chain_id: u64, hash: &str) -> InspectorResult<Option<Self::Transaction>>;

    async fn fetch_settlement(&self, chain_id: u64, hash: &str) -> InspectorResult<Option<Settlement>>;

    async fn current_height(&self, chain_id: u64) -> InspectorResult<u64>;

    async fn origin(&self, tx: &RawTransaction<Self::Transaction>) -> InspectorResult<Origin>;
}

/// Object-safe face of an inspector, as seen by the dispatcher.
#[async_trait]
pub trait FamilyInspector: Send + Sync {
    fn family(&self) -> ChainFamily;

    async fn register_chain(&self, chain: &Chain) -> InspectorResult<()>;

    async fn scan(
        &self,
        operation_id: u64,
        hash: &str,
        chain_id: u64,
    ) -> InspectorResult<Option<TransactionScanResult>>;

    async fn validate(&self, result: &TransactionScanResult) -> InspectorResult<Option<ValidateResponse>>;

    /// Latest block of a chain this inspector serves.
    async fn current_height(&self, chain_id: u64) -> InspectorResult<u64>;
}

pub struct Inspector<F: ChainFamilyOps> {
    family: F,
    registry: Arc<ChainRegistry>,
    interpreters: Vec<Box<dyn TransferInterpreter<F::Transaction>>>,
}

impl<F: ChainFamilyOps> Inspector<F> {
    /// `interpreters` are tried in order; the first match wins.
    pub fn new(
        family: F,
        registry: Arc<ChainRegistry>,
        interpreters: Vec<Box<dyn TransferInterpreter<F::Transaction>>>,
    ) -> Self {
        Inspector {
            family,
            registry,
            interpreters,
        }
    }

    pub async fn parse(&self, tx: &RawTransaction<F::Transaction>) -> InspectorResult<Option<ParseResult>> {
        for interpreter in &self.interpreters {
            if let Interpretation::Matched(result) = interpreter.parse(tx).await? {
                debug!(chain_id = tx.chain_id, interpreter = interpreter.name(), "transfer recognized");
                return Ok(Some(result));
            }
        }
        Ok(None)
    }

    /// Status, fee and confirmations recomputed from the node; the status
    /// carried by `result` is ignored.
    async fn settle(&self, result: &TransactionScanResult) -> InspectorResult<ValidateResponse> {
        let chain_id = result.chain_in_id;
        let mut response = ValidateResponse {
            status: TransactionStatus::Rejected,
            network_fee: "0".to_string(),
            block_number: result.block_number,
            hash_out: result.hash_in.clone(),
            amount_out: result.parse.amount_out.clone(),
        };

        let height = match F::MISSING_SETTLEMENT {
            MissingSettlement::TolerateBlocks(_) => Some(self.family.current_height(chain_id).await?),
            MissingSettlement::Reject => None,
        };

        let Some(settlement) = self.family.fetch_settlement(chain_id, &result.hash_in).await? else {
            if let (MissingSettlement::TolerateBlocks(window), Some(height)) = (F::MISSING_SETTLEMENT, height) {
                let elapsed = height.saturating_sub(result.block_number);
                response.status = if elapsed > window {
                    TransactionStatus::Rejected
                } else {
                    TransactionStatus::Pending
                };
                response.block_number = 0;
            }
            debug!(chain_id, hash = %result.hash_in, status = ?response.status, "no settlement record");
            return Ok(response);
        };

        let chain = self.registry.chain(chain_id).await?;
        response.network_fee = to_units(&settlement.fee, chain.decimal);
        response.block_number = settlement.block_number;

        if !settlement.succeeded {
            return Ok(response);
        }

        let height = match height {
            Some(height) => height,
            None => self.family.current_height(chain_id).await?,
        };
        let confirmations = height.saturating_sub(settlement.block_number);
        response.status = if confirmations >= chain.confirmations_min {
            TransactionStatus::Finished
        } else {
            TransactionStatus::Pending
        };

        Ok(response)
    }
}

#[async_trait]
impl<F: ChainFamilyOps> FamilyInspector for Inspector<F> {
    fn family(&self) -> ChainFamily {
        F::FAMILY
    }

    async fn register_chain(&self, chain: &Chain) -> InspectorResult<()> {
        self.registry.prime(chain.clone()).await;
        self.family.register_chain(chain).await
    }

    async fn scan(
        &self,
        operation_id: u64,
        hash: &str,
        chain_id: u64,
    ) -> InspectorResult<Option<TransactionScanResult>> {
        if !F::is_hash(hash) {
            debug!(chain_id, hash, "malformed hash");
            return Ok(None);
        }

        let Some(data) = self.family.fetch_transaction(chain_id, hash).await? else {
            return Ok(None);
        };
        let tx = RawTransaction { chain_id, data };

        let Some(parse) = self.parse(&tx).await? else {
            debug!(chain_id, hash, "no interpreter matched");
            return Ok(None);
        };

        let origin = self.family.origin(&tx).await?;
        let mut result = TransactionScanResult {
            id: operation_id,
            hash_in: hash.to_string(),
            hash_out: hash.to_string(),
            from: origin.from,
            block_number: origin.block_number,
            chain_in_id: chain_id,
            status: TransactionStatus::Pending,
            network_fee: "0".to_string(),
            parse,
        };

        let validation = self.settle(&result).await?;
        result.apply(&validation);

        if F::is_execution_failure(&tx.data) {
            result.status = TransactionStatus::Rejected;
        }

        info!(operation_id, chain_id, hash, status = ?result.status, "transaction scanned");
        Ok(Some(result))
    }

    async fn validate(&self, result: &TransactionScanResult) -> InspectorResult<Option<ValidateResponse>> {
        for interpreter in &self.interpreters {
            if interpreter.owns(result).await? {
                return self.settle(result).await.map(Some);
            }
        }
        Ok(None)
    }

    async fn current_height(&self, chain_id: u64) -> InspectorResult<u64> {
        self.family.current_height(chain_id).await
    }
}
