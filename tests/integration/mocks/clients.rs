//! Mock node clients.
//!
//! A mock with no expectations panics on any call, which is how tests assert
//! that a code path performs no node I/O.

use async_trait::async_trait;
use blockinspector::{
    clients::{
        EvmNodeClient, EvmReceipt, EvmTransaction, TronBlock, TronNodeClient, TronTransaction,
        TronTransactionInfo,
    },
    models::Chain,
    utils::error::InspectorResult,
};
use mockall::mock;

mock! {
    pub EvmNodeClient {}

    #[async_trait]
    impl EvmNodeClient for EvmNodeClient {
        async fn add_chain(&self, chain: &Chain) -> InspectorResult<()>;
        async fn get_transaction(&self, chain_id: u64, hash: &str) -> InspectorResult<Option<EvmTransaction>>;
        async fn get_transaction_receipt(&self, chain_id: u64, hash: &str) -> InspectorResult<Option<EvmReceipt>>;
        async fn get_block_height(&self, chain_id: u64) -> InspectorResult<u64>;
    }
}

mock! {
    pub TronNodeClient {}

    #[async_trait]
    impl TronNodeClient for TronNodeClient {
        async fn add_chain(&self, chain: &Chain) -> InspectorResult<()>;
        async fn get_transaction(&self, chain_id: u64, hash: &str) -> InspectorResult<Option<TronTransaction>>;
        async fn get_transaction_info(&self, chain_id: u64, hash: &str) -> InspectorResult<Option<TronTransactionInfo>>;
        async fn get_current_block(&self, chain_id: u64) -> InspectorResult<TronBlock>;
    }
}
