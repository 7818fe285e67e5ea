use std::sync::Arc;

use blockinspector::{
    clients::tron::{TronBlockHeader, TronBlockRawData},
    clients::TronBlock,
    models::{
        Chain, ChainFamily, Contract, ContractKind, NodeConfig, ParseResult, TransactionScanResult,
        TransactionStatus, NATIVE_CURRENCY,
    },
    registry::ChainRegistry,
    repository::{MemoryChainStore, MemoryContractStore},
};

pub const BSC_ID: u64 = 56;
pub const TRON_ID: u64 = 728126428;

pub fn create_test_chain(id: u64, family: ChainFamily, decimal: u32, confirmations_min: u64) -> Chain {
    Chain {
        id,
        family,
        decimal,
        confirmations_min,
        node: NodeConfig {
            provider: "http://localhost:8545".to_string(),
            api_key: None,
        },
    }
}

pub fn create_test_registry(chains: Vec<Chain>) -> Arc<ChainRegistry> {
    Arc::new(ChainRegistry::new(Arc::new(MemoryChainStore::from_chains(chains))))
}

pub fn create_test_contracts(contracts: Vec<(&str, u64, ContractKind, u32)>) -> Arc<MemoryContractStore> {
    Arc::new(MemoryContractStore::from_contracts(
        contracts
            .into_iter()
            .enumerate()
            .map(|(index, (address, chain_id, kind, decimal))| Contract {
                id: index as u64 + 1,
                address: address.to_string(),
                chain_id,
                kind,
                decimal,
            }),
    ))
}

pub fn create_test_block(number: u64) -> TronBlock {
    TronBlock {
        block_header: TronBlockHeader {
            raw_data: TronBlockRawData { number },
        },
    }
}

/// Native transfer result as a scan would have produced it.
pub fn create_test_result(chain_id: u64, hash: &str, block_number: u64, contract: Option<&str>) -> TransactionScanResult {
    let currency = contract.unwrap_or(NATIVE_CURRENCY).to_string();
    TransactionScanResult {
        id: 1,
        hash_in: hash.to_string(),
        hash_out: hash.to_string(),
        from: "sender".to_string(),
        block_number,
        chain_in_id: chain_id,
        status: TransactionStatus::Pending,
        network_fee: "0".to_string(),
        parse: ParseResult::transfer(
            chain_id,
            "recipient".to_string(),
            "1".to_string(),
            currency,
            contract.map(str::to_string),
        ),
    }
}
