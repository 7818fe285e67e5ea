//! Wiring of stores, node clients, inspectors and the dispatcher from
//! [`AppConfig`].

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

use crate::clients::{EvmHttpClient, TronHttpClient};
use crate::dispatcher::ChainDispatcher;
use crate::inspectors::evm::evm_inspector;
use crate::inspectors::tron::tron_inspector;
use crate::inspectors::FamilyInspector;
use crate::models::{Chain, ChainFamily, Contract, NodeConfig};
use crate::notifier::{BrokerMessage, ChannelBroker, Notifier};
use crate::recorder::Recorder;
use crate::registry::{ChainRegistry, ContractStore};
use crate::repository::{MemoryChainStore, MemoryContractStore, MemoryTransactionStore};
use crate::utils::config::{AppConfig, ChainConfig, ContractConfig};
use crate::utils::error::{AppError, InspectorResult};
use crate::utils::tron::canonicalize_address;
use crate::watcher::Watcher;

pub struct Services {
    pub dispatcher: Arc<ChainDispatcher>,
    pub recorder: Arc<Recorder>,
    pub notifier: Arc<Notifier>,
    pub watcher: Arc<Watcher>,
}

impl From<&ChainConfig> for Chain {
    fn from(config: &ChainConfig) -> Self {
        Chain {
            id: config.id,
            family: config.family,
            decimal: config.decimal,
            confirmations_min: config.confirmations_min,
            node: NodeConfig {
                provider: config.provider.clone(),
                api_key: config.api_key.clone(),
            },
        }
    }
}

/// Contracts keyed the way interpreters look them up: lower-case hex on EVM
/// chains, base58check on Tron chains. Ids are assigned in configuration order.
pub fn load_contracts(chains: &[Chain], contracts: &[ContractConfig]) -> InspectorResult<Vec<Contract>> {
    contracts
        .iter()
        .enumerate()
        .map(|(index, config)| {
            let family = chains
                .iter()
                .find(|chain| chain.id == config.chain_id)
                .map(|chain| chain.family)
                .ok_or(AppError::UnknownChain(config.chain_id))?;
            let address = match family {
                ChainFamily::Evm => config.address.to_lowercase(),
                ChainFamily::Tron => canonicalize_address(&config.address)?,
            };
            Ok(Contract {
                id: index as u64 + 1,
                address,
                chain_id: config.chain_id,
                kind: config.kind,
                decimal: config.decimal,
            })
        })
        .collect()
}

/// Build every service and register the configured chains. The returned
/// receiver carries everything the notifier publishes.
pub async fn initialize_services(config: &AppConfig) -> InspectorResult<(Services, mpsc::Receiver<BrokerMessage>)> {
    let chains: Vec<Chain> = config.chains.iter().map(Chain::from).collect();
    let contracts = load_contracts(&chains, &config.contracts)?;
    info!(chains = chains.len(), contracts = contracts.len(), "configuration loaded");

    let chain_store = Arc::new(MemoryChainStore::from_chains(chains.clone()));
    let contract_store: Arc<dyn ContractStore> = Arc::new(MemoryContractStore::from_contracts(contracts));
    let registry = Arc::new(ChainRegistry::new(chain_store));

    let mut inspectors: Vec<Arc<dyn FamilyInspector>> = Vec::new();
    inspectors.push(Arc::new(evm_inspector(
        Arc::new(EvmHttpClient::new()),
        Arc::clone(&registry),
        Arc::clone(&contract_store),
    )));
    inspectors.push(Arc::new(tron_inspector(
        Arc::new(TronHttpClient::new()),
        Arc::clone(&registry),
        Arc::clone(&contract_store),
    )));

    let dispatcher = Arc::new(ChainDispatcher::new(inspectors));
    for chain in &chains {
        dispatcher.add_chain(chain).await?;
    }

    let recorder = Arc::new(Recorder::new(Arc::new(MemoryTransactionStore::new()), contract_store));
    let (broker, receiver) = ChannelBroker::new(config.broker.capacity.max(1));
    let notifier = Arc::new(Notifier::new(Arc::new(broker), config.broker.queue.clone()));
    let watcher = Arc::new(Watcher::new(
        Arc::clone(&dispatcher),
        Arc::clone(&recorder),
        Arc::clone(&notifier),
        &config.scheduler,
    ));

    Ok((
        Services {
            dispatcher,
            recorder,
            notifier,
            watcher,
        },
        receiver,
    ))
}
