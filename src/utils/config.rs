use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

use crate::models::{ChainFamily, ContractKind};

#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    pub id: u64,
    pub family: ChainFamily,
    pub decimal: u32,
    pub confirmations_min: u64,
    pub provider: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContractConfig {
    pub address: String,
    pub chain_id: u64,
    pub kind: ContractKind,
    pub decimal: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    pub interval_seconds: u64,
    pub max_attempts: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrokerConfig {
    pub queue: String,
    pub capacity: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    pub level: String,
    pub output: String,
    pub format: String,
    pub file_path: String,
    pub file_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub log: LogConfig,
    pub scheduler: SchedulerConfig,
    pub broker: BrokerConfig,
    #[serde(default)]
    pub chains: Vec<ChainConfig>,
    #[serde(default)]
    pub contracts: Vec<ContractConfig>,
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(Environment::with_prefix("INSPECTOR").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
