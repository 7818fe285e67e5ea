use blockinspector::bootstrap::initialize_services;
use blockinspector::utils::{config::AppConfig, error::AppError, log::Logger};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let config = AppConfig::new()?;

    let _guard = Logger::init(&config.log)?;

    info!("Logger initialized");
    info!("Starting transaction inspector...");

    let operations = parse_operations(std::env::args().skip(1))?;
    if operations.is_empty() {
        warn!("No operations given, expected arguments of the form <operation_id>:<hash>");
        return Ok(());
    }

    let (services, mut receiver) = initialize_services(&config).await?;

    let printer = tokio::spawn(async move {
        while let Some(message) = receiver.recv().await {
            match serde_json::to_string_pretty(&message) {
                Ok(json) => println!("{}", json),
                Err(e) => error!("Error serializing message: {:?}", e),
            }
        }
    });

    let watcher = Arc::clone(&services.watcher);
    let watches = operations.iter().map(|(operation_id, hash)| {
        let watcher = Arc::clone(&watcher);
        async move {
            if let Err(e) = watcher.watch(*operation_id, hash).await {
                error!("Error watching operation {}: {:?}", operation_id, e);
            }
        }
    });
    join_all(watches).await;

    // Closing the last sender ends the printer.
    drop(watcher);
    drop(services);
    printer.await?;

    Ok(())
}

fn parse_operations(args: impl Iterator<Item = String>) -> Result<Vec<(u64, String)>, AppError> {
    args.map(|arg| {
        let (id, hash) = arg
            .split_once(':')
            .ok_or_else(|| AppError::ParseError(format!("Invalid operation argument: {}", arg)))?;
        let id = id
            .parse::<u64>()
            .map_err(|e| AppError::ParseError(format!("Invalid operation id {}: {}", id, e)))?;
        Ok((id, hash.to_string()))
    })
    .collect()
}
