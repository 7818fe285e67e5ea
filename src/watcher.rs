use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

use crate::dispatcher::ChainDispatcher;
use crate::models::{NotifyData, ScanOutcome, TransactionScanResult, TransactionStatus};
use crate::notifier::Notifier;
use crate::recorder::Recorder;
use crate::utils::config::SchedulerConfig;
use crate::utils::error::InspectorResult;

/// Follows one operation from first sighting to a terminal status.
pub struct Watcher {
    dispatcher: Arc<ChainDispatcher>,
    recorder: Arc<Recorder>,
    notifier: Arc<Notifier>,
    interval: Duration,
    max_attempts: u32,
}

impl Watcher {
    pub fn new(
        dispatcher: Arc<ChainDispatcher>,
        recorder: Arc<Recorder>,
        notifier: Arc<Notifier>,
        scheduler: &SchedulerConfig,
    ) -> Self {
        Watcher {
            dispatcher,
            recorder,
            notifier,
            interval: Duration::from_secs(scheduler.interval_seconds),
            max_attempts: scheduler.max_attempts.max(1),
        }
    }

    /// Scan, record and notify, then keep re-validating while the result is
    /// pending. Returns the last known result, or `None` when the hash was
    /// never found. A hash that could not be looked up because every scan
    /// round failed yields the last node error and publishes nothing.
    #[instrument(skip(self))]
    pub async fn watch(&self, operation_id: u64, hash: &str) -> InspectorResult<Option<TransactionScanResult>> {
        let Some(mut result) = self.find(operation_id, hash).await? else {
            warn!("transaction not found, operation rejected");
            self.notifier
                .notify(&NotifyData::Minimal(ScanOutcome {
                    id: operation_id,
                    hash_in: hash.to_string(),
                    hash_out: hash.to_string(),
                    status: TransactionStatus::Rejected,
                }))
                .await?;
            return Ok(None);
        };

        self.publish(&result).await?;

        // Block of first sighting, for results still waiting on settlement.
        let mut anchor = None;
        let mut attempts = 0;
        while result.status == TransactionStatus::Pending && attempts < self.max_attempts {
            if result.block_number == 0 && anchor.is_none() {
                anchor = self.first_sighting(&result).await;
            }
            attempts += 1;
            tokio::time::sleep(self.interval).await;

            let subject = match (result.block_number, anchor) {
                (0, Some(block_number)) => TransactionScanResult {
                    block_number,
                    ..result.clone()
                },
                (0, None) => continue,
                _ => result.clone(),
            };

            let validation = match self.dispatcher.validate(&subject).await {
                Ok(Some(validation)) => validation,
                Ok(None) => {
                    warn!(chain_id = result.chain_in_id, "no inspector owns the result, watch stopped");
                    break;
                }
                Err(e) => {
                    error!(attempt = attempts, error = %e, "validation round failed");
                    continue;
                }
            };

            let previous = result.status;
            result.apply(&validation);
            self.recorder.record(&result).await?;
            if result.status != previous {
                self.notifier.notify(&NotifyData::Full(result.clone())).await?;
            }
        }

        info!(status = ?result.status, "watch finished");
        Ok(Some(result))
    }

    async fn find(&self, operation_id: u64, hash: &str) -> InspectorResult<Option<TransactionScanResult>> {
        let mut last_error = None;
        for attempt in 1..=self.max_attempts {
            match self.dispatcher.scan(operation_id, hash).await {
                Ok(Some(result)) => return Ok(Some(result)),
                Ok(None) => {}
                Err(e) => {
                    error!(attempt, error = %e, "scan round failed");
                    last_error = Some(e);
                }
            }
            if attempt < self.max_attempts {
                tokio::time::sleep(self.interval).await;
            }
        }
        match last_error {
            Some(e) => Err(e),
            None => Ok(None),
        }
    }

    async fn first_sighting(&self, result: &TransactionScanResult) -> Option<u64> {
        match self.dispatcher.current_height(result.chain_in_id).await {
            Ok(height) => height,
            Err(e) => {
                error!(chain_id = result.chain_in_id, error = %e, "chain height unavailable");
                None
            }
        }
    }

    async fn publish(&self, result: &TransactionScanResult) -> InspectorResult<()> {
        self.recorder.record(result).await?;
        self.notifier.notify(&NotifyData::Full(result.clone())).await
    }
}
