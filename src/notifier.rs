//! Publishes scan results onto the message bus.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

use crate::models::NotifyData;
use crate::utils::error::{AppError, InspectorResult};

/// Default queue for scan results.
pub const TRANSACTION_SCAN_RESULT: &str = "transaction_scan_result";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrokerMessage {
    pub queue: String,
    pub payload: Value,
}

#[async_trait]
pub trait MessageBroker: Send + Sync {
    async fn send(&self, queue: &str, payload: Value) -> InspectorResult<()>;
}

/// Broker backed by a bounded tokio channel; the receiving half is the
/// transport.
pub struct ChannelBroker {
    sender: mpsc::Sender<BrokerMessage>,
}

impl ChannelBroker {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<BrokerMessage>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (ChannelBroker { sender }, receiver)
    }
}

#[async_trait]
impl MessageBroker for ChannelBroker {
    async fn send(&self, queue: &str, payload: Value) -> InspectorResult<()> {
        self.sender
            .send(BrokerMessage {
                queue: queue.to_string(),
                payload,
            })
            .await
            .map_err(|e| AppError::BrokerError(e.to_string()))
    }
}

pub struct Notifier {
    broker: Arc<dyn MessageBroker>,
    queue: String,
}

impl Notifier {
    pub fn new(broker: Arc<dyn MessageBroker>, queue: impl Into<String>) -> Self {
        Notifier {
            broker,
            queue: queue.into(),
        }
    }

    /// Publish a message mirroring whichever variant `data` is.
    pub async fn notify(&self, data: &NotifyData) -> InspectorResult<()> {
        let payload = serde_json::to_value(data).map_err(|e| AppError::BrokerError(e.to_string()))?;
        self.broker.send(&self.queue, payload).await?;
        debug!(queue = %self.queue, status = ?data.status(), "scan result published");
        Ok(())
    }
}
