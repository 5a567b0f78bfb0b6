//! Publish Orchestrator - drives one item through one platform's
//! publication state machine
//!
//! The orchestrator is the only writer of publication records. Each
//! operation resolves the adapter through the registry, checks the
//! item's platform selection, invokes the adapter under a timeout, and
//! records the translated outcome in the status ledger. There is no
//! automatic retry; retrying is the caller re-invoking the operation,
//! which re-enters the state machine from either terminal state.

use crate::adapters::registry::{PlatformHealth, PlatformRegistry};
use crate::core::error::PublishError;
use crate::core::item::{Item, Outcome, PublicationRecord};
use crate::core::ledger::StatusLedger;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, warn};

/// Orchestrates publish, update, and remove operations against
/// marketplace adapters
pub struct PublishOrchestrator {
    registry: Arc<PlatformRegistry>,
    ledger: Arc<StatusLedger>,
    adapter_timeout: Duration,
}

impl PublishOrchestrator {
    pub fn new(
        registry: Arc<PlatformRegistry>,
        ledger: Arc<StatusLedger>,
        adapter_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            ledger,
            adapter_timeout,
        }
    }

    pub fn ledger(&self) -> &Arc<StatusLedger> {
        &self.ledger
    }

    /// Configuration status per registered platform
    pub fn health(&self) -> HashMap<String, PlatformHealth> {
        self.registry.health()
    }

    /// Registered platform names, sorted
    pub fn platforms(&self) -> Vec<String> {
        self.registry.platforms()
    }

    /// Publish one item to one platform
    ///
    /// Precondition failures (unknown platform, platform not selected on
    /// the item) surface as errors without touching the ledger. Adapter
    /// failures are written to the ledger as a Failed record and then
    /// surfaced; they are never silently swallowed.
    pub async fn publish_one(
        &self,
        item_id: &str,
        platform: &str,
    ) -> Result<PublicationRecord, PublishError> {
        let adapter = self.registry.resolve(platform)?;
        let platform = adapter.name().to_string();

        // Serialize attempts for this (item, platform) pair; the guard is
        // held across the adapter call
        let _pair_guard = self.ledger.lock_pair(item_id, &platform).await;

        let item = self.ledger.load_item(item_id).await?;
        if !item.enabled_for(&platform) {
            return Err(PublishError::PlatformNotEnabled {
                item_id: item_id.to_string(),
                platform,
            });
        }

        info!(item_id, %platform, "publishing item");
        let outcome = self
            .call_adapter(&platform, adapter.publish(&item))
            .await;
        self.settle(&item, &platform, outcome).await
    }

    /// Re-publish an item in place, keeping its external listing id
    ///
    /// Falls back to a fresh publish when the item has never been
    /// published to the platform.
    pub async fn update_one(
        &self,
        item_id: &str,
        platform: &str,
    ) -> Result<PublicationRecord, PublishError> {
        let adapter = self.registry.resolve(platform)?;
        let platform = adapter.name().to_string();

        let _pair_guard = self.ledger.lock_pair(item_id, &platform).await;

        let item = self.ledger.load_item(item_id).await?;
        if !item.enabled_for(&platform) {
            return Err(PublishError::PlatformNotEnabled {
                item_id: item_id.to_string(),
                platform,
            });
        }

        let external_id = item
            .record_for(&platform)
            .and_then(|record| record.external_id.clone());

        info!(item_id, %platform, updating = external_id.is_some(), "updating item");
        let outcome = match external_id {
            Some(ref id) => {
                self.call_adapter(&platform, adapter.update(&item, id))
                    .await
            }
            None => self.call_adapter(&platform, adapter.publish(&item)).await,
        };

        // An update keeps the listing id even when the adapter omits it
        let outcome = outcome.map(|mut outcome| {
            if outcome.success && outcome.external_id.is_none() {
                outcome.external_id = external_id;
            }
            outcome
        });
        self.settle(&item, &platform, outcome).await
    }

    /// Remove an item's listing from a platform, resetting its record
    /// back to Pending
    ///
    /// Removal is allowed even when the platform is no longer selected
    /// on the item; a live listing must remain removable after a
    /// configuration change.
    pub async fn remove_one(
        &self,
        item_id: &str,
        platform: &str,
    ) -> Result<PublicationRecord, PublishError> {
        let adapter = self.registry.resolve(platform)?;
        let platform = adapter.name().to_string();

        let _pair_guard = self.ledger.lock_pair(item_id, &platform).await;

        let item = self.ledger.load_item(item_id).await?;
        let Some(external_id) = item
            .record_for(&platform)
            .and_then(|record| record.external_id.clone())
        else {
            // Nothing published; leave the record as it is
            return Ok(item.record_for(&platform).cloned().unwrap_or_default());
        };

        info!(item_id, %platform, %external_id, "removing listing");
        match self
            .call_adapter(&platform, adapter.remove(&external_id))
            .await
        {
            Ok(outcome) if outcome.success => {
                self.ledger
                    .record_outcome(&item.id, &platform, PublicationRecord::default())
                    .await
            }
            Ok(outcome) => {
                let message = outcome
                    .message
                    .unwrap_or_else(|| "removal rejected by platform".to_string());
                let err = PublishError::Rejected {
                    platform: platform.clone(),
                    message,
                };
                self.record_failure(&item, &platform, &err).await?;
                Err(err)
            }
            Err(err) => {
                self.record_failure(&item, &platform, &err).await?;
                Err(err)
            }
        }
    }

    /// Run an adapter call under the configured timeout, mapping
    /// transport failures into the error taxonomy
    async fn call_adapter<F>(&self, platform: &str, call: F) -> Result<Outcome, PublishError>
    where
        F: Future<Output = anyhow::Result<Outcome>>,
    {
        match timeout(self.adapter_timeout, call).await {
            Err(_) => Err(PublishError::Timeout {
                platform: platform.to_string(),
                seconds: self.adapter_timeout.as_secs(),
            }),
            Ok(Err(source)) => Err(PublishError::Transport {
                platform: platform.to_string(),
                message: format!("{source:#}"),
            }),
            Ok(Ok(outcome)) => Ok(outcome),
        }
    }

    /// Translate an adapter outcome into the durable record, write it,
    /// and surface failures to the caller
    async fn settle(
        &self,
        item: &Item,
        platform: &str,
        outcome: Result<Outcome, PublishError>,
    ) -> Result<PublicationRecord, PublishError> {
        match outcome {
            Ok(outcome) if outcome.success => {
                if outcome.external_id.is_none() {
                    // Published requires an external id; a success without
                    // one is an adapter defect, handled as transport
                    let err = PublishError::Transport {
                        platform: platform.to_string(),
                        message: "adapter reported success without an external id".to_string(),
                    };
                    self.record_failure(item, platform, &err).await?;
                    return Err(err);
                }

                let record = PublicationRecord::published(&outcome, chrono::Utc::now());
                info!(
                    item_id = %item.id,
                    platform,
                    external_id = record.external_id.as_deref().unwrap_or_default(),
                    "item published"
                );
                self.ledger.record_outcome(&item.id, platform, record).await
            }
            Ok(outcome) => {
                let message = outcome
                    .message
                    .unwrap_or_else(|| "rejected by platform".to_string());
                let err = PublishError::Rejected {
                    platform: platform.to_string(),
                    message,
                };
                self.record_failure(item, platform, &err).await?;
                Err(err)
            }
            Err(err) => {
                self.record_failure(item, platform, &err).await?;
                Err(err)
            }
        }
    }

    async fn record_failure(
        &self,
        item: &Item,
        platform: &str,
        err: &PublishError,
    ) -> Result<(), PublishError> {
        warn!(item_id = %item.id, platform, error = %err, "publish attempt failed");
        self.ledger
            .record_outcome(&item.id, platform, PublicationRecord::failed(err.to_string()))
            .await?;
        Ok(())
    }
}
