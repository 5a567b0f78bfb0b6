//! Bulk Dispatcher - fan out one publish run across items and platforms
//!
//! A bulk run is a detached background job: `dispatch` returns
//! immediately with a handle, and the job keeps running even if the
//! handle is dropped. Every (item, platform) pair is attempted
//! independently in nested order (items outer, platforms inner, in the
//! order supplied); one pair failing never aborts the run, so the report
//! always carries one outcome per requested pair.
//!
//! Platform filtering happens per pair, not up front: a pair whose
//! platform is not selected on the item fails its precondition check and
//! is reported as a failure, so partial misconfiguration degrades to a
//! visible per-pair failure instead of a silent skip.

use crate::core::error::PublishError;
use crate::core::item::PublicationRecord;
use crate::orchestration::publisher::PublishOrchestrator;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Result of one (item, platform) publish attempt within a bulk run
#[derive(Debug, Clone, Serialize)]
pub struct PairOutcome {
    pub item_id: String,
    pub platform: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PairOutcome {
    fn succeeded(item_id: &str, platform: &str, record: &PublicationRecord) -> Self {
        Self {
            item_id: item_id.to_string(),
            platform: platform.to_string(),
            success: true,
            external_id: record.external_id.clone(),
            error_code: None,
            message: record.message.clone(),
        }
    }

    fn failed(item_id: &str, platform: &str, err: &PublishError) -> Self {
        Self {
            item_id: item_id.to_string(),
            platform: platform.to_string(),
            success: false,
            external_id: None,
            error_code: Some(err.code().to_string()),
            message: Some(err.to_string()),
        }
    }
}

/// Final report of a completed bulk run
#[derive(Debug, Clone, Serialize)]
pub struct BulkReport {
    pub job_id: Uuid,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub outcomes: Vec<PairOutcome>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Handle to a running bulk job
///
/// The job is detached: dropping the handle does not cancel it. Callers
/// that want the report await `wait`.
pub struct BulkJobHandle {
    job_id: Uuid,
    task: JoinHandle<BulkReport>,
}

impl BulkJobHandle {
    pub fn job_id(&self) -> Uuid {
        self.job_id
    }

    /// Wait for the job to finish and return its report
    pub async fn wait(self) -> anyhow::Result<BulkReport> {
        Ok(self.task.await?)
    }
}

/// Fans a publish run out across items and platforms as a background job
pub struct BulkDispatcher {
    orchestrator: Arc<PublishOrchestrator>,
}

impl BulkDispatcher {
    pub fn new(orchestrator: Arc<PublishOrchestrator>) -> Self {
        Self { orchestrator }
    }

    /// Start a bulk publish job for the given items and platforms
    pub fn dispatch(&self, item_ids: Vec<String>, platforms: Vec<String>) -> BulkJobHandle {
        let job_id = Uuid::new_v4();
        let orchestrator = Arc::clone(&self.orchestrator);

        let task = tokio::spawn(async move {
            run_job(job_id, orchestrator, item_ids, platforms).await
        });

        BulkJobHandle { job_id, task }
    }
}

async fn run_job(
    job_id: Uuid,
    orchestrator: Arc<PublishOrchestrator>,
    item_ids: Vec<String>,
    platforms: Vec<String>,
) -> BulkReport {
    let started_at = Utc::now();
    info!(
        %job_id,
        items = item_ids.len(),
        platforms = platforms.len(),
        "bulk publish started"
    );

    let mut outcomes = Vec::with_capacity(item_ids.len() * platforms.len());
    for item_id in &item_ids {
        for platform in &platforms {
            let outcome = attempt_pair(&orchestrator, item_id, platform).await;
            debug!(
                %job_id,
                %item_id,
                %platform,
                success = outcome.success,
                "bulk pair settled"
            );
            outcomes.push(outcome);
        }
    }

    let succeeded = outcomes.iter().filter(|outcome| outcome.success).count();
    let report = BulkReport {
        job_id,
        total: outcomes.len(),
        succeeded,
        failed: outcomes.len() - succeeded,
        outcomes,
        started_at,
        finished_at: Utc::now(),
    };
    info!(
        %job_id,
        total = report.total,
        succeeded = report.succeeded,
        failed = report.failed,
        "bulk publish finished"
    );
    report
}

async fn attempt_pair(
    orchestrator: &PublishOrchestrator,
    item_id: &str,
    platform: &str,
) -> PairOutcome {
    match orchestrator.publish_one(item_id, platform).await {
        Ok(record) => PairOutcome::succeeded(item_id, platform, &record),
        Err(err) => {
            // A pair whose platform is known but not selected on the item
            // still gets a durable Failed record; the single-pair operation
            // leaves the ledger alone on that error, but a bulk run reports
            // every requested pair in the ledger as well as the report.
            if matches!(err, PublishError::PlatformNotEnabled { .. }) {
                let record = PublicationRecord::failed(err.to_string());
                if let Err(write_err) = orchestrator
                    .ledger()
                    .record_outcome(item_id, &platform.to_lowercase(), record)
                    .await
                {
                    warn!(item_id, platform, error = %write_err, "failed to record bulk outcome");
                }
            }
            PairOutcome::failed(item_id, platform, &err)
        }
    }
}
