//! Orchestration layer
//!
//! Single-pair publishing lives in `publisher`; `bulk` fans a run out
//! across many items and platforms as a detached background job.

pub mod bulk;
pub mod publisher;

pub use bulk::{BulkDispatcher, BulkJobHandle, BulkReport, PairOutcome};
pub use publisher::PublishOrchestrator;
