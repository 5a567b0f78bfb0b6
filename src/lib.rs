//! listing-publisher - multi-marketplace listing publication core
//!
//! Describe a catalog item once, publish it to every selected
//! marketplace. The crate is organized in three layers:
//!
//! - `core`: the item model, the per-(item, platform) publication state
//!   machine, the durable status ledger, configuration, and the
//!   `PlatformAdapter` trait.
//! - `adapters`: one adapter per marketplace (eBay, Shopify) plus the
//!   registry that resolves them by name.
//! - `orchestration`: the publish orchestrator driving single
//!   (item, platform) attempts, and the bulk dispatcher fanning a run
//!   out across many pairs as a detached background job.
//!
//! Publication state is per pair and terminal states are re-enterable:
//! retrying is simply invoking publish again. Adapter failures are
//! recorded in the ledger and surfaced, never silently swallowed;
//! configuration errors (unknown platform, platform not selected) fail
//! fast without touching the ledger.

pub mod adapters;
pub mod core;
pub mod orchestration;

pub use crate::core::config::PublisherConfig;
pub use crate::core::error::PublishError;
pub use crate::core::item::{Item, Outcome, PublicationRecord, PublishState};
pub use crate::core::ledger::StatusLedger;
pub use crate::core::store::{ItemStore, JsonFileStore, MemoryStore};
pub use crate::core::traits::PlatformAdapter;
pub use adapters::{EbayAdapter, PlatformHealth, PlatformRegistry, ShopifyAdapter};
pub use orchestration::{BulkDispatcher, BulkJobHandle, BulkReport, PairOutcome, PublishOrchestrator};
