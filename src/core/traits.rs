//! Core trait for marketplace platform adapters
//!
//! This module defines the boundary between the orchestration core and
//! marketplace-specific integrations. Adapters translate the abstract
//! publish contract into one marketplace's specifics and hold no
//! orchestration logic.

use crate::core::item::{Item, Outcome};
use async_trait::async_trait;

/// Boundary interface implemented once per marketplace
///
/// Error semantics: a returned `Err` is a transport-level failure
/// (network, timeout, unexpected condition); `Ok` with
/// `Outcome::success == false` is a business failure where the
/// marketplace itself rejected the request. The orchestrator treats
/// both as a failed attempt but preserves the distinction in messages.
///
/// Implementations must be fully substitutable: the orchestrator never
/// special-cases which adapter it is talking to, so a deterministic test
/// double is as valid as a live integration.
#[async_trait]
pub trait PlatformAdapter: Send + Sync {
    /// Platform name (e.g. "ebay", "shopify"), lowercase
    fn name(&self) -> &str;

    /// Whether credentials for the live marketplace API are present
    fn is_configured(&self) -> bool;

    /// Create a listing for the item, returning a freshly generated
    /// external id and a derived URL on success
    async fn publish(&self, item: &Item) -> anyhow::Result<Outcome>;

    /// Update the existing listing identified by `external_id`
    async fn update(&self, item: &Item, external_id: &str) -> anyhow::Result<Outcome>;

    /// Remove the listing identified by `external_id`
    async fn remove(&self, external_id: &str) -> anyhow::Result<Outcome>;
}
