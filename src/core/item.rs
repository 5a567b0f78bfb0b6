//! Catalog item model and per-platform publication state
//!
//! This module defines the item record shared by every component, the
//! per-(item, platform) publication state machine, and the transient
//! adapter outcome that gets translated into durable state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

// ============================================================================
// Publication state machine
// ============================================================================

/// Per-platform publication state
///
/// Pending is the initial state. Published and Failed are terminal but
/// re-enterable: a fresh publish attempt overwrites the record, so
/// Failed -> retry -> Published is the expected recovery path and
/// re-publishing a Published record is a forced overwrite (manual re-sync).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishState {
    #[default]
    Pending,
    Published,
    Failed,
}

/// Durable per-(item, platform) status entry
///
/// Written only by the publish orchestrator; every other component reads
/// but never mutates it. Invariant: `state == Published` implies
/// `external_id` is present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublicationRecord {
    #[serde(rename = "status")]
    pub state: PublishState,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "url")]
    pub external_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PublicationRecord {
    /// Record a successful publish outcome
    pub fn published(outcome: &Outcome, published_at: DateTime<Utc>) -> Self {
        Self {
            state: PublishState::Published,
            published_at: Some(published_at),
            external_id: outcome.external_id.clone(),
            external_url: outcome.external_url.clone(),
            message: outcome.message.clone(),
        }
    }

    /// Record a failed publish attempt, clearing any prior external
    /// identifiers from an earlier success
    pub fn failed<S: Into<String>>(message: S) -> Self {
        Self {
            state: PublishState::Failed,
            published_at: None,
            external_id: None,
            external_url: None,
            message: Some(message.into()),
        }
    }

    pub fn is_published(&self) -> bool {
        self.state == PublishState::Published
    }
}

// ============================================================================
// Adapter outcome
// ============================================================================

/// Transient result returned by a platform adapter for one call
///
/// Never persisted directly; the orchestrator translates it into a
/// `PublicationRecord`. `success = false` is a business failure (the
/// marketplace rejected the listing) as opposed to a transport error,
/// which adapters surface as `Err`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "url")]
    pub external_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Outcome {
    pub fn success<S: Into<String>>(external_id: S, external_url: S, message: S) -> Self {
        Self {
            success: true,
            external_id: Some(external_id.into()),
            external_url: Some(external_url.into()),
            message: Some(message.into()),
        }
    }

    pub fn failure<S: Into<String>>(message: S) -> Self {
        Self {
            success: false,
            external_id: None,
            external_url: None,
            message: Some(message.into()),
        }
    }
}

// ============================================================================
// Item model
// ============================================================================

/// Item condition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    #[default]
    New,
    Used,
    Refurbished,
    Other,
}

/// Item dimensions in inches
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    #[serde(default)]
    pub length: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

/// Shipping information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shipping {
    #[serde(default)]
    pub weight: f64,
    #[serde(default = "default_shipping_method")]
    pub method: String,
    #[serde(default)]
    pub cost: f64,
}

fn default_shipping_method() -> String {
    "Standard".to_string()
}

impl Default for Shipping {
    fn default() -> Self {
        Self {
            weight: 0.0,
            method: default_shipping_method(),
            cost: 0.0,
        }
    }
}

/// Catalog item published to one or more marketplaces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Stable unique identifier, assigned once at creation
    pub id: String,

    pub title: String,
    pub description: String,
    pub price: f64,
    pub quantity: u32,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub condition: Condition,

    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub dimensions: Dimensions,
    #[serde(default)]
    pub shipping: Shipping,

    /// Platform eligibility: platform name -> selected for publishing
    #[serde(default)]
    pub platforms: HashMap<String, bool>,

    /// Per-platform publication status, owned by the orchestrator
    #[serde(default)]
    pub platform_status: HashMap<String, PublicationRecord>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_category() -> String {
    "General".to_string()
}

impl Item {
    /// Create a new item with a fresh id and a Pending record for every
    /// selected platform
    pub fn new<S: Into<String>>(
        title: S,
        description: S,
        price: f64,
        quantity: u32,
        platforms: HashMap<String, bool>,
    ) -> Self {
        let now = Utc::now();
        let platform_status = platforms
            .iter()
            .filter(|(_, selected)| **selected)
            .map(|(name, _)| (name.clone(), PublicationRecord::default()))
            .collect();

        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: description.into(),
            price,
            quantity,
            category: default_category(),
            condition: Condition::default(),
            images: Vec::new(),
            tags: Vec::new(),
            weight: 0.0,
            dimensions: Dimensions::default(),
            shipping: Shipping::default(),
            platforms,
            platform_status,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether the item is selected for the given platform
    pub fn enabled_for(&self, platform: &str) -> bool {
        self.platforms.get(platform).copied().unwrap_or(false)
    }

    /// Current publication record for the given platform, if any
    pub fn record_for(&self, platform: &str) -> Option<&PublicationRecord> {
        self.platform_status.get(platform)
    }
}
