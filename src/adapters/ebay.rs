//! eBay platform adapter
//!
//! Translates the abstract publish contract into eBay listing calls.
//! Without full credentials the adapter synthesizes mock outcomes with
//! simulated latency, which keeps the orchestration core testable and
//! runnable end to end with no live marketplace account. With
//! credentials but no valid OAuth token it reports a business failure;
//! token acquisition itself happens outside this crate and is injected
//! via `set_token`.

use crate::adapters::{mock_latency, short_id};
use crate::core::config::EbayConfig;
use crate::core::item::{Item, Outcome};
use crate::core::traits::PlatformAdapter;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use secrecy::SecretString;
use std::sync::Mutex;
use std::time::Duration as StdDuration;
use tokio::time::sleep;
use tracing::debug;

struct StoredToken {
    #[allow(dead_code)]
    access_token: SecretString,
    expires_at: DateTime<Utc>,
}

/// eBay marketplace adapter
pub struct EbayAdapter {
    config: EbayConfig,
    // In-memory token slot; tokens are acquired externally
    token: Mutex<Option<StoredToken>>,
}

impl EbayAdapter {
    pub fn new(config: EbayConfig) -> Self {
        Self {
            config,
            token: Mutex::new(None),
        }
    }

    /// Store an access token obtained by the external OAuth flow
    pub fn set_token(&self, access_token: SecretString, expires_in_secs: i64) {
        let stored = StoredToken {
            access_token,
            expires_at: Utc::now() + Duration::seconds(expires_in_secs),
        };
        *self.token.lock().expect("token lock poisoned") = Some(stored);
    }

    /// Drop the stored token
    pub fn clear_token(&self) {
        *self.token.lock().expect("token lock poisoned") = None;
    }

    fn has_valid_token(&self) -> bool {
        self.token
            .lock()
            .expect("token lock poisoned")
            .as_ref()
            .is_some_and(|t| Utc::now() < t.expires_at)
    }

    fn auth_required(&self) -> Option<Outcome> {
        if self.config.is_configured() && !self.has_valid_token() {
            return Some(Outcome::failure(
                "eBay authentication required. Please authorize the application first.",
            ));
        }
        None
    }

    async fn mock_create_listing(&self, item: &Item) -> Outcome {
        sleep(mock_latency()).await;

        let listing_id = format!("ebay_{}", short_id());
        debug!(item_id = %item.id, %listing_id, "created mock eBay listing");

        Outcome::success(
            listing_id.clone(),
            format!("https://www.ebay.com/itm/{listing_id}"),
            "Item successfully listed on eBay".to_string(),
        )
    }
}

#[async_trait]
impl PlatformAdapter for EbayAdapter {
    fn name(&self) -> &str {
        "ebay"
    }

    fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    async fn publish(&self, item: &Item) -> anyhow::Result<Outcome> {
        if let Some(outcome) = self.auth_required() {
            return Ok(outcome);
        }

        // Live Sell API calls are not wired up; listing creation is simulated
        Ok(self.mock_create_listing(item).await)
    }

    async fn update(&self, item: &Item, external_id: &str) -> anyhow::Result<Outcome> {
        if let Some(outcome) = self.auth_required() {
            return Ok(outcome);
        }

        sleep(StdDuration::from_millis(500)).await;
        debug!(item_id = %item.id, external_id, "updated mock eBay listing");

        Ok(Outcome::success(
            external_id.to_string(),
            format!("https://www.ebay.com/itm/{external_id}"),
            "Item successfully updated on eBay".to_string(),
        ))
    }

    async fn remove(&self, external_id: &str) -> anyhow::Result<Outcome> {
        if let Some(outcome) = self.auth_required() {
            return Ok(outcome);
        }

        sleep(StdDuration::from_millis(500)).await;
        debug!(external_id, "removed mock eBay listing");

        Ok(Outcome {
            success: true,
            external_id: None,
            external_url: None,
            message: Some("Item successfully removed from eBay".to_string()),
        })
    }
}
