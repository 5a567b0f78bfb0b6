//! Shopify platform adapter
//!
//! Mirrors the eBay adapter's shape: mock outcomes with simulated
//! latency until live Admin API calls are wired up. Product URLs are
//! derived from the item title the way Shopify builds product handles.

use crate::adapters::{mock_latency, short_id};
use crate::core::config::ShopifyConfig;
use crate::core::item::{Item, Outcome};
use crate::core::traits::PlatformAdapter;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// Shopify marketplace adapter
pub struct ShopifyAdapter {
    config: ShopifyConfig,
}

impl ShopifyAdapter {
    pub fn new(config: ShopifyConfig) -> Self {
        Self { config }
    }

    fn shop_domain(&self) -> &str {
        self.config
            .shop_domain
            .as_deref()
            .unwrap_or("your-store.myshopify.com")
    }

    /// Product handle: lowercased title, spaces to hyphens, max 50 chars
    fn handle_for(&self, item: &Item) -> String {
        let handle: String = item.title.to_lowercase().replace(' ', "-");
        handle.chars().take(50).collect()
    }

    fn product_url(&self, item: &Item) -> String {
        format!("https://{}/products/{}", self.shop_domain(), self.handle_for(item))
    }
}

#[async_trait]
impl PlatformAdapter for ShopifyAdapter {
    fn name(&self) -> &str {
        "shopify"
    }

    fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    async fn publish(&self, item: &Item) -> anyhow::Result<Outcome> {
        sleep(mock_latency()).await;

        let product_id = format!("shopify_{}", short_id());
        debug!(item_id = %item.id, %product_id, "created mock Shopify product");

        Ok(Outcome::success(
            product_id,
            self.product_url(item),
            "Product successfully created on Shopify".to_string(),
        ))
    }

    async fn update(&self, item: &Item, external_id: &str) -> anyhow::Result<Outcome> {
        sleep(Duration::from_millis(500)).await;
        debug!(item_id = %item.id, external_id, "updated mock Shopify product");

        Ok(Outcome::success(
            external_id.to_string(),
            self.product_url(item),
            "Product successfully updated on Shopify".to_string(),
        ))
    }

    async fn remove(&self, external_id: &str) -> anyhow::Result<Outcome> {
        sleep(Duration::from_millis(500)).await;
        debug!(external_id, "removed mock Shopify product");

        Ok(Outcome {
            success: true,
            external_id: None,
            external_url: None,
            message: Some("Product successfully removed from Shopify".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;
    use std::collections::HashMap;

    fn item_titled(title: &str) -> Item {
        let mut platforms = HashMap::new();
        platforms.insert("shopify".to_string(), true);
        Item::new(title.to_string(), "description".to_string(), 9.99, 1, platforms)
    }

    #[test]
    fn test_name_and_configured() {
        let adapter = ShopifyAdapter::new(ShopifyConfig::default());
        assert_eq!(adapter.name(), "shopify");
        assert!(!adapter.is_configured());

        let adapter = ShopifyAdapter::new(ShopifyConfig {
            shop_domain: Some("my-store.myshopify.com".to_string()),
            access_token: Some(SecretString::from("shpat_test")),
            api_version: None,
        });
        assert!(adapter.is_configured());
    }

    #[test]
    fn test_handle_derivation() {
        let adapter = ShopifyAdapter::new(ShopifyConfig::default());
        let item = item_titled("Vintage Desk Lamp");
        assert_eq!(adapter.handle_for(&item), "vintage-desk-lamp");

        let long = item_titled(&"a".repeat(80));
        assert_eq!(adapter.handle_for(&long).len(), 50);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_publish_succeeds() {
        let adapter = ShopifyAdapter::new(ShopifyConfig::default());
        let outcome = adapter.publish(&item_titled("Vintage Desk Lamp")).await.unwrap();

        assert!(outcome.success);
        assert!(outcome.external_id.unwrap().starts_with("shopify_"));
        assert!(outcome
            .external_url
            .unwrap()
            .ends_with("/products/vintage-desk-lamp"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_keeps_external_id() {
        let adapter = ShopifyAdapter::new(ShopifyConfig::default());
        let outcome = adapter
            .update(&item_titled("Lamp"), "shopify_abc12345")
            .await
            .unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.external_id.as_deref(), Some("shopify_abc12345"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_reports_success() {
        let adapter = ShopifyAdapter::new(ShopifyConfig::default());
        let outcome = adapter.remove("shopify_abc12345").await.unwrap();
        assert!(outcome.success);
    }
}
