//! Platform Registry - maps platform names to adapter instances
//!
//! The registry is the extensibility seam: the orchestrator resolves
//! adapters by name and never contains platform-specific logic. Lookup
//! is case-insensitive; unknown names are rejected with a configuration
//! error.

use crate::adapters::{EbayAdapter, ShopifyAdapter};
use crate::core::config::PublisherConfig;
use crate::core::error::PublishError;
use crate::core::traits::PlatformAdapter;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Connection status for one registered platform
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PlatformHealth {
    pub configured: bool,
}

/// Name -> adapter lookup table
#[derive(Default)]
pub struct PlatformRegistry {
    adapters: HashMap<String, Arc<dyn PlatformAdapter>>,
}

impl PlatformRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in marketplace adapters
    pub fn from_config(config: PublisherConfig) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(EbayAdapter::new(config.ebay)));
        registry.register(Arc::new(ShopifyAdapter::new(config.shopify)));
        registry
    }

    /// Register an adapter under its own name
    ///
    /// Re-registering a name replaces the previous adapter, which is how
    /// tests substitute doubles for the built-ins.
    pub fn register(&mut self, adapter: Arc<dyn PlatformAdapter>) {
        self.adapters
            .insert(adapter.name().to_lowercase(), adapter);
    }

    /// Resolve a platform name, case-insensitively
    pub fn resolve(&self, platform: &str) -> Result<Arc<dyn PlatformAdapter>, PublishError> {
        self.adapters
            .get(&platform.to_lowercase())
            .cloned()
            .ok_or_else(|| PublishError::UnknownPlatform {
                platform: platform.to_string(),
            })
    }

    /// Registered platform names, sorted for stable output
    pub fn platforms(&self) -> Vec<String> {
        let mut names: Vec<String> = self.adapters.keys().cloned().collect();
        names.sort();
        names
    }

    /// Configuration status per registered platform
    pub fn health(&self) -> HashMap<String, PlatformHealth> {
        self.adapters
            .iter()
            .map(|(name, adapter)| {
                (
                    name.clone(),
                    PlatformHealth {
                        configured: adapter.is_configured(),
                    },
                )
            })
            .collect()
    }
}
