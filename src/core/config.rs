//! Configuration for the listing publisher
//!
//! Configuration is loaded from an optional `publisher.toml` file and then
//! overridden by environment variables, so CI and local setups can supply
//! marketplace credentials without writing them to disk. Credential values
//! are held in `secrecy::SecretString` and never logged.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Default configuration file name
pub const CONFIG_FILENAME: &str = "publisher.toml";

/// Default adapter call timeout in seconds
const DEFAULT_ADAPTER_TIMEOUT_SECS: u64 = 30;

/// Root configuration object
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PublisherConfig {
    /// Path of the JSON item store
    pub data_file: PathBuf,

    /// Upper bound on a single adapter call; a stuck platform must not
    /// stall the rest of a bulk job
    pub adapter_timeout_secs: u64,

    /// eBay marketplace credentials
    pub ebay: EbayConfig,

    /// Shopify marketplace credentials
    pub shopify: ShopifyConfig,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("data/items.json"),
            adapter_timeout_secs: DEFAULT_ADAPTER_TIMEOUT_SECS,
            ebay: EbayConfig::default(),
            shopify: ShopifyConfig::default(),
        }
    }
}

/// eBay API settings
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EbayConfig {
    pub app_id: Option<String>,

    /// For OAuth the Cert ID acts as the client secret
    pub cert_id: Option<SecretString>,

    /// RuName registered in the eBay developer account
    pub redirect_uri: Option<String>,

    pub sandbox: Option<bool>,
}

impl EbayConfig {
    /// All credentials required to talk to the live API are present
    pub fn is_configured(&self) -> bool {
        fn present(value: &Option<String>) -> bool {
            value.as_deref().is_some_and(|v| !v.trim().is_empty())
        }

        present(&self.app_id)
            && self
                .cert_id
                .as_ref()
                .is_some_and(|s| !s.expose_secret().trim().is_empty())
            && present(&self.redirect_uri)
    }

    pub fn sandbox(&self) -> bool {
        self.sandbox.unwrap_or(true)
    }

    /// Base URL for eBay RESTful APIs
    pub fn api_base_url(&self) -> &'static str {
        if self.sandbox() {
            "https://api.sandbox.ebay.com"
        } else {
            "https://api.ebay.com"
        }
    }
}

/// Shopify API settings
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ShopifyConfig {
    pub shop_domain: Option<String>,

    pub access_token: Option<SecretString>,

    pub api_version: Option<String>,
}

impl ShopifyConfig {
    pub fn is_configured(&self) -> bool {
        self.shop_domain
            .as_deref()
            .is_some_and(|d| !d.trim().is_empty())
            && self
                .access_token
                .as_ref()
                .is_some_and(|t| !t.expose_secret().trim().is_empty())
    }

    pub fn api_version(&self) -> &str {
        self.api_version.as_deref().unwrap_or("2024-01")
    }

    /// Admin API base URL for the configured shop
    pub fn base_url(&self) -> String {
        format!(
            "https://{}/admin/api/{}",
            self.shop_domain.as_deref().unwrap_or("your-store.myshopify.com"),
            self.api_version()
        )
    }
}

impl PublisherConfig {
    /// Load configuration from a TOML file, then apply environment
    /// variable overrides
    ///
    /// A missing file is not an error; defaults are used so the publisher
    /// can run with mock adapters out of the box.
    pub async fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();

        let mut config = if fs::metadata(path).await.is_ok() {
            let content = fs::read_to_string(path).await?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };

        config.apply_env();
        Ok(config)
    }

    /// Apply environment variable overrides (highest priority)
    fn apply_env(&mut self) {
        if let Ok(v) = env::var("EBAY_APP_ID") {
            self.ebay.app_id = Some(v);
        }
        if let Ok(v) = env::var("EBAY_CERT_ID") {
            self.ebay.cert_id = Some(SecretString::from(v));
        }
        if let Ok(v) = env::var("EBAY_REDIRECT_URI") {
            self.ebay.redirect_uri = Some(v);
        }
        if let Ok(v) = env::var("EBAY_SANDBOX") {
            self.ebay.sandbox = v.parse().ok();
        }
        if let Ok(v) = env::var("SHOPIFY_SHOP_DOMAIN") {
            self.shopify.shop_domain = Some(v);
        }
        if let Ok(v) = env::var("SHOPIFY_ACCESS_TOKEN") {
            self.shopify.access_token = Some(SecretString::from(v));
        }
        if let Ok(v) = env::var("SHOPIFY_API_VERSION") {
            self.shopify.api_version = Some(v);
        }
    }
}
