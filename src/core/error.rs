//! Error handling for listing publication
//!
//! This module provides the error taxonomy for publish operations using the
//! thiserror crate. Configuration errors are never retried automatically;
//! transport and rejection errors are safe to retry by re-invoking the
//! publish operation.

use thiserror::Error;

/// Main error type for publish operations
#[derive(Error, Debug)]
pub enum PublishError {
    // Configuration errors
    #[error("unknown platform: {platform}")]
    UnknownPlatform { platform: String },

    #[error("item {item_id} is not enabled for platform {platform}")]
    PlatformNotEnabled { item_id: String, platform: String },

    // Lookup errors
    #[error("item not found: {item_id}")]
    ItemNotFound { item_id: String },

    // Adapter errors
    #[error("[{platform}] transport error: {message}")]
    Transport { platform: String, message: String },

    #[error("[{platform}] listing rejected: {message}")]
    Rejected { platform: String, message: String },

    #[error("[{platform}] adapter call timed out after {seconds}s")]
    Timeout { platform: String, seconds: u64 },

    // Persistence errors
    #[error("store error: {0}")]
    Store(#[from] std::io::Error),
}

impl PublishError {
    /// Check if re-invoking the operation may succeed without a
    /// configuration change
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Rejected { .. } | Self::Timeout { .. } | Self::Store(_)
        )
    }

    /// Configuration errors must never mutate the ledger
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnknownPlatform { .. } | Self::PlatformNotEnabled { .. }
        )
    }

    /// Get error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownPlatform { .. } => "UNKNOWN_PLATFORM",
            Self::PlatformNotEnabled { .. } => "PLATFORM_NOT_ENABLED",
            Self::ItemNotFound { .. } => "ITEM_NOT_FOUND",
            Self::Transport { .. } => "TRANSPORT_ERROR",
            Self::Rejected { .. } => "LISTING_REJECTED",
            Self::Timeout { .. } => "TIMEOUT_ERROR",
            Self::Store(_) => "STORE_ERROR",
        }
    }

    /// Get the platform name associated with this error, if any
    pub fn platform(&self) -> Option<&str> {
        match self {
            Self::UnknownPlatform { platform }
            | Self::PlatformNotEnabled { platform, .. }
            | Self::Transport { platform, .. }
            | Self::Rejected { platform, .. }
            | Self::Timeout { platform, .. } => Some(platform),
            Self::ItemNotFound { .. } | Self::Store(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_platform_error() {
        let error = PublishError::UnknownPlatform {
            platform: "etsy".to_string(),
        };

        assert_eq!(error.platform(), Some("etsy"));
        assert!(!error.is_retryable());
        assert!(error.is_configuration());
        assert_eq!(error.code(), "UNKNOWN_PLATFORM");
    }

    #[test]
    fn test_platform_not_enabled_error() {
        let error = PublishError::PlatformNotEnabled {
            item_id: "item-1".to_string(),
            platform: "shopify".to_string(),
        };

        assert!(error.is_configuration());
        assert!(!error.is_retryable());
        assert_eq!(error.code(), "PLATFORM_NOT_ENABLED");
        let display = error.to_string();
        assert!(display.contains("item-1"));
        assert!(display.contains("shopify"));
    }

    #[test]
    fn test_transport_error_is_retryable() {
        let error = PublishError::Transport {
            platform: "ebay".to_string(),
            message: "connection reset".to_string(),
        };

        assert!(error.is_retryable());
        assert!(!error.is_configuration());
        assert_eq!(error.code(), "TRANSPORT_ERROR");
        assert!(error.to_string().contains("connection reset"));
    }

    #[test]
    fn test_rejected_error_preserves_reason() {
        let error = PublishError::Rejected {
            platform: "ebay".to_string(),
            message: "listing policy violation".to_string(),
        };

        assert!(error.is_retryable());
        assert_eq!(error.code(), "LISTING_REJECTED");
        assert!(error.to_string().contains("listing policy violation"));
    }

    #[test]
    fn test_timeout_error() {
        let error = PublishError::Timeout {
            platform: "shopify".to_string(),
            seconds: 30,
        };

        assert!(error.is_retryable());
        assert_eq!(error.code(), "TIMEOUT_ERROR");
        assert!(error.to_string().contains("30"));
    }

    #[test]
    fn test_item_not_found_error() {
        let error = PublishError::ItemNotFound {
            item_id: "missing".to_string(),
        };

        assert_eq!(error.platform(), None);
        assert!(!error.is_retryable());
        assert_eq!(error.code(), "ITEM_NOT_FOUND");
    }

    #[test]
    fn test_store_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error = PublishError::from(io);

        assert_eq!(error.code(), "STORE_ERROR");
        assert!(error.is_retryable());
    }
}
