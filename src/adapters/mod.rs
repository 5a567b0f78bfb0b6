//! Marketplace platform adapters
//!
//! One adapter per marketplace, all behind the `PlatformAdapter` trait,
//! resolved by name through the `PlatformRegistry`. Adding a marketplace
//! means writing a new adapter and registering it; the orchestration
//! core stays untouched.

pub mod ebay;
pub mod registry;
pub mod shopify;

pub use ebay::EbayAdapter;
pub use registry::{PlatformHealth, PlatformRegistry};
pub use shopify::ShopifyAdapter;

use std::time::Duration;
use uuid::Uuid;

/// Simulated network latency for mock listing calls, 1-3 seconds
///
/// Jitter is derived from fresh UUID bytes so mock calls vary per
/// invocation without carrying an RNG dependency.
pub(crate) fn mock_latency() -> Duration {
    let bytes = *Uuid::new_v4().as_bytes();
    let jitter = u64::from(u16::from_be_bytes([bytes[0], bytes[1]])) % 2000;
    Duration::from_millis(1000 + jitter)
}

/// Short external id suffix for mock listings
pub(crate) fn short_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_latency_is_bounded() {
        for _ in 0..100 {
            let latency = mock_latency();
            assert!(latency >= Duration::from_millis(1000));
            assert!(latency < Duration::from_millis(3000));
        }
    }

    #[test]
    fn test_short_id_length() {
        let id = short_id();
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
