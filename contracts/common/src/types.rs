//! Core Types for the synthUSD Protocol
//!
//! Fundamental data structures shared across the engine and its
//! collaborator crates.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::constants::oracle::STALENESS_TIMEOUT_SECS;

/// Type alias for addresses (32-byte hash)
pub type Address = [u8; 32];

/// Type alias for collateral asset identifiers
pub type AssetId = [u8; 32];

/// Fixed-point amount at 18-decimal scale.
///
/// Collateral amounts are carried at the asset's native precision and are
/// NOT normalized to 18 decimals; valuation assumes 18-decimal tokens.
pub type Amount = u128;

// ============ Price Types ============

/// A price observation as reported by a feed.
///
/// Prices are at 8-decimal scale. Whether a quote is acceptable depends on
/// the consumer: aggregate valuation tolerates stale quotes, seizure sizing
/// does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct PriceQuote {
    /// Price in USD at 8-decimal scale
    pub price: u128,
    /// Unix timestamp (seconds) of the feed's last update
    pub updated_at: u64,
}

impl PriceQuote {
    /// Create a new quote
    pub fn new(price: u128, updated_at: u64) -> Self {
        Self { price, updated_at }
    }

    /// Returns true if the reported price is positive
    pub fn is_positive(&self) -> bool {
        self.price > 0
    }

    /// Age of the quote relative to the caller-observed current time.
    ///
    /// A quote stamped in the future has age zero.
    pub fn age_secs(&self, now: u64) -> u64 {
        now.saturating_sub(self.updated_at)
    }

    /// Returns true if the quote is older than the staleness timeout
    pub fn is_stale(&self, now: u64) -> bool {
        self.age_secs(now) > STALENESS_TIMEOUT_SECS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THREE_HOURS: u64 = 10_800;

    #[test]
    fn test_quote_age() {
        let quote = PriceQuote::new(2_000_00000000, 1_000);
        assert_eq!(quote.age_secs(4_600), 3_600);
        // Future-stamped quotes do not underflow
        assert_eq!(quote.age_secs(500), 0);
    }

    #[test]
    fn test_quote_staleness_boundary() {
        let quote = PriceQuote::new(2_000_00000000, 0);
        assert!(!quote.is_stale(THREE_HOURS)); // exactly at the timeout
        assert!(quote.is_stale(THREE_HOURS + 1));
    }

    #[test]
    fn test_zero_price_not_positive() {
        assert!(!PriceQuote::new(0, 0).is_positive());
        assert!(PriceQuote::new(1, 0).is_positive());
    }
}
