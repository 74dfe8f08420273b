//! Protocol Constants
//!
//! All magic numbers and configuration values for the synthUSD engine.
//! The collateralization parameters follow the 200%-overcollateralized,
//! 10%-bonus model: a position is liquidatable once its discounted
//! collateral value no longer covers its debt.

/// Token Metadata
pub mod token {
    /// Token name
    pub const NAME: &str = "synthUSD";
    /// Token symbol
    pub const SYMBOL: &str = "sUSD";
    /// Decimal places (18, matching engine amounts)
    pub const DECIMALS: u8 = 18;
    /// One unit with decimals (1 sUSD = 1e18 base units)
    pub const ONE: u128 = 1_000_000_000_000_000_000;
    /// Maximum supply (10 billion sUSD)
    pub const MAX_SUPPLY: u128 = 10_000_000_000 * ONE;
}

/// Fixed-point scales
pub mod fixed_point {
    /// Engine amount scale (18 decimals)
    pub const SCALE: u128 = 1_000_000_000_000_000_000;

    /// Price feed scale (8 decimals)
    pub const FEED_PRECISION: u128 = 100_000_000;

    /// Multiplier lifting an 8-decimal feed price to the 18-decimal scale
    pub const FEED_SCALE_ADJUST: u128 = 10_000_000_000;
}

/// Collateralization Ratios (in percentage points)
pub mod ratios {
    use super::fixed_point::SCALE;

    /// Liquidation threshold: only 50% of collateral value counts towards
    /// the health factor, so positions must stay 200% overcollateralized
    pub const LIQUIDATION_THRESHOLD_PCT: u128 = 50;

    /// Percentage denominator
    pub const PERCENT_PRECISION: u128 = 100;

    /// Extra collateral value awarded to liquidators (10%)
    pub const LIQUIDATION_BONUS_PCT: u128 = 10;

    /// At most half of a position's debt may be repaid per liquidation call
    pub const MAX_CLOSE_FACTOR_PCT: u128 = 50;

    /// Health factor floor; at or above this a position is healthy
    pub const MIN_HEALTH_FACTOR: u128 = SCALE;
}

/// Oracle Configuration
pub mod oracle {
    /// Maximum quote age before the strict conversion path rejects it
    pub const STALENESS_TIMEOUT_SECS: u64 = 3 * 60 * 60;

    /// Price precision (8 decimals)
    pub const PRICE_DECIMALS: u8 = 8;
}

/// Liquidation Configuration
pub mod liquidation {
    /// Minimum fraction of the seizure target that must be collected,
    /// in basis points (99.99% — tolerates only rounding loss)
    pub const SEIZURE_TOLERANCE_BPS: u128 = 9_999;
}

/// Precision constants
pub mod precision {
    /// Basis points denominator
    pub const BPS_DENOMINATOR: u128 = 10_000;
}
