//! Error Types for the synthUSD Protocol
//!
//! Typed errors with diagnostic payloads. Every failure of a mutating
//! operation is all-or-nothing: the error carries enough context to explain
//! the rejection, and no partial state survives it.

use crate::types::{Address, Amount, AssetId};

/// Result type alias for synthUSD operations
pub type SynthResult<T> = Result<T, SynthError>;

/// Main error enum for all synthUSD protocol errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthError {
    // ============ Validation Errors ============
    /// Zero amount not allowed
    ZeroAmount,

    /// Asset is not part of the registered collateral set
    NotAllowedToken { asset: AssetId },

    /// Collateral and price-feed lists differ in length at construction
    MismatchedConfiguration { assets: usize, feeds: usize },

    /// The same asset appears twice in the construction list
    DuplicateAsset { asset: AssetId },

    /// Invalid address (e.g., zero custody address)
    InvalidAddress {
        /// Description of why the address is invalid
        reason: &'static str,
    },

    /// Invalid input parameter
    InvalidInput {
        param: &'static str,
        reason: &'static str,
    },

    // ============ Authorization Errors ============
    /// Caller is not authorized for this operation
    Unauthorized { expected: Address, actual: Address },

    // ============ Balance Errors ============
    /// Ledger decrement would underflow
    InsufficientBalance { available: Amount, requested: Amount },

    /// Spender's allowance does not cover the requested pull
    InsufficientAllowance { available: Amount, requested: Amount },

    /// Amount exceeds a configured maximum
    ExceedsMaximum { amount: Amount, maximum: Amount },

    // ============ Invariant Violations ============
    /// Acting user's health factor fell below 1.0 after the operation
    HealthFactorBroken { health_factor: Amount },

    // ============ Oracle Errors ============
    /// Feed reported a non-positive price
    InvalidPrice { asset: AssetId },

    /// Quote is older than the staleness timeout
    StalePrice {
        asset: AssetId,
        age_secs: u64,
        max_age_secs: u64,
    },

    /// Submitted price deviates too far from the previous one
    PriceDeviation {
        old_price: u128,
        new_price: u128,
        max_deviation_bps: u128,
    },

    // ============ Collaborator Errors ============
    /// Token collaborator signalled a failed transfer
    TransferFailed {
        from: Address,
        to: Address,
        amount: Amount,
    },

    /// Synthetic token collaborator refused to mint
    MintFailed { to: Address, amount: Amount },

    /// Synthetic token collaborator refused to burn
    BurnFailed { amount: Amount },

    // ============ Liquidation Errors ============
    /// Target position is healthy; nothing to liquidate
    HealthFactorOk { health_factor: Amount },

    /// Target's total collateral value cannot fulfil the seizure target
    InsufficientCollateral {
        required_usd: Amount,
        available_usd: Amount,
    },

    // ============ Reentrancy ============
    /// A guarded operation was re-entered while already active
    Reentrancy,

    // ============ Math Errors ============
    /// Arithmetic overflow occurred
    Overflow,

    /// Division by zero
    DivisionByZero,
}

impl SynthError {
    /// Returns a stable error code for logging/debugging
    pub fn code(&self) -> &'static str {
        match self {
            Self::ZeroAmount => "E001_ZERO_AMOUNT",
            Self::NotAllowedToken { .. } => "E002_NOT_ALLOWED_TOKEN",
            Self::MismatchedConfiguration { .. } => "E003_MISMATCHED_CONFIG",
            Self::DuplicateAsset { .. } => "E004_DUPLICATE_ASSET",
            Self::InvalidAddress { .. } => "E005_INVALID_ADDRESS",
            Self::InvalidInput { .. } => "E006_INVALID_INPUT",
            Self::Unauthorized { .. } => "E007_UNAUTHORIZED",
            Self::InsufficientBalance { .. } => "E010_INSUFFICIENT_BALANCE",
            Self::InsufficientAllowance { .. } => "E011_INSUFFICIENT_ALLOWANCE",
            Self::ExceedsMaximum { .. } => "E012_EXCEEDS_MAXIMUM",
            Self::HealthFactorBroken { .. } => "E020_HEALTH_FACTOR_BROKEN",
            Self::InvalidPrice { .. } => "E030_INVALID_PRICE",
            Self::StalePrice { .. } => "E031_STALE_PRICE",
            Self::PriceDeviation { .. } => "E032_PRICE_DEVIATION",
            Self::TransferFailed { .. } => "E040_TRANSFER_FAILED",
            Self::MintFailed { .. } => "E041_MINT_FAILED",
            Self::BurnFailed { .. } => "E042_BURN_FAILED",
            Self::HealthFactorOk { .. } => "E050_HEALTH_FACTOR_OK",
            Self::InsufficientCollateral { .. } => "E051_INSUFFICIENT_COLLATERAL",
            Self::Reentrancy => "E060_REENTRANCY",
            Self::Overflow => "E080_OVERFLOW",
            Self::DivisionByZero => "E082_DIV_ZERO",
        }
    }

    /// Returns true if this error is recoverable (caller can fix it)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::HealthFactorBroken { .. } => true, // Add collateral or burn debt
            Self::InsufficientBalance { .. } => true, // Reduce the amount
            Self::StalePrice { .. } => true,          // Wait for the feed to resume
            _ => false,
        }
    }
}
