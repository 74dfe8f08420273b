//! Mathematical Utilities for the synthUSD Protocol
//!
//! Fixed-point helpers and the health-factor calculation. All products of
//! two 18-decimal amounts go through 256-bit intermediates; results that do
//! not fit back into 128 bits surface as `Overflow` rather than wrapping.

use primitive_types::U256;

use crate::constants::ratios::{
    LIQUIDATION_THRESHOLD_PCT, MIN_HEALTH_FACTOR, PERCENT_PRECISION,
};
use crate::constants::fixed_point::SCALE;
use crate::errors::{SynthError, SynthResult};
use crate::types::Amount;

/// Computes `a * b / denom` with a 256-bit intermediate product.
///
/// # Errors
/// `DivisionByZero` if `denom == 0`; `Overflow` if the result exceeds u128.
pub fn mul_div(a: Amount, b: Amount, denom: Amount) -> SynthResult<Amount> {
    if denom == 0 {
        return Err(SynthError::DivisionByZero);
    }

    // Two u128 factors always fit in 256 bits
    let result = U256::from(a) * U256::from(b) / U256::from(denom);

    if result > U256::from(u128::MAX) {
        return Err(SynthError::Overflow);
    }
    Ok(result.as_u128())
}

/// Safe addition with overflow check
pub fn safe_add(a: Amount, b: Amount) -> SynthResult<Amount> {
    a.checked_add(b).ok_or(SynthError::Overflow)
}

/// Safe subtraction with underflow check
pub fn safe_sub(a: Amount, b: Amount) -> SynthResult<Amount> {
    a.checked_sub(b).ok_or(SynthError::InsufficientBalance {
        available: a,
        requested: b,
    })
}

/// Calculate the health factor of a position.
///
/// `(collateral_value_usd * 50 / 100) * 1e18 / debt`, i.e. the discounted
/// collateral value per unit of debt at 18-decimal scale.
///
/// Zero debt yields the maximum representable value, as does a ratio too
/// large to represent: both mean the position cannot be liquidated.
pub fn health_factor(collateral_value_usd: Amount, debt: Amount) -> Amount {
    if debt == 0 {
        return Amount::MAX;
    }

    let adjusted = match mul_div(
        collateral_value_usd,
        LIQUIDATION_THRESHOLD_PCT,
        PERCENT_PRECISION,
    ) {
        Ok(v) => v,
        Err(_) => return Amount::MAX,
    };

    match mul_div(adjusted, SCALE, debt) {
        Ok(hf) => hf,
        Err(_) => Amount::MAX,
    }
}

/// Returns true if the health factor meets the minimum
pub fn is_healthy(health_factor: Amount) -> bool {
    health_factor >= MIN_HEALTH_FACTOR
}
