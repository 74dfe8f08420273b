//! Price Oracle Adapter
//!
//! Validates external price quotes and converts between token amounts and
//! USD value. Feeds report prices at 8-decimal scale; the adapter lifts them
//! to the engine's 18-decimal scale.
//!
//! ## Validation asymmetry
//!
//! The two conversion paths deliberately differ in strictness:
//!
//! - [`usd_value`] performs NO positivity or staleness check. It feeds
//!   aggregate valuation (health factors, account summaries), where a
//!   momentarily stale quote is tolerated over halting every read.
//! - [`token_amount_from_usd`] rejects non-positive and stale quotes. It
//!   sizes liquidation seizures, where acting on bad data moves real
//!   collateral.
//!
//! Whether the lenient path should also fail closed is an open question;
//! the current split is carried as-is.
//!
//! Every age evaluation takes the caller-observed current time as an
//! explicit parameter, keeping the adapter deterministic and testable
//! without a real clock.

use crate::constants::fixed_point::{FEED_SCALE_ADJUST, SCALE};
use crate::constants::oracle::STALENESS_TIMEOUT_SECS;
use crate::errors::{SynthError, SynthResult};
use crate::math::mul_div;
use crate::types::{Amount, AssetId, PriceQuote};

/// Read-only price feed capability, one per registered collateral asset.
pub trait PriceFeed {
    /// Latest quote as reported by the feed. Never filtered for staleness;
    /// acceptability is the consumer's decision.
    fn latest_quote(&self) -> PriceQuote;
}

/// USD value of `amount` tokens at the quoted price.
///
/// `price * FEED_SCALE_ADJUST * amount / SCALE`, at 18-decimal scale.
/// The quote is used as-is (see module docs on the validation asymmetry).
pub fn usd_value(quote: &PriceQuote, amount: Amount) -> SynthResult<Amount> {
    let scaled_price = quote
        .price
        .checked_mul(FEED_SCALE_ADJUST)
        .ok_or(SynthError::Overflow)?;
    mul_div(scaled_price, amount, SCALE)
}

/// Token amount worth `usd_amount` at the quoted price.
///
/// Strict path: fails with `InvalidPrice` on a non-positive price and with
/// `StalePrice` when the quote is older than the staleness timeout.
pub fn token_amount_from_usd(
    asset: AssetId,
    quote: &PriceQuote,
    usd_amount: Amount,
    now: u64,
) -> SynthResult<Amount> {
    if !quote.is_positive() {
        return Err(SynthError::InvalidPrice { asset });
    }
    if quote.is_stale(now) {
        return Err(SynthError::StalePrice {
            asset,
            age_secs: quote.age_secs(now),
            max_age_secs: STALENESS_TIMEOUT_SECS,
        });
    }

    let scaled_price = quote
        .price
        .checked_mul(FEED_SCALE_ADJUST)
        .ok_or(SynthError::Overflow)?;
    mul_div(usd_amount, SCALE, scaled_price)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE: u128 = SCALE;
    const PRICE_2000: u128 = 2_000_00000000; // $2,000 at 8 decimals
    const ASSET: AssetId = [7u8; 32];
    const FOUR_HOURS: u64 = 4 * 60 * 60;

    #[test]
    fn test_usd_value() {
        // 10 tokens at $2,000 = $20,000
        let quote = PriceQuote::new(PRICE_2000, 0);
        let value = usd_value(&quote, 10 * ONE).unwrap();
        assert_eq!(value, 20_000 * ONE);
    }

    #[test]
    fn test_usd_value_fractional_amount() {
        // 0.5 tokens at $2,000 = $1,000
        let quote = PriceQuote::new(PRICE_2000, 0);
        let value = usd_value(&quote, ONE / 2).unwrap();
        assert_eq!(value, 1_000 * ONE);
    }

    #[test]
    fn test_token_amount_from_usd() {
        // $100 at $2,000/token = 0.05 tokens
        let quote = PriceQuote::new(PRICE_2000, 100);
        let amount = token_amount_from_usd(ASSET, &quote, 100 * ONE, 100).unwrap();
        assert_eq!(amount, ONE / 20);
    }

    #[test]
    fn test_round_trip_within_tolerance() {
        let quote = PriceQuote::new(PRICE_2000, 100);
        let amount = 3 * ONE + 141_592_653_589_793_238;
        let value = usd_value(&quote, amount).unwrap();
        let back = token_amount_from_usd(ASSET, &quote, value, 100).unwrap();
        // Truncation may lose at most one base unit per conversion
        assert!(amount - back <= 1, "round trip drifted: {amount} -> {back}");
    }

    #[test]
    fn test_stale_quote_rejected_for_sizing_only() {
        // A quote four hours old: rejected by the strict path, still
        // served by the aggregate valuation path.
        let quote = PriceQuote::new(PRICE_2000, 0);
        let now = FOUR_HOURS;

        let err = token_amount_from_usd(ASSET, &quote, 100 * ONE, now).unwrap_err();
        assert_eq!(
            err,
            SynthError::StalePrice {
                asset: ASSET,
                age_secs: FOUR_HOURS,
                max_age_secs: STALENESS_TIMEOUT_SECS,
            }
        );

        assert_eq!(usd_value(&quote, 10 * ONE).unwrap(), 20_000 * ONE);
    }

    #[test]
    fn test_zero_price_rejected_for_sizing() {
        let quote = PriceQuote::new(0, 100);
        let err = token_amount_from_usd(ASSET, &quote, 100 * ONE, 100).unwrap_err();
        assert_eq!(err, SynthError::InvalidPrice { asset: ASSET });
    }

    #[test]
    fn test_quote_at_exact_timeout_still_usable() {
        let quote = PriceQuote::new(PRICE_2000, 0);
        let amount =
            token_amount_from_usd(ASSET, &quote, 2_000 * ONE, STALENESS_TIMEOUT_SECS).unwrap();
        assert_eq!(amount, ONE);
    }
}
