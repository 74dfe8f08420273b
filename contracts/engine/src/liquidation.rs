//! Proportional Multi-Asset Seizure
//!
//! Seizing from a single collateral type can spuriously fail when the
//! target's holdings of that one type fall short of the seizure value, even
//! though their total collateral is ample. Spreading the claim across every
//! asset the target holds, weighted by each asset's share of total value,
//! removes that false negative at the cost of one pass over the registered
//! asset list.
//!
//! Two valuation passes run per liquidation: one to weight the shares, one
//! per-asset at execution time to size and account the actual transfer.
//! Prices can move between them, so the computed token amount is clamped to
//! the target's live balance and progress is tracked by the value actually
//! moved, post-truncation.
//!
//! Known edge case: for severely unhealthy positions (health factor below
//! roughly 0.55) the liquidator's bonus removes more value than the debt
//! reduction offsets, so a single pass can leave the target's health factor
//! worse than before. Repeated liquidations still converge the position
//! toward solvency or collateral exhaustion, which is the accepted
//! behavior.

use synthusd_common::{
    check,
    constants::liquidation::SEIZURE_TOLERANCE_BPS,
    constants::precision::BPS_DENOMINATOR,
    errors::{SynthError, SynthResult},
    math::{mul_div, safe_add},
    oracle,
    types::{Address, Amount},
};

use crate::engine::{Engine, OpCtx};

impl Engine {
    /// Seize collateral worth `target_usd` from `user` to `liquidator`.
    ///
    /// Iterates registered assets in their fixed configured order, skipping
    /// zero balances. Every non-last asset contributes its proportional
    /// share of the target; the last one is assigned the residual so
    /// rounding error cannot leave the target unmet. Returns the USD value
    /// actually transferred.
    pub(crate) fn seize_collateral(
        &self,
        ctx: &mut OpCtx<'_>,
        user: Address,
        liquidator: Address,
        target_usd: Amount,
        now: u64,
    ) -> SynthResult<Amount> {
        // Weighting pass over the full holdings
        let mut holdings = Vec::new();
        let mut total_value = 0u128;
        for asset in &self.assets {
            let balance = ctx.ledger.collateral_of(user, *asset);
            if balance == 0 {
                continue;
            }
            let value = oracle::usd_value(&self.quote(*asset)?, balance)?;
            holdings.push((*asset, value));
            total_value = safe_add(total_value, value)?;
        }
        check!(
            total_value >= target_usd,
            SynthError::InsufficientCollateral {
                required_usd: target_usd,
                available_usd: total_value,
            }
        );

        // Execution pass; holdings is non-empty since target_usd > 0
        let mut seized_usd = 0u128;
        let last = holdings.len() - 1;
        for (index, (asset, value)) in holdings.iter().enumerate() {
            let share_usd = if index == last {
                // Residual absorbs the rounding error of the earlier shares
                target_usd.saturating_sub(seized_usd)
            } else {
                mul_div(*value, target_usd, total_value)?
            };
            if share_usd == 0 {
                continue;
            }

            // Sizing a seizure is strict: a stale or non-positive quote
            // aborts the liquidation
            let quote = self.quote(*asset)?;
            let amount = oracle::token_amount_from_usd(*asset, &quote, share_usd, now)?
                .min(ctx.ledger.collateral_of(user, *asset));
            if amount == 0 {
                continue;
            }

            self.redeem_inner(ctx, user, liquidator, *asset, amount)?;

            seized_usd = safe_add(seized_usd, oracle::usd_value(&quote, amount)?)?;
            if seized_usd >= target_usd {
                break;
            }
        }

        let floor = mul_div(target_usd, SEIZURE_TOLERANCE_BPS, BPS_DENOMINATOR)?;
        check!(
            seized_usd >= floor,
            SynthError::InsufficientCollateral {
                required_usd: target_usd,
                available_usd: seized_usd,
            }
        );
        Ok(seized_usd)
    }
}
