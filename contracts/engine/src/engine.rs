//! Engine Entry Points
//!
//! The accounting core of the protocol. Every mutating operation runs as
//! one atomic unit: acquire the reentrancy guard, snapshot the ledger, and
//! on any failure restore the snapshot and unwind the external token calls
//! already made. No partial commits exist anywhere.
//!
//! The engine owns the ledger and the registered-asset configuration; the
//! collateral tokens, the synthetic token, and the price feeds are external
//! collaborators reached through capability handles.

use std::cell::{Ref, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use synthusd_common::{
    check,
    collaborators::{CollateralToken, SyntheticToken},
    constants::ratios::{
        LIQUIDATION_BONUS_PCT, MAX_CLOSE_FACTOR_PCT, MIN_HEALTH_FACTOR, PERCENT_PRECISION,
    },
    errors::{SynthError, SynthResult},
    events::{EventLog, SynthEvent},
    math::{self, mul_div, safe_add},
    oracle::{self, PriceFeed},
    types::{Address, Amount, AssetId, PriceQuote},
    validation::require_positive,
};

use crate::guard::ReentrancyGuard;
use crate::ledger::Ledger;

// ============ Configuration ============

/// A collateral asset and its token handle, as passed at construction
pub struct CollateralSpec {
    pub asset: AssetId,
    pub token: Rc<dyn CollateralToken>,
}

/// Registered collateral entry: token handle plus its price feed
pub(crate) struct RegisteredAsset {
    pub(crate) token: Rc<dyn CollateralToken>,
    pub(crate) feed: Rc<dyn PriceFeed>,
}

// ============ Undo Journal ============

/// Inverse of an external token call already made in this operation
enum Undo {
    /// Collateral was pulled into custody; send it back
    PulledCollateral {
        token: Rc<dyn CollateralToken>,
        from: Address,
        amount: Amount,
    },
    /// Collateral was paid out of custody; reclaim it
    PaidCollateral {
        token: Rc<dyn CollateralToken>,
        to: Address,
        amount: Amount,
    },
    /// Synthetic tokens were pulled into custody; send them back
    PulledSynth { from: Address, amount: Amount },
    /// Synthetic tokens were burned; mint them back into custody
    BurnedSynth { amount: Amount },
}

/// Journal of completed external calls, replayed in reverse on failure.
///
/// Unwinding is best-effort: a collaborator that accepted the forward call
/// but refuses its inverse has broken the token contract, and the result
/// flags of the inverse calls are deliberately not consulted.
#[derive(Default)]
pub(crate) struct Journal {
    entries: Vec<Undo>,
}

impl Journal {
    fn record(&mut self, entry: Undo) {
        self.entries.push(entry);
    }

    fn unwind(self, synth: &Rc<dyn SyntheticToken>, custody: Address) {
        for entry in self.entries.into_iter().rev() {
            match entry {
                Undo::PulledCollateral {
                    token,
                    from,
                    amount,
                } => {
                    token.transfer(custody, from, amount);
                }
                Undo::PaidCollateral { token, to, amount } => {
                    token.transfer_from(to, custody, amount);
                }
                Undo::PulledSynth { from, amount } => {
                    synth.transfer(custody, from, amount);
                }
                Undo::BurnedSynth { amount } => {
                    synth.mint(custody, amount);
                }
            }
        }
    }
}

/// Working state of one in-flight operation
pub(crate) struct OpCtx<'a> {
    pub(crate) ledger: &'a mut Ledger,
    pub(crate) events: EventLog,
    pub(crate) journal: Journal,
}

// ============ Engine ============

/// The synthUSD accounting-and-liquidation engine.
///
/// Construction fixes the collateral registry: an ordered asset list paired
/// 1:1 with price feeds. The order is significant — liquidation iterates
/// assets deterministically in this order. No assets can be added or
/// removed afterwards.
pub struct Engine {
    pub(crate) custody: Address,
    pub(crate) assets: Vec<AssetId>,
    pub(crate) registry: HashMap<AssetId, RegisteredAsset>,
    pub(crate) synth: Rc<dyn SyntheticToken>,
    pub(crate) ledger: RefCell<Ledger>,
    events: RefCell<EventLog>,
    guard: ReentrancyGuard,
}

impl Engine {
    /// Create an engine over the given collateral set.
    ///
    /// # Errors
    /// `InvalidAddress` for a zero custody address,
    /// `MismatchedConfiguration` if the asset and feed lists differ in
    /// length, `DuplicateAsset` if an asset id repeats.
    pub fn new(
        custody: Address,
        collateral: Vec<CollateralSpec>,
        feeds: Vec<Rc<dyn PriceFeed>>,
        synth: Rc<dyn SyntheticToken>,
    ) -> SynthResult<Self> {
        if custody == [0u8; 32] {
            return Err(SynthError::InvalidAddress {
                reason: "custody cannot be zero address",
            });
        }
        if collateral.len() != feeds.len() {
            return Err(SynthError::MismatchedConfiguration {
                assets: collateral.len(),
                feeds: feeds.len(),
            });
        }

        let mut assets = Vec::with_capacity(collateral.len());
        let mut registry = HashMap::with_capacity(collateral.len());
        for (spec, feed) in collateral.into_iter().zip(feeds) {
            if registry.contains_key(&spec.asset) {
                return Err(SynthError::DuplicateAsset { asset: spec.asset });
            }
            assets.push(spec.asset);
            registry.insert(
                spec.asset,
                RegisteredAsset {
                    token: spec.token,
                    feed,
                },
            );
        }

        Ok(Self {
            custody,
            assets,
            registry,
            synth,
            ledger: RefCell::new(Ledger::new()),
            events: RefCell::new(EventLog::new()),
            guard: ReentrancyGuard::new(),
        })
    }

    // ============ Mutating Entry Points ============

    /// Deposit collateral into the caller's position
    pub fn deposit_collateral(
        &self,
        user: Address,
        asset: AssetId,
        amount: Amount,
    ) -> SynthResult<()> {
        self.execute(|ctx| self.deposit_inner(ctx, user, asset, amount))
    }

    /// Deposit collateral and mint debt against it in one atomic unit
    pub fn deposit_collateral_and_mint_debt(
        &self,
        user: Address,
        asset: AssetId,
        amount: Amount,
        debt: Amount,
    ) -> SynthResult<()> {
        self.execute(|ctx| {
            self.deposit_inner(ctx, user, asset, amount)?;
            self.mint_inner(ctx, user, debt)
        })
    }

    /// Withdraw collateral; the position must stay healthy
    pub fn redeem_collateral(
        &self,
        user: Address,
        asset: AssetId,
        amount: Amount,
    ) -> SynthResult<()> {
        self.execute(|ctx| {
            self.redeem_inner(ctx, user, user, asset, amount)?;
            self.require_healthy(ctx.ledger, user)
        })
    }

    /// Burn debt and withdraw collateral in one atomic unit
    pub fn redeem_collateral_for_debt(
        &self,
        user: Address,
        asset: AssetId,
        amount: Amount,
        debt: Amount,
    ) -> SynthResult<()> {
        self.execute(|ctx| {
            self.burn_inner(ctx, user, user, debt)?;
            self.redeem_inner(ctx, user, user, asset, amount)?;
            self.require_healthy(ctx.ledger, user)
        })
    }

    /// Mint synthetic debt against the caller's collateral
    pub fn mint_debt(&self, user: Address, amount: Amount) -> SynthResult<()> {
        self.execute(|ctx| self.mint_inner(ctx, user, amount))
    }

    /// Repay debt by burning the caller's synthetic tokens
    pub fn burn_debt(&self, user: Address, amount: Amount) -> SynthResult<()> {
        self.execute(|ctx| {
            self.burn_inner(ctx, user, user, amount)?;
            // Burning only improves the health factor; re-validated anyway
            self.require_healthy(ctx.ledger, user)
        })
    }

    /// Liquidate an under-collateralized position.
    ///
    /// The liquidator repays up to half of the target's debt and receives
    /// collateral worth the repayment plus a 10% bonus, seized
    /// proportionally across the target's assets. `now` is the
    /// caller-observed current time used for quote staleness.
    pub fn liquidate(
        &self,
        liquidator: Address,
        user: Address,
        debt_to_cover: Amount,
        now: u64,
    ) -> SynthResult<Amount> {
        self.execute(|ctx| {
            require_positive(debt_to_cover)?;

            let starting_hf = self.health_factor_in(ctx.ledger, user)?;
            check!(
                starting_hf < MIN_HEALTH_FACTOR,
                SynthError::HealthFactorOk {
                    health_factor: starting_hf,
                }
            );

            // At most half of the current debt per call
            let max_cover = mul_div(
                ctx.ledger.debt_of(user),
                MAX_CLOSE_FACTOR_PCT,
                PERCENT_PRECISION,
            )?;
            let actual_cover = debt_to_cover.min(max_cover);
            require_positive(actual_cover)?;

            let bonus = mul_div(actual_cover, LIQUIDATION_BONUS_PCT, PERCENT_PRECISION)?;
            let target_usd = safe_add(actual_cover, bonus)?;

            let seized_usd = self.seize_collateral(ctx, user, liquidator, target_usd, now)?;
            self.burn_inner(ctx, user, liquidator, actual_cover)?;

            ctx.events.emit(SynthEvent::PositionLiquidated {
                user,
                liquidator,
                debt_covered: actual_cover,
                value_seized_usd: seized_usd,
            });

            self.require_healthy(ctx.ledger, liquidator)?;
            Ok(seized_usd)
        })
    }

    // ============ Operation Bodies ============

    fn deposit_inner(
        &self,
        ctx: &mut OpCtx<'_>,
        user: Address,
        asset: AssetId,
        amount: Amount,
    ) -> SynthResult<()> {
        require_positive(amount)?;
        let token = self.registered(asset)?.token.clone();

        ctx.ledger.credit_collateral(user, asset, amount)?;

        check!(
            token.transfer_from(user, self.custody, amount),
            SynthError::TransferFailed {
                from: user,
                to: self.custody,
                amount,
            }
        );
        ctx.journal.record(Undo::PulledCollateral {
            token,
            from: user,
            amount,
        });

        ctx.events.emit(SynthEvent::CollateralDeposited {
            user,
            asset,
            amount,
        });
        Ok(())
    }

    /// Debit `from`'s position and pay the tokens out of custody to `to`.
    /// Liquidation routes seizures through here with `to` = liquidator.
    pub(crate) fn redeem_inner(
        &self,
        ctx: &mut OpCtx<'_>,
        from: Address,
        to: Address,
        asset: AssetId,
        amount: Amount,
    ) -> SynthResult<()> {
        require_positive(amount)?;
        let token = self.registered(asset)?.token.clone();

        ctx.ledger.debit_collateral(from, asset, amount)?;

        check!(
            token.transfer(self.custody, to, amount),
            SynthError::TransferFailed {
                from: self.custody,
                to,
                amount,
            }
        );
        ctx.journal.record(Undo::PaidCollateral { token, to, amount });

        ctx.events.emit(SynthEvent::CollateralRedeemed {
            from,
            to,
            asset,
            amount,
        });
        Ok(())
    }

    fn mint_inner(&self, ctx: &mut OpCtx<'_>, user: Address, amount: Amount) -> SynthResult<()> {
        require_positive(amount)?;

        ctx.ledger.increase_debt(user, amount)?;
        self.require_healthy(ctx.ledger, user)?;

        // Final collaborator call of the operation; nothing after it can
        // fail, so it needs no journal entry
        check!(
            self.synth.mint(user, amount),
            SynthError::MintFailed { to: user, amount }
        );

        ctx.events.emit(SynthEvent::DebtMinted { user, amount });
        Ok(())
    }

    /// Clear `amount` of `on_behalf_of`'s debt, funded by pulling and
    /// destroying the payer's synthetic tokens
    fn burn_inner(
        &self,
        ctx: &mut OpCtx<'_>,
        on_behalf_of: Address,
        payer: Address,
        amount: Amount,
    ) -> SynthResult<()> {
        require_positive(amount)?;

        ctx.ledger.decrease_debt(on_behalf_of, amount)?;

        check!(
            self.synth.transfer_from(payer, self.custody, amount),
            SynthError::TransferFailed {
                from: payer,
                to: self.custody,
                amount,
            }
        );
        ctx.journal.record(Undo::PulledSynth {
            from: payer,
            amount,
        });

        check!(self.synth.burn(amount), SynthError::BurnFailed { amount });
        ctx.journal.record(Undo::BurnedSynth { amount });

        ctx.events.emit(SynthEvent::DebtBurned {
            on_behalf_of,
            payer,
            amount,
        });
        Ok(())
    }

    // ============ Atomic Execution ============

    /// Run a mutating operation as one all-or-nothing unit.
    ///
    /// Guard, snapshot, run; commit events on success, restore the snapshot
    /// and unwind external calls on failure.
    fn execute<T>(&self, f: impl FnOnce(&mut OpCtx<'_>) -> SynthResult<T>) -> SynthResult<T> {
        let _permit = self.guard.enter()?;

        let mut ledger = self.ledger.borrow_mut();
        let snapshot = ledger.clone();
        let mut ctx = OpCtx {
            ledger: &mut ledger,
            events: EventLog::new(),
            journal: Journal::default(),
        };

        let result = f(&mut ctx);
        let OpCtx {
            events, journal, ..
        } = ctx;

        match result {
            Ok(value) => {
                self.events.borrow_mut().extend(events);
                Ok(value)
            }
            Err(err) => {
                *ledger = snapshot;
                journal.unwind(&self.synth, self.custody);
                Err(err)
            }
        }
    }

    // ============ Valuation Helpers ============

    pub(crate) fn registered(&self, asset: AssetId) -> SynthResult<&RegisteredAsset> {
        self.registry
            .get(&asset)
            .ok_or(SynthError::NotAllowedToken { asset })
    }

    pub(crate) fn quote(&self, asset: AssetId) -> SynthResult<PriceQuote> {
        Ok(self.registered(asset)?.feed.latest_quote())
    }

    /// Total USD value of a user's collateral, over every registered asset
    /// including zero balances. Recomputed fresh on every call — never
    /// cached, so it always reflects current prices and ledger state.
    fn collateral_value_in(&self, ledger: &Ledger, user: Address) -> SynthResult<Amount> {
        let mut total = 0u128;
        for asset in &self.assets {
            let quote = self.quote(*asset)?;
            let value = oracle::usd_value(&quote, ledger.collateral_of(user, *asset))?;
            total = safe_add(total, value)?;
        }
        Ok(total)
    }

    fn health_factor_in(&self, ledger: &Ledger, user: Address) -> SynthResult<Amount> {
        let collateral_value = self.collateral_value_in(ledger, user)?;
        Ok(math::health_factor(collateral_value, ledger.debt_of(user)))
    }

    pub(crate) fn require_healthy(&self, ledger: &Ledger, user: Address) -> SynthResult<()> {
        let hf = self.health_factor_in(ledger, user)?;
        check!(
            hf >= MIN_HEALTH_FACTOR,
            SynthError::HealthFactorBroken { health_factor: hf }
        );
        Ok(())
    }

    // ============ Read Operations ============

    /// USD value of `amount` of `asset` at the current quote (lenient path)
    pub fn usd_value(&self, asset: AssetId, amount: Amount) -> SynthResult<Amount> {
        oracle::usd_value(&self.quote(asset)?, amount)
    }

    /// Token amount of `asset` worth `usd_amount` (strict path)
    pub fn token_amount_from_usd(
        &self,
        asset: AssetId,
        usd_amount: Amount,
        now: u64,
    ) -> SynthResult<Amount> {
        oracle::token_amount_from_usd(asset, &self.quote(asset)?, usd_amount, now)
    }

    /// (debt, total collateral value in USD) of a user
    pub fn account_information(&self, user: Address) -> SynthResult<(Amount, Amount)> {
        let ledger = self.ledger_ref()?;
        let collateral_value = self.collateral_value_in(&ledger, user)?;
        Ok((ledger.debt_of(user), collateral_value))
    }

    /// Total collateral value of a user in USD
    pub fn account_collateral_value(&self, user: Address) -> SynthResult<Amount> {
        let ledger = self.ledger_ref()?;
        self.collateral_value_in(&ledger, user)
    }

    /// Current health factor of a user
    pub fn health_factor_of(&self, user: Address) -> SynthResult<Amount> {
        let ledger = self.ledger_ref()?;
        self.health_factor_in(&ledger, user)
    }

    /// Collateral balance of a user in one asset
    pub fn collateral_balance_of(&self, user: Address, asset: AssetId) -> SynthResult<Amount> {
        self.registered(asset)?;
        Ok(self.ledger_ref()?.collateral_of(user, asset))
    }

    /// Debt balance of a user
    pub fn debt_of(&self, user: Address) -> SynthResult<Amount> {
        Ok(self.ledger_ref()?.debt_of(user))
    }

    /// Registered collateral assets, in their fixed configured order
    pub fn collateral_tokens(&self) -> &[AssetId] {
        &self.assets
    }

    /// Price feed handle for a registered asset
    pub fn price_feed(&self, asset: AssetId) -> SynthResult<Rc<dyn PriceFeed>> {
        Ok(self.registered(asset)?.feed.clone())
    }

    /// Token handle for a registered asset
    pub fn collateral_token(&self, asset: AssetId) -> SynthResult<Rc<dyn CollateralToken>> {
        Ok(self.registered(asset)?.token.clone())
    }

    /// The synthetic debt token handle
    pub fn synthetic_token(&self) -> Rc<dyn SyntheticToken> {
        self.synth.clone()
    }

    /// The engine's custody address
    pub fn custody(&self) -> Address {
        self.custody
    }

    /// Copy of the events emitted so far
    pub fn events(&self) -> SynthResult<EventLog> {
        self.events
            .try_borrow()
            .map(|log| log.clone())
            .map_err(|_| SynthError::Reentrancy)
    }

    /// Copy of the full ledger, for persistence or inspection
    pub fn ledger_snapshot(&self) -> SynthResult<Ledger> {
        Ok(self.ledger_ref()?.clone())
    }

    fn ledger_ref(&self) -> SynthResult<Ref<'_, Ledger>> {
        self.ledger.try_borrow().map_err(|_| SynthError::Reentrancy)
    }
}
