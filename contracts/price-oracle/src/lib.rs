//! Reference Price Feeds
//!
//! Feed implementations of the [`PriceFeed`] capability consumed by the
//! synthUSD engine. The engine treats feeds as read-only collaborators;
//! these implementations cover the push-updated operator model used in
//! deployments and a freely settable feed for tests.
//!
//! A feed never filters its own quote for staleness: it serves whatever it
//! last saw, and the consumer decides whether the quote's age is acceptable.
//! A feed that stops receiving submissions therefore makes the engine's
//! strict conversion path fail closed, which is the intended behavior.

use std::cell::RefCell;

use synthusd_common::{
    errors::{SynthError, SynthResult},
    oracle::PriceFeed,
    types::{Address, PriceQuote},
};

/// Maximum allowed move between consecutive submissions (15%, in BPS)
pub const MAX_PRICE_DEVIATION_BPS: u128 = 1_500;

/// Basis points denominator
const BPS_DENOMINATOR: u128 = 10_000;

// ============ Operator Feed ============

/// Mutable feed state behind the interior-mutability boundary
#[derive(Debug, Clone)]
struct FeedState {
    operator: Address,
    quote: PriceQuote,
}

/// A push-updated feed with a trusted operator.
///
/// The operator submits `(price, timestamp)` observations; the admin can
/// rotate the operator. Submissions are validated (authorization, positive
/// price, monotonic timestamp, bounded deviation) but reads never are.
#[derive(Debug)]
pub struct OperatorFeed {
    admin: Address,
    state: RefCell<FeedState>,
}

impl OperatorFeed {
    /// Create a feed with no quote yet (price zero, timestamp zero).
    ///
    /// The first submission is exempt from the deviation bound.
    pub fn new(admin: Address, operator: Address) -> Self {
        Self {
            admin,
            state: RefCell::new(FeedState {
                operator,
                quote: PriceQuote::default(),
            }),
        }
    }

    /// Create a feed pre-seeded with a quote
    pub fn with_quote(admin: Address, operator: Address, quote: PriceQuote) -> Self {
        Self {
            admin,
            state: RefCell::new(FeedState { operator, quote }),
        }
    }

    /// Submit a new observation. Operator only.
    pub fn submit(&self, caller: Address, price: u128, timestamp: u64) -> SynthResult<()> {
        let mut state = self.state.borrow_mut();

        if caller != state.operator {
            return Err(SynthError::Unauthorized {
                expected: state.operator,
                actual: caller,
            });
        }
        if price == 0 {
            return Err(SynthError::InvalidInput {
                param: "price",
                reason: "must be positive",
            });
        }
        if timestamp < state.quote.updated_at {
            return Err(SynthError::InvalidInput {
                param: "timestamp",
                reason: "must not move backwards",
            });
        }

        let old_price = state.quote.price;
        if old_price > 0 {
            let change = old_price.abs_diff(price);
            let change_bps = change
                .checked_mul(BPS_DENOMINATOR)
                .ok_or(SynthError::Overflow)?
                / old_price;
            if change_bps > MAX_PRICE_DEVIATION_BPS {
                return Err(SynthError::PriceDeviation {
                    old_price,
                    new_price: price,
                    max_deviation_bps: MAX_PRICE_DEVIATION_BPS,
                });
            }
        }

        state.quote = PriceQuote::new(price, timestamp);
        Ok(())
    }

    /// Rotate the operator. Admin only.
    pub fn set_operator(&self, caller: Address, new_operator: Address) -> SynthResult<()> {
        if caller != self.admin {
            return Err(SynthError::Unauthorized {
                expected: self.admin,
                actual: caller,
            });
        }
        self.state.borrow_mut().operator = new_operator;
        Ok(())
    }

    /// Current operator
    pub fn operator(&self) -> Address {
        self.state.borrow().operator
    }
}

impl PriceFeed for OperatorFeed {
    fn latest_quote(&self) -> PriceQuote {
        self.state.borrow().quote
    }
}

// ============ Static Feed ============

/// A feed whose quote is set directly, with no validation at all.
///
/// Test collaborator: lets a scenario serve zero prices, stale quotes, or
/// arbitrary jumps that `OperatorFeed` would reject.
#[derive(Debug, Default)]
pub struct StaticFeed {
    quote: RefCell<PriceQuote>,
}

impl StaticFeed {
    /// Create a feed serving the given quote
    pub fn new(quote: PriceQuote) -> Self {
        Self {
            quote: RefCell::new(quote),
        }
    }

    /// Replace the served quote
    pub fn set_quote(&self, quote: PriceQuote) {
        *self.quote.borrow_mut() = quote;
    }

    /// Replace only the price, keeping the timestamp
    pub fn set_price(&self, price: u128) {
        self.quote.borrow_mut().price = price;
    }
}

impl PriceFeed for StaticFeed {
    fn latest_quote(&self) -> PriceQuote {
        *self.quote.borrow()
    }
}
