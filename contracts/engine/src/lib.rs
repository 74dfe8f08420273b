//! synthUSD Engine
//!
//! The accounting-and-liquidation core of the synthUSD protocol. Users
//! deposit registered collateral tokens, mint the USD-pegged synthetic
//! token against them, and must keep their position 200% collateralized;
//! any third party may liquidate an under-collateralized position for a
//! 10% collateral bonus, seized proportionally across the target's assets.
//!
//! ## Execution model
//!
//! Single-threaded and fully synchronous. Each entry point runs to
//! completion or fails entirely: the ledger is snapshotted on entry and
//! restored on failure, and external token calls already made are unwound
//! through an inverse-operation journal. The only concurrency hazard is
//! synchronous self-reentrancy from a token collaborator's callback, which
//! the [`guard::ReentrancyGuard`] rejects.
//!
//! ## Collaborators
//!
//! Collateral tokens, the synthetic token, and price feeds are external
//! capabilities (see `synthusd_common::collaborators`); the engine is
//! polymorphic over them, so hosts wire real tokens and tests substitute
//! fakes — including adversarial ones.

pub mod engine;
pub mod guard;
pub mod ledger;

mod liquidation;


pub use engine::{CollateralSpec, Engine};
pub use guard::{EntryPermit, ReentrancyGuard};
pub use ledger::Ledger;
