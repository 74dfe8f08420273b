//! External Token Collaborators
//!
//! Capability interfaces for the tokens the engine moves but does not own:
//! the collateral tokens backing positions and the synthetic debt token.
//! The engine is polymorphic over these traits, so tests can substitute
//! fakes — including adversarial ones that call back into the engine
//! mid-transfer.
//!
//! Methods take `&self`; implementations are expected to use interior
//! mutability (the engine and its collaborators share a single-threaded,
//! fully synchronous execution model). Holding a handle IS the capability;
//! there is no ambient caller identity, so account arguments are explicit.
//!
//! A `false` return signals the collaborator refused the operation; the
//! calling engine operation aborts as a whole.

use crate::types::{Address, Amount};

/// A collateral token accepted as backing for issued debt.
pub trait CollateralToken {
    /// Pull `amount` from `from` into `to` (engine custody).
    /// Requires whatever approval scheme the token implements.
    fn transfer_from(&self, from: Address, to: Address, amount: Amount) -> bool;

    /// Pay `amount` out of `from` (engine custody) to `to`.
    fn transfer(&self, from: Address, to: Address, amount: Amount) -> bool;
}

/// The synthetic debt token: mintable and burnable by the engine.
pub trait SyntheticToken {
    /// Create `amount` new tokens owned by `to`.
    fn mint(&self, to: Address, amount: Amount) -> bool;

    /// Destroy `amount` tokens held in engine custody.
    fn burn(&self, amount: Amount) -> bool;

    /// Pull `amount` from `from` into `to` (used to fund burns).
    fn transfer_from(&self, from: Address, to: Address, amount: Amount) -> bool;

    /// Move `amount` between accounts without an approval check on the
    /// engine's side; used when unwinding a failed operation.
    fn transfer(&self, from: Address, to: Address, amount: Amount) -> bool;
}
