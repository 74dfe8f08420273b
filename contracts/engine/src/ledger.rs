//! Collateral & Debt Ledger
//!
//! Owns every per-user balance in the engine; all mutations go through the
//! checked methods here. Decrements that would underflow fail instead, and
//! the whole ledger is `Clone` so an entry point can snapshot it and restore
//! on failure.
//!
//! Positions exist implicitly from the first credit and are never removed:
//! a balance debited back to zero stays as an empty entry.

use std::collections::BTreeMap;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use synthusd_common::{
    errors::{SynthError, SynthResult},
    types::{Address, Amount, AssetId},
};

/// Per-user collateral and debt balances
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct Ledger {
    /// user -> asset -> deposited collateral
    collateral: BTreeMap<Address, BTreeMap<AssetId, Amount>>,
    /// user -> synthetic debt
    debt: BTreeMap<Address, Amount>,
}

impl Ledger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Collateral balance of `user` in `asset`
    pub fn collateral_of(&self, user: Address, asset: AssetId) -> Amount {
        self.collateral
            .get(&user)
            .and_then(|assets| assets.get(&asset))
            .copied()
            .unwrap_or(0)
    }

    /// Debt balance of `user`
    pub fn debt_of(&self, user: Address) -> Amount {
        self.debt.get(&user).copied().unwrap_or(0)
    }

    /// Credit collateral to a position
    pub fn credit_collateral(
        &mut self,
        user: Address,
        asset: AssetId,
        amount: Amount,
    ) -> SynthResult<()> {
        let balance = self
            .collateral
            .entry(user)
            .or_default()
            .entry(asset)
            .or_insert(0);
        *balance = balance.checked_add(amount).ok_or(SynthError::Overflow)?;
        Ok(())
    }

    /// Debit collateral from a position; fails instead of underflowing
    pub fn debit_collateral(
        &mut self,
        user: Address,
        asset: AssetId,
        amount: Amount,
    ) -> SynthResult<()> {
        let available = self.collateral_of(user, asset);
        if available < amount {
            return Err(SynthError::InsufficientBalance {
                available,
                requested: amount,
            });
        }
        self.collateral
            .entry(user)
            .or_default()
            .insert(asset, available - amount);
        Ok(())
    }

    /// Record newly minted debt against a position
    pub fn increase_debt(&mut self, user: Address, amount: Amount) -> SynthResult<()> {
        let balance = self.debt.entry(user).or_insert(0);
        *balance = balance.checked_add(amount).ok_or(SynthError::Overflow)?;
        Ok(())
    }

    /// Clear repaid debt from a position; fails instead of underflowing
    pub fn decrease_debt(&mut self, user: Address, amount: Amount) -> SynthResult<()> {
        let available = self.debt_of(user);
        if available < amount {
            return Err(SynthError::InsufficientBalance {
                available,
                requested: amount,
            });
        }
        self.debt.insert(user, available - amount);
        Ok(())
    }

    /// Sum of all users' recorded balances in `asset`.
    ///
    /// Conservation: this must equal the amount of `asset` held in engine
    /// custody at all times.
    pub fn total_collateral(&self, asset: AssetId) -> Amount {
        self.collateral
            .values()
            .filter_map(|assets| assets.get(&asset))
            .fold(0u128, |acc, amount| acc.saturating_add(*amount))
    }

    /// Sum of all users' debt
    pub fn total_debt(&self) -> Amount {
        self.debt
            .values()
            .fold(0u128, |acc, amount| acc.saturating_add(*amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: Address = [1u8; 32];
    const BOB: Address = [2u8; 32];
    const WETH: AssetId = [10u8; 32];
    const WBTC: AssetId = [11u8; 32];

    #[test]
    fn test_credit_and_debit() {
        let mut ledger = Ledger::new();
        ledger.credit_collateral(ALICE, WETH, 100).unwrap();
        ledger.credit_collateral(ALICE, WETH, 50).unwrap();
        assert_eq!(ledger.collateral_of(ALICE, WETH), 150);

        ledger.debit_collateral(ALICE, WETH, 120).unwrap();
        assert_eq!(ledger.collateral_of(ALICE, WETH), 30);
    }

    #[test]
    fn test_debit_underflow_fails() {
        let mut ledger = Ledger::new();
        ledger.credit_collateral(ALICE, WETH, 10).unwrap();

        let err = ledger.debit_collateral(ALICE, WETH, 11).unwrap_err();
        assert_eq!(
            err,
            SynthError::InsufficientBalance {
                available: 10,
                requested: 11,
            }
        );
        // Failed debit leaves the balance untouched
        assert_eq!(ledger.collateral_of(ALICE, WETH), 10);
    }

    #[test]
    fn test_debit_unknown_position_fails() {
        let mut ledger = Ledger::new();
        assert!(ledger.debit_collateral(BOB, WBTC, 1).is_err());
        assert!(ledger.decrease_debt(BOB, 1).is_err());
    }

    #[test]
    fn test_zero_balance_entry_persists() {
        let mut ledger = Ledger::new();
        ledger.credit_collateral(ALICE, WETH, 10).unwrap();
        ledger.debit_collateral(ALICE, WETH, 10).unwrap();

        assert_eq!(ledger.collateral_of(ALICE, WETH), 0);
        assert!(ledger.collateral.get(&ALICE).unwrap().contains_key(&WETH));
    }

    #[test]
    fn test_debt_lifecycle() {
        let mut ledger = Ledger::new();
        ledger.increase_debt(ALICE, 500).unwrap();
        ledger.decrease_debt(ALICE, 200).unwrap();
        assert_eq!(ledger.debt_of(ALICE), 300);

        let err = ledger.decrease_debt(ALICE, 301).unwrap_err();
        assert!(matches!(err, SynthError::InsufficientBalance { .. }));
    }

    #[test]
    fn test_totals() {
        let mut ledger = Ledger::new();
        ledger.credit_collateral(ALICE, WETH, 100).unwrap();
        ledger.credit_collateral(BOB, WETH, 50).unwrap();
        ledger.credit_collateral(BOB, WBTC, 7).unwrap();
        ledger.increase_debt(ALICE, 30).unwrap();
        ledger.increase_debt(BOB, 12).unwrap();

        assert_eq!(ledger.total_collateral(WETH), 150);
        assert_eq!(ledger.total_collateral(WBTC), 7);
        assert_eq!(ledger.total_debt(), 42);
    }

    #[test]
    fn test_snapshot_restore() {
        let mut ledger = Ledger::new();
        ledger.credit_collateral(ALICE, WETH, 100).unwrap();
        let snapshot = ledger.clone();

        ledger.debit_collateral(ALICE, WETH, 60).unwrap();
        ledger.increase_debt(ALICE, 5).unwrap();
        assert_ne!(ledger, snapshot);

        ledger = snapshot;
        assert_eq!(ledger.collateral_of(ALICE, WETH), 100);
        assert_eq!(ledger.debt_of(ALICE), 0);
    }
}
