//! synthUSD Token Contract
//!
//! Reference fungible-token implementation of the engine's token
//! capabilities. One instance serves as the synthetic debt token; further
//! instances stand in for collateral tokens in tests and local deployments.
//!
//! ## Capability model
//!
//! There is no ambient caller identity: holding the token handle is the
//! capability, and account arguments are explicit. Three rules keep that
//! model honest:
//!
//! - `transfer` spends only the controller's (engine custody) balance
//! - `transfer_from` pulls from arbitrary owners but needs a standing
//!   approval for the (owner, recipient) pair
//! - `burn` destroys only what custody already holds
//!
//! Minting is unrestricted through the handle; deployments hand the handle
//! to the engine alone.

use std::cell::RefCell;
use std::collections::BTreeMap;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use synthusd_common::{
    collaborators::{CollateralToken, SyntheticToken},
    constants::token,
    errors::{SynthError, SynthResult},
    types::{Address, Amount},
};

// ============ Token State ============

/// Balances, approvals, and supply counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct TokenState {
    /// Per-address balances
    pub balances: BTreeMap<Address, Amount>,
    /// Standing approvals keyed by (owner, recipient); `Amount::MAX`
    /// means unlimited and is never consumed
    pub allowances: BTreeMap<(Address, Address), Amount>,
    /// Current total supply
    pub total_supply: Amount,
    /// Cumulative minted
    pub total_minted: Amount,
    /// Cumulative burned
    pub total_burned: Amount,
}

/// A fungible token with an authorized controller account.
///
/// The controller is the account whose balance `transfer` and `burn`
/// operate on — for the synthetic token that is the engine's custody
/// address.
#[derive(Debug)]
pub struct FungibleToken {
    name: &'static str,
    symbol: &'static str,
    decimals: u8,
    controller: Address,
    state: RefCell<TokenState>,
}

impl FungibleToken {
    /// Create a token with the given metadata and controller
    pub fn new(
        name: &'static str,
        symbol: &'static str,
        decimals: u8,
        controller: Address,
    ) -> SynthResult<Self> {
        if controller == [0u8; 32] {
            return Err(SynthError::InvalidAddress {
                reason: "controller cannot be zero address",
            });
        }
        Ok(Self {
            name,
            symbol,
            decimals,
            controller,
            state: RefCell::new(TokenState::default()),
        })
    }

    /// Create the synthetic-dollar token with protocol metadata
    pub fn synth_usd(controller: Address) -> SynthResult<Self> {
        Self::new(token::NAME, token::SYMBOL, token::DECIMALS, controller)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn symbol(&self) -> &'static str {
        self.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    /// The controller (custody) account
    pub fn controller(&self) -> Address {
        self.controller
    }

    /// Balance of `owner`
    pub fn balance_of(&self, owner: Address) -> Amount {
        self.state
            .borrow()
            .balances
            .get(&owner)
            .copied()
            .unwrap_or(0)
    }

    /// Remaining approval for pulls from `owner` towards `recipient`
    pub fn allowance(&self, owner: Address, recipient: Address) -> Amount {
        self.state
            .borrow()
            .allowances
            .get(&(owner, recipient))
            .copied()
            .unwrap_or(0)
    }

    /// Current total supply
    pub fn total_supply(&self) -> Amount {
        self.state.borrow().total_supply
    }

    /// Set the approval for pulls from `owner` towards `recipient`
    pub fn approve(&self, owner: Address, recipient: Address, amount: Amount) {
        self.state
            .borrow_mut()
            .allowances
            .insert((owner, recipient), amount);
    }

    /// Copy of the full token state, for persistence or inspection
    pub fn snapshot(&self) -> TokenState {
        self.state.borrow().clone()
    }

    // ============ Fallible operations ============

    /// Mint `amount` to `to`, bounded by the maximum supply
    pub fn try_mint(&self, to: Address, amount: Amount) -> SynthResult<()> {
        let mut state = self.state.borrow_mut();

        let new_supply = state
            .total_supply
            .checked_add(amount)
            .ok_or(SynthError::Overflow)?;
        if new_supply > token::MAX_SUPPLY {
            return Err(SynthError::ExceedsMaximum {
                amount: new_supply,
                maximum: token::MAX_SUPPLY,
            });
        }

        let balance = state.balances.entry(to).or_insert(0);
        *balance = balance.checked_add(amount).ok_or(SynthError::Overflow)?;
        state.total_supply = new_supply;
        state.total_minted = state.total_minted.saturating_add(amount);
        Ok(())
    }

    /// Burn `amount` from the controller's balance
    pub fn try_burn(&self, amount: Amount) -> SynthResult<()> {
        let mut state = self.state.borrow_mut();

        let balance = state.balances.entry(self.controller).or_insert(0);
        if *balance < amount {
            return Err(SynthError::InsufficientBalance {
                available: *balance,
                requested: amount,
            });
        }
        *balance -= amount;
        state.total_supply -= amount;
        state.total_burned = state.total_burned.saturating_add(amount);
        Ok(())
    }

    /// Spend the controller's balance
    pub fn try_transfer(&self, from: Address, to: Address, amount: Amount) -> SynthResult<()> {
        if from != self.controller {
            return Err(SynthError::Unauthorized {
                expected: self.controller,
                actual: from,
            });
        }
        Self::move_balance(&mut self.state.borrow_mut(), from, to, amount)
    }

    /// Pull from `from` to `to` against the (from, to) approval
    pub fn try_transfer_from(&self, from: Address, to: Address, amount: Amount) -> SynthResult<()> {
        let mut state = self.state.borrow_mut();

        let allowance = state.allowances.get(&(from, to)).copied().unwrap_or(0);
        if allowance < amount {
            return Err(SynthError::InsufficientAllowance {
                available: allowance,
                requested: amount,
            });
        }
        Self::move_balance(&mut state, from, to, amount)?;
        if allowance != Amount::MAX {
            state.allowances.insert((from, to), allowance - amount);
        }
        Ok(())
    }

    fn move_balance(
        state: &mut TokenState,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> SynthResult<()> {
        let from_balance = state.balances.get(&from).copied().unwrap_or(0);
        if from_balance < amount {
            return Err(SynthError::InsufficientBalance {
                available: from_balance,
                requested: amount,
            });
        }
        state.balances.insert(from, from_balance - amount);
        let to_balance = state.balances.entry(to).or_insert(0);
        *to_balance = to_balance.checked_add(amount).ok_or(SynthError::Overflow)?;
        Ok(())
    }
}

// ============ Capability Implementations ============

impl CollateralToken for FungibleToken {
    fn transfer_from(&self, from: Address, to: Address, amount: Amount) -> bool {
        self.try_transfer_from(from, to, amount).is_ok()
    }

    fn transfer(&self, from: Address, to: Address, amount: Amount) -> bool {
        self.try_transfer(from, to, amount).is_ok()
    }
}

impl SyntheticToken for FungibleToken {
    fn mint(&self, to: Address, amount: Amount) -> bool {
        self.try_mint(to, amount).is_ok()
    }

    fn burn(&self, amount: Amount) -> bool {
        self.try_burn(amount).is_ok()
    }

    fn transfer_from(&self, from: Address, to: Address, amount: Amount) -> bool {
        self.try_transfer_from(from, to, amount).is_ok()
    }

    fn transfer(&self, from: Address, to: Address, amount: Amount) -> bool {
        self.try_transfer(from, to, amount).is_ok()
    }
}
