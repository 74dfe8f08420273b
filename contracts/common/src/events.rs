//! Protocol Events for synthUSD
//!
//! Events are recorded during engine execution and can be drained by the
//! host for indexing, analytics, and notifications. A rolled-back operation
//! leaves no events behind.

use crate::Vec;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::types::{Address, Amount, AssetId};

/// Event types for indexing and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
#[borsh(use_discriminant = true)]
#[repr(u8)]
pub enum EventType {
    CollateralDeposited = 0x01,
    CollateralRedeemed = 0x02,
    DebtMinted = 0x03,
    DebtBurned = 0x04,
    PositionLiquidated = 0x05,
}

/// Main event enum containing all engine events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum SynthEvent {
    /// Collateral pulled into engine custody and credited to a position
    CollateralDeposited {
        user: Address,
        asset: AssetId,
        amount: Amount,
    },

    /// Collateral debited from a position and paid out of custody.
    /// During liquidation `from` is the target and `to` the liquidator;
    /// otherwise both are the acting user.
    CollateralRedeemed {
        from: Address,
        to: Address,
        asset: AssetId,
        amount: Amount,
    },

    /// Debt recorded against a position and synthetic tokens minted
    DebtMinted { user: Address, amount: Amount },

    /// Debt cleared from a position and synthetic tokens destroyed.
    /// `payer` funded the burn; during liquidation it is the liquidator.
    DebtBurned {
        on_behalf_of: Address,
        payer: Address,
        amount: Amount,
    },

    /// A liquidation completed
    PositionLiquidated {
        user: Address,
        liquidator: Address,
        debt_covered: Amount,
        value_seized_usd: Amount,
    },
}

impl SynthEvent {
    /// The event's type discriminant
    pub fn event_type(&self) -> EventType {
        match self {
            Self::CollateralDeposited { .. } => EventType::CollateralDeposited,
            Self::CollateralRedeemed { .. } => EventType::CollateralRedeemed,
            Self::DebtMinted { .. } => EventType::DebtMinted,
            Self::DebtBurned { .. } => EventType::DebtBurned,
            Self::PositionLiquidated { .. } => EventType::PositionLiquidated,
        }
    }
}

/// Append-only log of emitted events
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct EventLog {
    events: Vec<SynthEvent>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Emit an event (add to log)
    pub fn emit(&mut self, event: SynthEvent) {
        self.events.push(event);
    }

    /// Get all events
    pub fn events(&self) -> &[SynthEvent] {
        &self.events
    }

    /// Take ownership of all events
    pub fn into_events(self) -> Vec<SynthEvent> {
        self.events
    }

    /// Append every event of `other`, in order
    pub fn extend(&mut self, other: EventLog) {
        self.events.extend(other.events);
    }

    /// Filter events by type
    pub fn filter_by_type(&self, event_type: EventType) -> Vec<&SynthEvent> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Get number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_and_filter() {
        let mut log = EventLog::new();

        log.emit(SynthEvent::CollateralDeposited {
            user: [1u8; 32],
            asset: [2u8; 32],
            amount: 10,
        });
        log.emit(SynthEvent::DebtMinted {
            user: [1u8; 32],
            amount: 5,
        });
        log.emit(SynthEvent::CollateralDeposited {
            user: [3u8; 32],
            asset: [2u8; 32],
            amount: 7,
        });

        assert_eq!(log.len(), 3);
        assert_eq!(log.filter_by_type(EventType::CollateralDeposited).len(), 2);
        assert_eq!(log.filter_by_type(EventType::PositionLiquidated).len(), 0);
    }

    #[test]
    fn test_extend_preserves_order() {
        let mut first = EventLog::new();
        first.emit(SynthEvent::DebtMinted {
            user: [1u8; 32],
            amount: 1,
        });

        let mut second = EventLog::new();
        second.emit(SynthEvent::DebtBurned {
            on_behalf_of: [1u8; 32],
            payer: [1u8; 32],
            amount: 1,
        });

        first.extend(second);
        assert_eq!(first.len(), 2);
        assert_eq!(first.events()[1].event_type(), EventType::DebtBurned);
    }
}
