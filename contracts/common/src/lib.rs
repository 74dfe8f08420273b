//! synthUSD Common Library
//!
//! Shared types, constants, and utilities for the synthUSD protocol: an
//! over-collateralized synthetic-dollar engine. Users lock collateral
//! tokens, mint a USD-pegged synthetic token against them, and must keep
//! their position 200% collateralized; any third party may liquidate an
//! under-collateralized position for a bonus.
//!
//! This crate provides the foundation the engine and its collaborator
//! crates build on:
//!
//! - **Fixed-point math**: 18-decimal amounts, 256-bit intermediates
//! - **Health factor**: the solvency metric every mutation re-validates
//! - **Oracle adapter**: quote validation and USD conversion
//! - **Capability traits**: token and price-feed collaborators
//! - **Errors & events**: typed, diagnostic, all-or-nothing
//!
//! This crate is `no_std` compatible for embedded/WASM consumers when built
//! without the default `std` feature.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

// Re-export Vec for submodules based on feature
#[cfg(not(feature = "std"))]
pub use alloc::vec::Vec;
#[cfg(feature = "std")]
pub use std::vec::Vec;

pub mod collaborators;
pub mod constants;
pub mod errors;
pub mod events;
pub mod math;
pub mod oracle;
pub mod types;
pub mod validation;

// Re-exports for convenience
pub use collaborators::*;
pub use errors::*;
pub use events::*;
pub use math::*;
pub use oracle::*;
pub use types::*;
pub use validation::require_positive;
