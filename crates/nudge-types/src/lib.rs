//! Nudge Types - Canonical domain types for staked two-party agreements
//!
//! This crate contains all foundational types for Nudge with zero dependencies
//! on other nudge crates:
//!
//! - Identity types (AgreementId)
//! - Capability tokens (per-side bearer credentials)
//! - Sides and outcome votes
//! - The Agreement record and its timing helpers
//! - The error taxonomy
//!
//! # Invariants carried by these types
//!
//! 1. `token_a != token_b` for every agreement
//! 2. `stake_a`, `stake_b >= 0` and `stake_a + stake_b > 0`
//! 3. Accepted flags are monotonic: once true, never false again
//! 4. `ended_early_at` is set exactly once, only on unanimous "done"
//! 5. A side's token is never serialized to the opposite side

pub mod agreement;
pub mod error;
pub mod identity;
pub mod side;
pub mod token;

pub use agreement::*;
pub use error::*;
pub use identity::*;
pub use side::*;
pub use token::*;
