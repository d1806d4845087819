//! Nudge Core - the agreement lifecycle and settlement state machine
//!
//! Four pieces, wired together by the service layer:
//!
//! - [`factory`] validates creation input and mints a new Agreement with two
//!   unguessable per-side capability tokens
//! - [`auth`] resolves a bearer token to a side (or no side)
//! - [`lifecycle`] applies accept/outcome actions atomically and triggers
//!   early termination on unanimous "done"
//! - [`settle`] derives the current settlement status from persisted fields
//!   and the clock: the only place countdown and forfeiture logic lives

pub mod auth;
pub mod factory;
pub mod lifecycle;
pub mod settle;

pub use auth::{BearerTokenAuthenticator, SideAuthenticator};
pub use factory::{build_agreement, AgreementSpec};
pub use lifecycle::{AgreementAction, LifecycleEngine};
pub use settle::{settlement_status, SettlementStatus};
