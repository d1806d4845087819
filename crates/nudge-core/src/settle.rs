//! Settlement Resolver - derived status
//!
//! A pure function of the persisted Agreement fields and the current time.
//! Nothing here mutates state: any reader can re-derive the status at any
//! moment, and for a fixed set of fields the derivation is monotonic: once a
//! terminal status is reached, later evaluations return the same status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nudge_types::{Agreement, Side};

/// Derived settlement status of an agreement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SettlementStatus {
    /// Timer running, or inside the grace window awaiting consensus.
    /// `until` is the countdown target: the effective end while the timer
    /// runs, the grace close once the timer has ended without consensus.
    Pending { until: DateTime<Utc> },
    /// Both sides voted done; pot awarded to `winner`
    ResolvedDone { winner: Side },
    /// Both sides voted not done; no award
    ResolvedNotDone,
    /// Grace window closed without unanimous agreement; pot to the platform
    Forfeited,
}

impl SettlementStatus {
    /// Whether this status can never change again
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending { .. })
    }
}

/// Derive the settlement status of an agreement at `now`.
///
/// - Before the effective end: pending, counting down.
/// - At or after the effective end: unanimous done resolves to the winner
///   (before the deadline this is the early-termination path), unanimous
///   not-done resolves with no award, and anything else (disagreement or
///   silence) stays pending until the grace window closes, then forfeits.
pub fn settlement_status(agreement: &Agreement, now: DateTime<Utc>) -> SettlementStatus {
    let effective_end = agreement.effective_end_at();
    if now < effective_end {
        return SettlementStatus::Pending {
            until: effective_end,
        };
    }

    if agreement.both_done() {
        return SettlementStatus::ResolvedDone {
            winner: agreement.winner,
        };
    }
    if agreement.both_not_done() {
        return SettlementStatus::ResolvedNotDone;
    }

    let grace_end = agreement.grace_end_at();
    if now >= grace_end {
        SettlementStatus::Forfeited
    } else {
        SettlementStatus::Pending { until: grace_end }
    }
}
