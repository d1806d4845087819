//! The Agreement record
//!
//! An Agreement binds two sides to a staked, time-boxed, mutually-confirmed
//! action. There is no stored status field: everything about where an
//! agreement stands is derived from these fields and the clock, so the record
//! can be re-evaluated at any time from persisted state alone.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::AgreementId;
use crate::side::{Outcome, Side};
use crate::token::CapabilityToken;

/// Minimum deadline duration: 1 minute
pub const MIN_DEADLINE_MINUTES: i64 = 1;

/// Maximum deadline duration: 30 days
pub const MAX_DEADLINE_MINUTES: i64 = 30 * 24 * 60;

/// Grace window after the deadline during which disagreement or silence is
/// tolerated before forfeiture is finalized
pub const GRACE_WINDOW_HOURS: i64 = 24;

/// The core record binding two sides to a staked agreement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agreement {
    /// Unique id, assigned at creation
    pub id: AgreementId,
    /// Short human-readable name
    pub title: String,
    /// Description of the action being agreed on
    pub action: String,
    /// Countdown length, relative to `created_at`
    pub deadline_minutes: i64,
    /// Side A's stake
    pub stake_a: f64,
    /// Side B's stake
    pub stake_b: f64,
    /// Side that receives the pot if the outcome resolves to done
    pub winner: Side,
    /// Creation time; all other timing is relative to this
    pub created_at: DateTime<Utc>,
    /// Whether side A accepted the terms (monotonic)
    pub accepted_a: bool,
    /// Whether side B accepted the terms (monotonic)
    pub accepted_b: bool,
    /// Side A's outcome vote
    pub outcome_a: Option<Outcome>,
    /// Side B's outcome vote
    pub outcome_b: Option<Outcome>,
    /// Set exactly once, when both sides have voted done
    pub ended_early_at: Option<DateTime<Utc>>,
    /// Side A's capability token
    pub token_a: CapabilityToken,
    /// Side B's capability token
    pub token_b: CapabilityToken,
}

impl Agreement {
    /// The sum of both stakes
    pub fn pot(&self) -> f64 {
        self.stake_a + self.stake_b
    }

    /// When the nominal countdown ends
    pub fn deadline_at(&self) -> DateTime<Utc> {
        self.created_at + Duration::minutes(self.deadline_minutes)
    }

    /// When the countdown actually ends: the early-termination time if both
    /// sides agreed done before the deadline, otherwise the deadline itself
    pub fn effective_end_at(&self) -> DateTime<Utc> {
        self.ended_early_at.unwrap_or_else(|| self.deadline_at())
    }

    /// When the post-deadline grace window closes. Fixed relative to the
    /// nominal deadline, independent of any early end.
    pub fn grace_end_at(&self) -> DateTime<Utc> {
        self.deadline_at() + Duration::hours(GRACE_WINDOW_HOURS)
    }

    /// Whether the given side has accepted the terms
    pub fn accepted(&self, side: Side) -> bool {
        match side {
            Side::A => self.accepted_a,
            Side::B => self.accepted_b,
        }
    }

    /// Record an acceptance. Monotonic: re-accepting is a no-op.
    pub fn set_accepted(&mut self, side: Side) {
        match side {
            Side::A => self.accepted_a = true,
            Side::B => self.accepted_b = true,
        }
    }

    /// The given side's outcome vote, if submitted
    pub fn outcome(&self, side: Side) -> Option<Outcome> {
        match side {
            Side::A => self.outcome_a,
            Side::B => self.outcome_b,
        }
    }

    /// Record an outcome vote. A resubmission overwrites the previous vote.
    pub fn set_outcome(&mut self, side: Side, value: Outcome) {
        match side {
            Side::A => self.outcome_a = Some(value),
            Side::B => self.outcome_b = Some(value),
        }
    }

    /// Whether both sides have accepted
    pub fn both_accepted(&self) -> bool {
        self.accepted_a && self.accepted_b
    }

    /// Whether both sides have voted done
    pub fn both_done(&self) -> bool {
        self.outcome_a == Some(Outcome::Done) && self.outcome_b == Some(Outcome::Done)
    }

    /// Whether both sides have voted not done
    pub fn both_not_done(&self) -> bool {
        self.outcome_a == Some(Outcome::NotDone) && self.outcome_b == Some(Outcome::NotDone)
    }

    /// Resolve a candidate token to the side it belongs to
    pub fn side_of_token(&self, candidate: &str) -> Option<Side> {
        if self.token_a.matches(candidate) {
            Some(Side::A)
        } else if self.token_b.matches(candidate) {
            Some(Side::B)
        } else {
            None
        }
    }

    /// The given side's own token
    pub fn token_for(&self, side: Side) -> CapabilityToken {
        match side {
            Side::A => self.token_a,
            Side::B => self.token_b,
        }
    }
}
