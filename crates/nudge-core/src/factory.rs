//! Agreement Factory - validated creation
//!
//! Takes the raw creation payload, runs each rejectable condition in order,
//! and produces a fresh Agreement with both capability tokens. Validation
//! failures reject before anything is written, so creation is all-or-nothing.

use chrono::{DateTime, Utc};

use nudge_types::{
    Agreement, AgreementId, CapabilityToken, NudgeError, Result, Side, MAX_DEADLINE_MINUTES,
    MIN_DEADLINE_MINUTES,
};

/// Raw creation input, as it arrives from the caller
#[derive(Debug, Clone)]
pub struct AgreementSpec {
    pub title: String,
    pub action: String,
    /// Requested countdown length in minutes. Arrives as a float because the
    /// wire format is a JSON number; rejected when not finite or out of range.
    pub deadline_minutes: f64,
    pub stake_a: f64,
    pub stake_b: f64,
    /// Winner designation. `"B"` selects B; anything else defaults to A.
    pub winner: String,
}

/// Validate a creation payload and mint the Agreement.
///
/// Rejectable conditions, checked in order: empty title, empty action,
/// deadline not finite or outside [1 minute, 30 days], either stake not
/// finite or negative, stake sum not positive. An unrecognized winner is not
/// an error: it defaults to A.
pub fn build_agreement(spec: AgreementSpec, now: DateTime<Utc>) -> Result<Agreement> {
    let title = spec.title.trim().to_string();
    if title.is_empty() {
        return Err(NudgeError::invalid_input("title", "must not be empty"));
    }

    let action = spec.action.trim().to_string();
    if action.is_empty() {
        return Err(NudgeError::invalid_input("action", "must not be empty"));
    }

    if !spec.deadline_minutes.is_finite()
        || spec.deadline_minutes < MIN_DEADLINE_MINUTES as f64
        || spec.deadline_minutes > MAX_DEADLINE_MINUTES as f64
    {
        return Err(NudgeError::invalid_input(
            "deadline_minutes",
            format!(
                "must be between {MIN_DEADLINE_MINUTES} and {MAX_DEADLINE_MINUTES} minutes"
            ),
        ));
    }

    if !spec.stake_a.is_finite() || spec.stake_a < 0.0 {
        return Err(NudgeError::invalid_input(
            "stake_a",
            "must be a non-negative amount",
        ));
    }
    if !spec.stake_b.is_finite() || spec.stake_b < 0.0 {
        return Err(NudgeError::invalid_input(
            "stake_b",
            "must be a non-negative amount",
        ));
    }
    if spec.stake_a + spec.stake_b <= 0.0 {
        return Err(NudgeError::invalid_input(
            "stakes",
            "at least one stake must be greater than zero",
        ));
    }

    let winner = Side::parse_lenient(&spec.winner);

    // Two independent draws; 122 bits of entropy each makes a collision
    // cryptographically negligible.
    let token_a = CapabilityToken::generate();
    let token_b = CapabilityToken::generate();
    debug_assert_ne!(token_a, token_b);

    Ok(Agreement {
        id: AgreementId::new(),
        title,
        action,
        deadline_minutes: spec.deadline_minutes.round() as i64,
        stake_a: spec.stake_a,
        stake_b: spec.stake_b,
        winner,
        created_at: now,
        accepted_a: false,
        accepted_b: false,
        outcome_a: None,
        outcome_b: None,
        ended_early_at: None,
        token_a,
        token_b,
    })
}
