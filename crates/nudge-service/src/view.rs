//! Wire-facing view models
//!
//! Everything a client sees is built here, from the stored record plus the
//! resolved viewer side. Token redaction is structural: a view only ever
//! contains the viewer's own token, so serializing a view cannot leak the
//! opposite side's credential no matter which call site produced it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nudge_core::{settlement_status, SettlementStatus};
use nudge_types::{Agreement, AgreementId, Outcome, Side};

/// Creation payload, as submitted by the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAgreementRequest {
    pub title: String,
    pub action: String,
    pub deadline_minutes: f64,
    pub stake_a: f64,
    pub stake_b: f64,
    /// `"A"` or `"B"`; anything else falls back to A
    pub winner: String,
}

/// Creation result: the id plus both side-specific share links.
///
/// This is the only response that ever carries both tokens: it goes to the
/// creator, who distributes the links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAgreementResponse {
    pub id: AgreementId,
    pub token_a: String,
    pub token_b: String,
    pub share_path_a: String,
    pub share_path_b: String,
}

/// Per-side acceptance flags, keyed the way the UI expects
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SideFlags {
    #[serde(rename = "A")]
    pub a: bool,
    #[serde(rename = "B")]
    pub b: bool,
}

/// Per-side outcome votes
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SideOutcomes {
    #[serde(rename = "A")]
    pub a: Option<Outcome>,
    #[serde(rename = "B")]
    pub b: Option<Outcome>,
}

/// Who is looking at this view, and the echo of their own token (only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerContext {
    pub side: Option<Side>,
    pub token: Option<String>,
}

/// Full public view of one agreement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgreementView {
    pub id: AgreementId,
    pub title: String,
    pub action: String,
    pub deadline_minutes: i64,
    pub stake_a: f64,
    pub stake_b: f64,
    pub pot: f64,
    pub winner: Side,
    pub created_at: DateTime<Utc>,
    pub accepted: SideFlags,
    pub outcome: SideOutcomes,
    pub ended_early_at: Option<DateTime<Utc>>,
    pub deadline_at: DateTime<Utc>,
    pub effective_end_at: DateTime<Utc>,
    pub grace_end_at: DateTime<Utc>,
    pub status: SettlementStatus,
    pub viewer: ViewerContext,
}

impl AgreementView {
    /// Build the view for one (possibly anonymous) viewer at `now`
    pub fn build(agreement: &Agreement, viewer_side: Option<Side>, now: DateTime<Utc>) -> Self {
        Self {
            id: agreement.id,
            title: agreement.title.clone(),
            action: agreement.action.clone(),
            deadline_minutes: agreement.deadline_minutes,
            stake_a: agreement.stake_a,
            stake_b: agreement.stake_b,
            pot: agreement.pot(),
            winner: agreement.winner,
            created_at: agreement.created_at,
            accepted: SideFlags {
                a: agreement.accepted_a,
                b: agreement.accepted_b,
            },
            outcome: SideOutcomes {
                a: agreement.outcome_a,
                b: agreement.outcome_b,
            },
            ended_early_at: agreement.ended_early_at,
            deadline_at: agreement.deadline_at(),
            effective_end_at: agreement.effective_end_at(),
            grace_end_at: agreement.grace_end_at(),
            status: settlement_status(agreement, now),
            viewer: ViewerContext {
                side: viewer_side,
                token: viewer_side.map(|side| agreement.token_for(side).to_string()),
            },
        }
    }
}

/// Listing entry: enough to render an index row, never any tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgreementSummary {
    pub id: AgreementId,
    pub title: String,
    pub pot: f64,
    pub created_at: DateTime<Utc>,
    pub status: SettlementStatus,
}

impl AgreementSummary {
    pub fn build(agreement: &Agreement, now: DateTime<Utc>) -> Self {
        Self {
            id: agreement.id,
            title: agreement.title.clone(),
            pot: agreement.pot(),
            created_at: agreement.created_at,
            status: settlement_status(agreement, now),
        }
    }
}

/// Share path for one side's link
pub fn share_path(id: &AgreementId, token: &str) -> String {
    format!("/n/{id}?t={token}")
}
