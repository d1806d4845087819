//! Lifecycle Engine - the agreement state machine
//!
//! Status is never stored; the engine only mutates the accepted flags, the
//! outcome votes, and `ended_early_at`. Every action is a single atomic
//! read-modify-write against the store, which is what makes the consensus
//! decision safe under concurrent submissions from both sides.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use nudge_store::AgreementStore;
use nudge_types::{Agreement, AgreementId, NudgeError, Outcome, Result, Side};

use crate::auth::SideAuthenticator;

/// An authenticated action submitted by one side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgreementAction {
    /// Agree to the terms. Idempotent: re-accepting is a no-op.
    Accept,
    /// Vote on whether the action occurred. A resubmission overwrites the
    /// previous vote; v1 deliberately does not lock votes in.
    Outcome(Outcome),
}

impl AgreementAction {
    /// Parse a raw action payload. Unknown kinds and unknown outcome values
    /// reject as invalid input before any state is touched.
    pub fn parse(kind: &str, value: Option<&str>) -> Result<AgreementAction> {
        match kind {
            "accept" => Ok(AgreementAction::Accept),
            "outcome" => {
                let value = value
                    .ok_or_else(|| NudgeError::invalid_input("value", "outcome requires a value"))?;
                let outcome = Outcome::parse(value).ok_or_else(|| {
                    NudgeError::invalid_input("value", "must be \"done\" or \"not_done\"")
                })?;
                Ok(AgreementAction::Outcome(outcome))
            }
            other => Err(NudgeError::invalid_input(
                "kind",
                format!("unknown action kind \"{other}\""),
            )),
        }
    }
}

/// Applies authenticated actions to agreements
pub struct LifecycleEngine {
    store: Arc<dyn AgreementStore>,
    auth: Arc<dyn SideAuthenticator>,
}

impl LifecycleEngine {
    pub fn new(store: Arc<dyn AgreementStore>, auth: Arc<dyn SideAuthenticator>) -> Self {
        Self { store, auth }
    }

    /// Submit an action against one agreement.
    ///
    /// Fails with `AgreementNotFound` for an unknown id and `Forbidden` when
    /// the token resolves to no side. Returns the agreement as it stands
    /// after the action.
    pub async fn submit(
        &self,
        id: &AgreementId,
        token: Option<&str>,
        action: AgreementAction,
    ) -> Result<Agreement> {
        // Tokens are immutable after creation, so resolving the side from a
        // point read cannot race the update below.
        let agreement = self.store.get(id).await?;
        let side = match self.auth.resolve(&agreement, token) {
            Some(side) => side,
            None => {
                warn!(agreement_id = %id, "action rejected: token resolves to no side");
                return Err(NudgeError::forbidden(id));
            }
        };

        match action {
            AgreementAction::Accept => self.accept(id, side).await,
            AgreementAction::Outcome(value) => self.vote(id, side, value).await,
        }
    }

    async fn accept(&self, id: &AgreementId, side: Side) -> Result<Agreement> {
        let updated = self
            .store
            .update(
                id,
                Box::new(move |a| {
                    a.set_accepted(side);
                    Ok(())
                }),
            )
            .await?;
        info!(agreement_id = %id, %side, "side accepted");
        Ok(updated)
    }

    async fn vote(&self, id: &AgreementId, side: Side, value: Outcome) -> Result<Agreement> {
        // Captured outside the closure; still >= created_at because creation
        // happened strictly earlier.
        let now = Utc::now();
        let updated = self
            .store
            .update(
                id,
                Box::new(move |a| {
                    a.set_outcome(side, value);
                    // Consensus check runs under the same entry lock as the
                    // vote write: concurrent double-"done" submissions each
                    // observe the final votes, and the `is_none` guard means
                    // exactly one of them sets the early end.
                    if a.both_done() && a.ended_early_at.is_none() {
                        a.ended_early_at = Some(now);
                    }
                    Ok(())
                }),
            )
            .await?;

        if updated.ended_early_at.is_some() {
            info!(agreement_id = %id, %side, %value, "vote recorded, consensus reached");
        } else {
            info!(agreement_id = %id, %side, %value, "vote recorded");
        }
        Ok(updated)
    }
}
