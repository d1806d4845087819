//! Nudge Service - the boundary the HTTP/UI layer consumes
//!
//! One struct owns the store, the authenticator, and the lifecycle engine,
//! and exposes the four operations the excluded transport layer would route
//! to: create, view, act, list. Inputs arrive as raw strings the way a
//! request handler would hand them over; everything typed lives below this
//! crate.

pub mod view;

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use nudge_core::{
    build_agreement, AgreementAction, AgreementSpec, BearerTokenAuthenticator, LifecycleEngine,
    SideAuthenticator,
};
use nudge_store::AgreementStore;
use nudge_types::{AgreementId, NudgeError, Result};

pub use view::{
    share_path, AgreementSummary, AgreementView, CreateAgreementRequest, CreateAgreementResponse,
    SideFlags, SideOutcomes, ViewerContext,
};

/// The service-facing surface of the agreement system
pub struct NudgeService {
    store: Arc<dyn AgreementStore>,
    auth: Arc<dyn SideAuthenticator>,
    engine: LifecycleEngine,
}

impl NudgeService {
    /// Build a service over a store, with the v1 bearer-token scheme
    pub fn new(store: Arc<dyn AgreementStore>) -> Self {
        Self::with_authenticator(store, Arc::new(BearerTokenAuthenticator))
    }

    /// Build a service with a custom token scheme
    pub fn with_authenticator(
        store: Arc<dyn AgreementStore>,
        auth: Arc<dyn SideAuthenticator>,
    ) -> Self {
        let engine = LifecycleEngine::new(Arc::clone(&store), Arc::clone(&auth));
        Self {
            store,
            auth,
            engine,
        }
    }

    /// Create a new agreement. Fails with `InvalidInput` on any malformed
    /// field; on success returns the id and both side-specific share links.
    pub async fn create_agreement(
        &self,
        request: CreateAgreementRequest,
    ) -> Result<CreateAgreementResponse> {
        let agreement = build_agreement(
            AgreementSpec {
                title: request.title,
                action: request.action,
                deadline_minutes: request.deadline_minutes,
                stake_a: request.stake_a,
                stake_b: request.stake_b,
                winner: request.winner,
            },
            Utc::now(),
        )?;

        let id = agreement.id;
        let token_a = agreement.token_a.to_string();
        let token_b = agreement.token_b.to_string();
        self.store.create(agreement).await?;
        info!(agreement_id = %id, "agreement created");

        Ok(CreateAgreementResponse {
            id,
            share_path_a: share_path(&id, &token_a),
            share_path_b: share_path(&id, &token_b),
            token_a,
            token_b,
        })
    }

    /// Fetch the public view of an agreement, with the viewer block resolved
    /// from the presented token. Anonymous and wrong-token viewers get the
    /// view with no side and no token echoed.
    pub async fn agreement_view(&self, id: &str, token: Option<&str>) -> Result<AgreementView> {
        let id = parse_id(id)?;
        let agreement = self.store.get(&id).await?;
        let viewer_side = self.auth.resolve(&agreement, token);
        Ok(AgreementView::build(&agreement, viewer_side, Utc::now()))
    }

    /// Submit an action against an agreement.
    ///
    /// `NotFound` for an unknown id, `Forbidden` when the token resolves to
    /// no side, `InvalidInput` for an unrecognized kind or outcome value.
    pub async fn submit_action(
        &self,
        id: &str,
        token: Option<&str>,
        kind: &str,
        value: Option<&str>,
    ) -> Result<()> {
        let id = parse_id(id)?;
        let action = AgreementAction::parse(kind, value)?;
        self.engine.submit(&id, token, action).await?;
        Ok(())
    }

    /// Most recently created agreements, newest first. Tokens never appear
    /// in summaries.
    pub async fn recent_agreements(&self, limit: usize) -> Result<Vec<AgreementSummary>> {
        let now = Utc::now();
        let agreements = self.store.recent(limit).await?;
        Ok(agreements
            .iter()
            .map(|agreement| AgreementSummary::build(agreement, now))
            .collect())
    }
}

/// An unparseable id is indistinguishable from an unknown one, so a caller
/// cannot probe id well-formedness separately from existence.
fn parse_id(raw: &str) -> Result<AgreementId> {
    AgreementId::parse(raw).map_err(|_| NudgeError::not_found(raw))
}
