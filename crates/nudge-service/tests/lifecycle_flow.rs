//! End-to-end lifecycle scenarios against the full service stack:
//! in-memory store, bearer-token auth, lifecycle engine, settlement resolver.

use std::sync::Arc;

use chrono::Duration;
use nudge_core::{settlement_status, SettlementStatus};
use nudge_service::{CreateAgreementRequest, NudgeService};
use nudge_store::{AgreementStore, MemoryStore};
use nudge_types::{AgreementId, Outcome, Side};

fn request() -> CreateAgreementRequest {
    CreateAgreementRequest {
        title: "Dry January".to_string(),
        action: "No drinks all month".to_string(),
        deadline_minutes: 1.0,
        stake_a: 20.0,
        stake_b: 20.0,
        winner: "A".to_string(),
    }
}

#[tokio::test]
async fn both_accept_and_confirm_within_the_minute() {
    let store = Arc::new(MemoryStore::new());
    let svc = NudgeService::new(Arc::clone(&store) as Arc<dyn AgreementStore>);

    let created = svc.create_agreement(request()).await.unwrap();
    let id = created.id.to_string();

    // Both sides accept, then both submit done, all inside the one-minute
    // countdown.
    svc.submit_action(&id, Some(created.token_a.as_str()), "accept", None)
        .await
        .unwrap();
    svc.submit_action(&id, Some(created.token_b.as_str()), "accept", None)
        .await
        .unwrap();
    svc.submit_action(&id, Some(created.token_a.as_str()), "outcome", Some("done"))
        .await
        .unwrap();
    svc.submit_action(&id, Some(created.token_b.as_str()), "outcome", Some("done"))
        .await
        .unwrap();

    let agreement = store.get(&created.id).await.unwrap();
    let ended = agreement.ended_early_at.expect("consensus ends the timer");
    assert!(ended >= agreement.created_at);
    assert!(ended < agreement.deadline_at());
    assert_eq!(agreement.effective_end_at(), ended);

    // Resolved immediately at the early end, not at the nominal deadline.
    assert_eq!(
        settlement_status(&agreement, ended),
        SettlementStatus::ResolvedDone { winner: Side::A }
    );

    let view = svc
        .agreement_view(&id, Some(created.token_a.as_str()))
        .await
        .unwrap();
    assert!(view.accepted.a && view.accepted.b);
    assert_eq!(view.outcome.a, Some(Outcome::Done));
    assert_eq!(view.outcome.b, Some(Outcome::Done));
    assert_eq!(view.effective_end_at, ended);
    assert_eq!(view.status, SettlementStatus::ResolvedDone { winner: Side::A });
}

#[tokio::test]
async fn silent_counterparty_forfeits_after_the_grace_window() {
    let store = Arc::new(MemoryStore::new());
    let svc = NudgeService::new(Arc::clone(&store) as Arc<dyn AgreementStore>);

    let created = svc.create_agreement(request()).await.unwrap();
    let id = created.id.to_string();

    // Only A ever shows up.
    svc.submit_action(&id, Some(created.token_a.as_str()), "accept", None)
        .await
        .unwrap();
    svc.submit_action(&id, Some(created.token_a.as_str()), "outcome", Some("done"))
        .await
        .unwrap();

    let agreement = store.get(&created.id).await.unwrap();
    assert!(agreement.ended_early_at.is_none());

    let deadline = agreement.deadline_at();

    // Still pending through the deadline and right up to the grace close.
    assert!(matches!(
        settlement_status(&agreement, deadline),
        SettlementStatus::Pending { .. }
    ));
    assert!(matches!(
        settlement_status(&agreement, deadline + Duration::hours(23) + Duration::minutes(59)),
        SettlementStatus::Pending { .. }
    ));

    // The grace window closes 24h after the deadline: forfeited.
    assert_eq!(
        settlement_status(&agreement, deadline + Duration::hours(24)),
        SettlementStatus::Forfeited
    );
}

#[tokio::test]
async fn tokens_work_cross_agreement_only_on_their_own() {
    let svc = NudgeService::new(Arc::new(MemoryStore::new()));

    let first = svc.create_agreement(request()).await.unwrap();
    let second = svc.create_agreement(request()).await.unwrap();

    // A token from one agreement grants nothing on another.
    let err = svc
        .submit_action(
            &second.id.to_string(),
            Some(first.token_a.as_str()),
            "accept",
            None,
        )
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "FORBIDDEN");

    // And each agreement's own tokens stay scoped to their side.
    let view = svc
        .agreement_view(&second.id.to_string(), Some(first.token_a.as_str()))
        .await
        .unwrap();
    assert_eq!(view.viewer.side, None);
}

#[tokio::test]
async fn concurrent_done_votes_from_both_sides_end_early_once() {
    let store = Arc::new(MemoryStore::new());
    let svc = Arc::new(NudgeService::new(
        Arc::clone(&store) as Arc<dyn AgreementStore>
    ));

    for _ in 0..25 {
        let created = svc.create_agreement(request()).await.unwrap();
        let id = created.id.to_string();

        let svc_a = Arc::clone(&svc);
        let id_a = id.clone();
        let token_a = created.token_a.clone();
        let h1 = tokio::spawn(async move {
            svc_a
                .submit_action(&id_a, Some(token_a.as_str()), "outcome", Some("done"))
                .await
                .unwrap();
        });

        let svc_b = Arc::clone(&svc);
        let id_b = id.clone();
        let token_b = created.token_b.clone();
        let h2 = tokio::spawn(async move {
            svc_b
                .submit_action(&id_b, Some(token_b.as_str()), "outcome", Some("done"))
                .await
                .unwrap();
        });

        h1.await.unwrap();
        h2.await.unwrap();

        let agreement = store.get(&created.id).await.unwrap();
        let ended = agreement
            .ended_early_at
            .expect("double done must end early exactly once");
        assert!(ended >= agreement.created_at);
    }
}

#[tokio::test]
async fn unknown_agreement_is_not_found_before_auth() {
    let svc = NudgeService::new(Arc::new(MemoryStore::new()));
    let err = svc
        .submit_action(&AgreementId::new().to_string(), None, "accept", None)
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "NOT_FOUND");
}
