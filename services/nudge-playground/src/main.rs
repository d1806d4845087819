//! Nudge Playground - scripted walkthrough of the agreement lifecycle
//!
//! Drives the full stack (in-memory store, bearer-token auth, lifecycle
//! engine, settlement resolver) through two agreements:
//!
//! 1. the happy path: both sides accept, both confirm, the timer ends early
//! 2. the silent counterparty: only A ever acts, evaluated at synthetic
//!    times to show the grace window closing into forfeiture
//!
//! The resolver is a pure function of the record and a timestamp, so the
//! second walkthrough can look into the future without waiting for it.

use std::sync::Arc;

use anyhow::Result;
use chrono::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nudge_core::settlement_status;
use nudge_service::{CreateAgreementRequest, NudgeService};
use nudge_store::{AgreementStore, MemoryStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting Nudge playground...");

    let store = Arc::new(MemoryStore::new());
    let service = NudgeService::new(Arc::clone(&store) as Arc<dyn AgreementStore>);

    happy_path(&service).await?;
    silent_counterparty(&service, &store).await?;

    let summaries = service.recent_agreements(10).await?;
    tracing::info!("recent agreements:");
    for summary in summaries {
        tracing::info!(
            "  {} \"{}\" pot {:.2} -> {:?}",
            summary.id,
            summary.title,
            summary.pot,
            summary.status
        );
    }

    Ok(())
}

/// Both sides accept and confirm; consensus ends the timer early.
async fn happy_path(service: &NudgeService) -> Result<()> {
    let created = service
        .create_agreement(CreateAgreementRequest {
            title: "Morning run".to_string(),
            action: "Run 5k before 8am".to_string(),
            deadline_minutes: 60.0,
            stake_a: 20.0,
            stake_b: 20.0,
            winner: "A".to_string(),
        })
        .await?;

    let id = created.id.to_string();
    tracing::info!("created agreement {id}");
    tracing::info!("  share with A: {}", created.share_path_a);
    tracing::info!("  share with B: {}", created.share_path_b);

    service
        .submit_action(&id, Some(created.token_a.as_str()), "accept", None)
        .await?;
    service
        .submit_action(&id, Some(created.token_b.as_str()), "accept", None)
        .await?;
    service
        .submit_action(&id, Some(created.token_a.as_str()), "outcome", Some("done"))
        .await?;
    service
        .submit_action(&id, Some(created.token_b.as_str()), "outcome", Some("done"))
        .await?;

    let view = service.agreement_view(&id, Some(created.token_a.as_str())).await?;
    tracing::info!(
        "happy path settled: status {:?}, ended early at {:?}",
        view.status,
        view.ended_early_at
    );
    Ok(())
}

/// Only A accepts and votes. Shows the derived status at the deadline,
/// inside the grace window, and after it closes.
async fn silent_counterparty(service: &NudgeService, store: &Arc<MemoryStore>) -> Result<()> {
    let created = service
        .create_agreement(CreateAgreementRequest {
            title: "Inbox zero".to_string(),
            action: "Clear the backlog by Friday".to_string(),
            deadline_minutes: 60.0,
            stake_a: 0.0,
            stake_b: 35.0,
            winner: "B".to_string(),
        })
        .await?;

    let id = created.id.to_string();
    service
        .submit_action(&id, Some(created.token_a.as_str()), "accept", None)
        .await?;
    service
        .submit_action(&id, Some(created.token_a.as_str()), "outcome", Some("done"))
        .await?;

    let agreement = store.get(&created.id).await?;
    let deadline = agreement.deadline_at();
    for (label, at) in [
        ("at the deadline", deadline),
        ("1h into the grace window", deadline + Duration::hours(1)),
        ("23h59m after the deadline", deadline + Duration::hours(23) + Duration::minutes(59)),
        ("24h after the deadline", deadline + Duration::hours(24)),
    ] {
        tracing::info!(
            "silent counterparty {label}: {:?}",
            settlement_status(&agreement, at)
        );
    }
    Ok(())
}
