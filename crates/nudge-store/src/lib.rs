//! Nudge Store - the Agreement repository
//!
//! Durable keyed storage for Agreement records, reduced to the contract the
//! lifecycle engine actually needs: create, point read by id, and an atomic
//! per-id read-modify-write update.
//!
//! # Atomicity contract
//!
//! `update` applies its mutation while holding that agreement's entry lock.
//! Two near-simultaneous actions on one id are serialized (each sees the
//! other's completed write) while actions on different ids proceed in
//! parallel with no shared locking. A mutation that returns an error leaves
//! the stored record untouched.

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::info;

use nudge_types::{Agreement, AgreementId, NudgeError, Result};

/// A mutation applied to one agreement under its entry lock
pub type MutateFn = Box<dyn FnOnce(&mut Agreement) -> Result<()> + Send>;

/// Repository contract for Agreement records
#[async_trait]
pub trait AgreementStore: Send + Sync {
    /// Store a newly created agreement. The id must be unused.
    async fn create(&self, agreement: Agreement) -> Result<()>;

    /// Point read by id
    async fn get(&self, id: &AgreementId) -> Result<Agreement>;

    /// Atomic read-modify-write on one agreement.
    ///
    /// Returns the record as it stands after the mutation. If the mutation
    /// fails the stored record is left unchanged and the error is returned.
    async fn update(&self, id: &AgreementId, mutate: MutateFn) -> Result<Agreement>;

    /// Most recently created agreements, newest first
    async fn recent(&self, limit: usize) -> Result<Vec<Agreement>>;
}

/// In-memory store keyed by agreement id.
///
/// Entry-level locking via `DashMap` provides the per-id serialization the
/// repository contract requires; state does not survive a process restart,
/// which is acceptable only behind the `AgreementStore` seam.
#[derive(Default)]
pub struct MemoryStore {
    agreements: DashMap<AgreementId, Agreement>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            agreements: DashMap::new(),
        }
    }

    /// Number of stored agreements
    pub fn len(&self) -> usize {
        self.agreements.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.agreements.is_empty()
    }
}

#[async_trait]
impl AgreementStore for MemoryStore {
    async fn create(&self, agreement: Agreement) -> Result<()> {
        let id = agreement.id;
        match self.agreements.entry(id) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(NudgeError::storage(format!(
                "agreement {id} already exists"
            ))),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(agreement);
                info!(agreement_id = %id, "agreement stored");
                Ok(())
            }
        }
    }

    async fn get(&self, id: &AgreementId) -> Result<Agreement> {
        self.agreements
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| NudgeError::not_found(id))
    }

    async fn update(&self, id: &AgreementId, mutate: MutateFn) -> Result<Agreement> {
        // The guard holds the entry's shard lock for the whole mutation.
        // Mutate a scratch copy so an errored mutation cannot leave a
        // partially written record behind.
        let mut entry = self
            .agreements
            .get_mut(id)
            .ok_or_else(|| NudgeError::not_found(id))?;
        let mut draft = entry.value().clone();
        mutate(&mut draft)?;
        *entry.value_mut() = draft.clone();
        Ok(draft)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<Agreement>> {
        let mut all: Vec<Agreement> = self
            .agreements
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all.truncate(limit);
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use nudge_types::{CapabilityToken, Side};
    use std::sync::Arc;

    fn agreement() -> Agreement {
        Agreement {
            id: AgreementId::new(),
            title: "Test".to_string(),
            action: "Do the thing".to_string(),
            deadline_minutes: 60,
            stake_a: 10.0,
            stake_b: 0.0,
            winner: Side::A,
            created_at: Utc::now(),
            accepted_a: false,
            accepted_b: false,
            outcome_a: None,
            outcome_b: None,
            ended_early_at: None,
            token_a: CapabilityToken::generate(),
            token_b: CapabilityToken::generate(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = MemoryStore::new();
        let a = agreement();
        let id = a.id;

        store.create(a).await.unwrap();
        let fetched = store.get(&id).await.unwrap();
        assert_eq!(fetched.id, id);
        assert_eq!(fetched.title, "Test");
    }

    #[tokio::test]
    async fn test_get_unknown_is_not_found() {
        let store = MemoryStore::new();
        let err = store.get(&AgreementId::new()).await.unwrap_err();
        assert!(matches!(err, NudgeError::AgreementNotFound { .. }));
    }

    #[tokio::test]
    async fn test_duplicate_create_rejected() {
        let store = MemoryStore::new();
        let a = agreement();
        store.create(a.clone()).await.unwrap();
        let err = store.create(a).await.unwrap_err();
        assert!(matches!(err, NudgeError::Storage { .. }));
    }

    #[tokio::test]
    async fn test_update_applies_mutation() {
        let store = MemoryStore::new();
        let a = agreement();
        let id = a.id;
        store.create(a).await.unwrap();

        let updated = store
            .update(
                &id,
                Box::new(|a| {
                    a.set_accepted(Side::A);
                    Ok(())
                }),
            )
            .await
            .unwrap();

        assert!(updated.accepted_a);
        assert!(store.get(&id).await.unwrap().accepted_a);
    }

    #[tokio::test]
    async fn test_failed_mutation_leaves_record_unchanged() {
        let store = MemoryStore::new();
        let a = agreement();
        let id = a.id;
        store.create(a).await.unwrap();

        let err = store
            .update(&id, Box::new(|_| Err(NudgeError::storage("boom"))))
            .await
            .unwrap_err();
        assert!(matches!(err, NudgeError::Storage { .. }));
        assert!(!store.get(&id).await.unwrap().accepted_a);
    }

    #[tokio::test]
    async fn test_concurrent_updates_are_serialized() {
        let store = Arc::new(MemoryStore::new());
        let a = agreement();
        let id = a.id;
        store.create(a).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..32 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .update(
                        &id,
                        Box::new(|a| {
                            // Abuse deadline_minutes as a counter to detect
                            // lost updates.
                            a.deadline_minutes += 1;
                            Ok(())
                        }),
                    )
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.get(&id).await.unwrap().deadline_minutes, 60 + 32);
    }

    #[tokio::test]
    async fn test_recent_is_newest_first() {
        let store = MemoryStore::new();
        let mut first = agreement();
        first.created_at = Utc::now() - Duration::minutes(5);
        let mut second = agreement();
        second.created_at = Utc::now();
        let newest = second.id;

        store.create(first).await.unwrap();
        store.create(second).await.unwrap();

        let recent = store.recent(10).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, newest);

        let capped = store.recent(1).await.unwrap();
        assert_eq!(capped.len(), 1);
    }
}
