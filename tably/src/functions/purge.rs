//! Bulk data purge
//!
//! Owners periodically clear out old orders and service requests. The
//! store caps how many documents one batch may delete, so the purge
//! loops: query up to a batch of stale documents, delete them in one
//! commit, and repeat while a full batch came back. Counts are summed
//! across both collections.

use crate::store::{DocumentStore, Query, WriteBatch};
use chrono::{Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::models::{collections, Cafe};
use shared::{AppError, AppResult, ErrorCode};

/// Default documents-per-batch cap
pub const PURGE_BATCH_SIZE: usize = 100;

/// Wire request for the purge callable
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurgeRequest {
    pub cafe_id: String,
    pub days_to_keep: u32,
}

/// Wire response for the purge callable
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurgeOutcome {
    pub success: bool,
    pub deleted_count: u64,
}

/// Delete every order and service request of `cafe_id` created more than
/// `days_to_keep` days ago. The caller must be the cafe's linked owner.
pub async fn purge_old_data(
    store: &DocumentStore,
    caller_uid: &str,
    cafe_id: &str,
    days_to_keep: u32,
    batch_size: usize,
) -> AppResult<PurgeOutcome> {
    if days_to_keep == 0 {
        return Err(AppError::invalid_argument("daysToKeep must be at least 1"));
    }

    let cafe_doc = store
        .get(collections::CAFES, cafe_id)
        .await
        .ok_or_else(|| AppError::new(ErrorCode::CafeNotFound))?;
    let cafe: Cafe = serde_json::from_value(cafe_doc)
        .map_err(|e| AppError::store(format!("malformed cafe document: {}", e)))?;
    if cafe.owner_user_id != caller_uid {
        return Err(AppError::with_message(
            ErrorCode::NotCafeOwner,
            "Only the cafe owner may purge its data",
        ));
    }

    let cutoff = (Utc::now() - Duration::days(i64::from(days_to_keep)))
        .to_rfc3339_opts(SecondsFormat::Micros, true);

    let mut deleted_count = 0u64;
    for collection in [collections::ORDERS, collections::REQUESTS] {
        deleted_count += purge_collection(store, collection, cafe_id, &cutoff, batch_size).await?;
    }
    tracing::info!(cafe_id, days_to_keep, deleted_count, "purge completed");

    Ok(PurgeOutcome {
        success: true,
        deleted_count,
    })
}

async fn purge_collection(
    store: &DocumentStore,
    collection: &str,
    cafe_id: &str,
    cutoff: &str,
    batch_size: usize,
) -> AppResult<u64> {
    let mut deleted = 0u64;
    loop {
        let stale = store
            .run_query(
                &Query::collection(collection)
                    .where_eq("cafeId", cafe_id)
                    .where_lt("createdAt", cutoff)
                    .with_limit(batch_size),
            )
            .await;
        if stale.is_empty() {
            break;
        }
        let fetched = stale.len();
        let mut batch = WriteBatch::new();
        for doc in &stale {
            let Some(id) = doc.get("id").and_then(Value::as_str) else {
                continue;
            };
            batch = batch.delete(collection, id);
        }
        store.commit(batch).await?;
        deleted += fetched as u64;
        // A short batch means the backlog is drained.
        if fetched < batch_size {
            break;
        }
    }
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cafes;
    use serde_json::json;
    use shared::models::CafeCreate;

    async fn seed_cafe(store: &DocumentStore, owner_uid: &str) -> String {
        let cafe = cafes::onboard_cafe(
            store,
            &CafeCreate {
                name: "Demo Cafe".into(),
                address: "1 Bay St".into(),
                table_count: 2,
            },
        )
        .await
        .unwrap();
        store
            .commit(WriteBatch::new().update(
                collections::CAFES,
                cafe.id.clone(),
                vec![("ownerUserId".to_string(), json!(owner_uid))],
            ))
            .await
            .unwrap();
        cafe.id
    }

    async fn seed_doc(store: &DocumentStore, collection: &str, cafe_id: &str, created_at: &str) {
        store
            .add(
                collection,
                json!({"cafeId": cafe_id, "createdAt": created_at}),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn purge_removes_only_stale_documents() {
        let store = DocumentStore::new();
        let cafe_id = seed_cafe(&store, "owner-1").await;

        seed_doc(&store, collections::ORDERS, &cafe_id, "2020-01-01T00:00:00.000000Z").await;
        seed_doc(&store, collections::REQUESTS, &cafe_id, "2020-01-02T00:00:00.000000Z").await;
        // Fresh document, stamped now
        let fresh = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        seed_doc(&store, collections::ORDERS, &cafe_id, &fresh).await;
        // Another cafe's data is out of scope
        seed_doc(&store, collections::ORDERS, "other", "2020-01-01T00:00:00.000000Z").await;

        let outcome = purge_old_data(&store, "owner-1", &cafe_id, 30, PURGE_BATCH_SIZE)
            .await
            .unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.deleted_count, 2);

        let remaining = store
            .run_query(&Query::collection(collections::ORDERS))
            .await;
        assert_eq!(remaining.len(), 2); // fresh + other cafe
    }

    #[tokio::test]
    async fn purge_loops_through_full_batches() {
        let store = DocumentStore::new();
        let cafe_id = seed_cafe(&store, "owner-1").await;
        for _ in 0..5 {
            seed_doc(&store, collections::ORDERS, &cafe_id, "2020-01-01T00:00:00.000000Z").await;
        }

        let outcome = purge_old_data(&store, "owner-1", &cafe_id, 30, 2)
            .await
            .unwrap();
        assert_eq!(outcome.deleted_count, 5);
        assert!(store
            .run_query(&Query::collection(collections::ORDERS))
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn only_the_linked_owner_may_purge() {
        let store = DocumentStore::new();
        let cafe_id = seed_cafe(&store, "owner-1").await;

        let err = purge_old_data(&store, "intruder", &cafe_id, 30, PURGE_BATCH_SIZE)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotCafeOwner);
        assert!(err.is_permission());

        let err = purge_old_data(&store, "owner-1", "missing", 30, PURGE_BATCH_SIZE)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CafeNotFound);

        let err = purge_old_data(&store, "owner-1", &cafe_id, 0, PURGE_BATCH_SIZE)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidArgument);
    }
}
