//! Document store model
//!
//! The external managed document database, specified at its interface:
//! flat named collections of JSON documents, filtered/sorted/limited
//! queries, atomic multi-document batches, and live subscriptions that
//! re-deliver the full matching result set on every qualifying change.
//!
//! The in-process implementation backs tests and local operation. Clients
//! only ever touch [`DocumentStore`], [`Query`], [`WriteBatch`] and
//! [`Subscription`]; nothing above this module knows how documents are
//! held.
//!
//! # Change flow
//!
//! ```text
//! commit(batch) ──▶ apply all ops under one write lock
//!                        │
//!                        ▼
//!            broadcast touched collections
//!                        │
//!          ┌─────────────┼─────────────┐
//!          ▼             ▼             ▼
//!     Subscription  Subscription  Subscription
//!     (re-runs its query, pushes the full result set)
//! ```

mod batch;
mod query;
mod subscription;

pub use batch::{server_timestamp, FieldWrite, WriteBatch, WriteOp};
pub use query::{compare_values, field_path, Direction, Filter, FilterOp, OrderBy, Query};
pub use subscription::Subscription;

use batch::{apply_field_write, is_server_timestamp};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use shared::{AppError, AppResult};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;

/// Capacity of the change-notification channel
const CHANGE_CHANNEL_CAPACITY: usize = 1024;

/// In-process document store with push-based subscriptions
///
/// Cheap to clone; all clones share the same collections.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    inner: Arc<StoreInner>,
}

#[derive(Debug)]
struct StoreInner {
    /// collection name -> document id -> document
    data: RwLock<HashMap<String, BTreeMap<String, Value>>>,
    /// Collections touched by each committed batch
    changes: broadcast::Sender<Arc<HashSet<String>>>,
    /// Monotonic server clock for `createdAt`/`paidAt` stamps
    clock: Mutex<DateTime<Utc>>,
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(StoreInner {
                data: RwLock::new(HashMap::new()),
                changes,
                clock: Mutex::new(DateTime::<Utc>::MIN_UTC),
            }),
        }
    }

    /// One commit-wide server instant, strictly increasing across commits
    /// so `createdAt` ordering is total even for rapid submissions.
    fn server_now(&self) -> String {
        let mut clock = self.inner.clock.lock();
        let mut now = Utc::now();
        if now <= *clock {
            now = *clock + Duration::microseconds(1);
        }
        *clock = now;
        now.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    /// Commit a batch atomically. Validation runs over every operation
    /// before anything is applied, so a failing op leaves no trace of the
    /// others.
    pub async fn commit(&self, batch: WriteBatch) -> AppResult<()> {
        if batch.is_empty() {
            return Ok(());
        }
        let mut touched: HashSet<String> = HashSet::new();
        {
            let mut data = self.inner.data.write();

            // Validation pass: nothing is mutated until every op is legal.
            for op in &batch.ops {
                match op {
                    WriteOp::Create { collection, id, .. } => {
                        if data
                            .get(collection)
                            .is_some_and(|coll| coll.contains_key(id))
                        {
                            return Err(AppError::already_exists(format!(
                                "{}/{}",
                                collection, id
                            )));
                        }
                    }
                    WriteOp::Update { collection, id, .. } => {
                        if !data
                            .get(collection)
                            .is_some_and(|coll| coll.contains_key(id))
                        {
                            return Err(AppError::not_found(format!("{}/{}", collection, id)));
                        }
                    }
                    WriteOp::Set { .. } | WriteOp::Delete { .. } => {}
                }
            }

            let now = self.server_now();
            for op in batch.ops {
                match op {
                    WriteOp::Create {
                        collection,
                        id,
                        data: mut doc,
                    }
                    | WriteOp::Set {
                        collection,
                        id,
                        data: mut doc,
                    } => {
                        resolve_timestamps(&mut doc, &now);
                        if let Some(obj) = doc.as_object_mut() {
                            obj.insert("id".to_string(), Value::String(id.clone()));
                        }
                        touched.insert(collection.clone());
                        data.entry(collection).or_default().insert(id, doc);
                    }
                    WriteOp::Update {
                        collection,
                        id,
                        fields,
                    } => {
                        let doc = data
                            .get_mut(&collection)
                            .and_then(|coll| coll.get_mut(&id))
                            .expect("validated above");
                        for (path, mut write) in fields {
                            if let FieldWrite::Set(value) = &mut write {
                                resolve_timestamps(value, &now);
                            }
                            apply_field_write(doc, &path, &write);
                        }
                        touched.insert(collection);
                    }
                    WriteOp::Delete { collection, id } => {
                        if data
                            .get_mut(&collection)
                            .and_then(|coll| coll.remove(&id))
                            .is_some()
                        {
                            touched.insert(collection);
                        }
                    }
                }
            }
        }
        if !touched.is_empty() {
            // No subscribers is fine; send only fails when none exist.
            let _ = self.inner.changes.send(Arc::new(touched));
        }
        Ok(())
    }

    /// Create a single document with a generated id
    pub async fn add(&self, collection: &str, data: Value) -> AppResult<String> {
        let id = uuid::Uuid::new_v4().to_string();
        self.commit(WriteBatch::new().create(collection, id.clone(), data))
            .await?;
        Ok(id)
    }

    /// Read one document by id
    pub async fn get(&self, collection: &str, id: &str) -> Option<Value> {
        self.inner
            .data
            .read()
            .get(collection)
            .and_then(|coll| coll.get(id))
            .cloned()
    }

    /// One-shot query execution
    pub async fn run_query(&self, query: &Query) -> Vec<Value> {
        self.snapshot(query)
    }

    fn snapshot(&self, query: &Query) -> Vec<Value> {
        let data = self.inner.data.read();
        let mut matched: Vec<Value> = data
            .get(&query.collection)
            .map(|coll| {
                coll.values()
                    .filter(|doc| query.matches(doc))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        query.apply_order_and_limit(&mut matched);
        matched
    }

    /// Attach a live subscription: the current result set is delivered
    /// immediately, and the full result set is re-delivered whenever a
    /// commit touching this collection changes it. The subscription is
    /// torn down when the returned handle is dropped.
    pub fn watch(&self, query: Query) -> Subscription {
        // Subscribe to changes before taking the initial snapshot so no
        // commit can fall between the two.
        let mut changes = self.inner.changes.subscribe();
        let initial = self.snapshot(&query);
        let (tx, rx) = watch::channel(initial);
        let cancel = CancellationToken::new();

        let store = self.clone();
        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = task_cancel.cancelled() => break,
                    msg = changes.recv() => {
                        let refresh = match msg {
                            Ok(touched) => touched.contains(&query.collection),
                            // Missed notifications: refresh unconditionally.
                            Err(broadcast::error::RecvError::Lagged(_)) => true,
                            Err(broadcast::error::RecvError::Closed) => break,
                        };
                        if refresh {
                            let snapshot = store.snapshot(&query);
                            let delivered = tx.send_if_modified(|current| {
                                if *current != snapshot {
                                    *current = snapshot;
                                    true
                                } else {
                                    false
                                }
                            });
                            if !delivered && tx.is_closed() {
                                break;
                            }
                        }
                    }
                }
            }
        });

        Subscription::new(rx, cancel)
    }
}

/// Replace server-timestamp sentinels anywhere in the value tree
fn resolve_timestamps(value: &mut Value, now: &str) {
    if is_server_timestamp(value) {
        *value = Value::String(now.to_string());
        return;
    }
    match value {
        Value::Object(map) => {
            for child in map.values_mut() {
                resolve_timestamps(child, now);
            }
        }
        Value::Array(items) => {
            for child in items.iter_mut() {
                resolve_timestamps(child, now);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn create_then_get() {
        let store = DocumentStore::new();
        let id = store
            .add("cafes", json!({"name": "Demo", "createdAt": server_timestamp()}))
            .await
            .unwrap();
        let doc = store.get("cafes", &id).await.unwrap();
        assert_eq!(doc["name"], "Demo");
        assert_eq!(doc["id"], json!(id));
        // Sentinel resolved to an RFC3339 string
        assert!(doc["createdAt"].as_str().unwrap().ends_with('Z'));
    }

    #[tokio::test]
    async fn failed_batch_applies_nothing() {
        let store = DocumentStore::new();
        store
            .commit(WriteBatch::new().create("submissions", "tok-1", json!({})))
            .await
            .unwrap();

        // Second batch: order create + duplicate token create + update.
        let result = store
            .commit(
                WriteBatch::new()
                    .create("orders", "o-1", json!({"total": 12.25}))
                    .create("submissions", "tok-1", json!({})),
            )
            .await;
        assert!(result.is_err());
        assert!(store.get("orders", "o-1").await.is_none());
    }

    #[tokio::test]
    async fn update_requires_existing_document() {
        let store = DocumentStore::new();
        let result = store
            .commit(WriteBatch::new().update("cafes", "missing", vec![("name".into(), json!("x"))]))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn server_instants_strictly_increase() {
        let store = DocumentStore::new();
        let a = store.add("orders", json!({"createdAt": server_timestamp()})).await.unwrap();
        let b = store.add("orders", json!({"createdAt": server_timestamp()})).await.unwrap();
        let ta = store.get("orders", &a).await.unwrap()["createdAt"]
            .as_str()
            .unwrap()
            .to_string();
        let tb = store.get("orders", &b).await.unwrap()["createdAt"]
            .as_str()
            .unwrap()
            .to_string();
        assert!(tb > ta);
    }

    #[tokio::test]
    async fn watch_redelivers_full_result_set() {
        let store = DocumentStore::new();
        let query = Query::collection("orders").where_eq("cafeId", "c1");
        let mut sub = store.watch(query);
        assert!(sub.current().is_empty());

        store
            .add("orders", json!({"cafeId": "c1", "total": 4.0}))
            .await
            .unwrap();
        sub.changed().await.unwrap();
        assert_eq!(sub.current().len(), 1);

        store
            .add("orders", json!({"cafeId": "c1", "total": 3.5}))
            .await
            .unwrap();
        sub.changed().await.unwrap();
        // Entire result set, not a diff
        assert_eq!(sub.current().len(), 2);
    }

    #[tokio::test]
    async fn watch_ignores_other_collections() {
        let store = DocumentStore::new();
        let mut sub = store.watch(Query::collection("orders"));
        store.add("requests", json!({"cafeId": "c1"})).await.unwrap();

        // Give the subscription task a chance to (not) deliver.
        tokio::task::yield_now().await;
        let waited = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            sub.changed(),
        )
        .await;
        assert!(waited.is_err(), "no delivery expected for another collection");
    }
}
