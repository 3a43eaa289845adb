//! Service requests ("call server")
//!
//! A lightweight channel beside the order flow: the customer raises a
//! request, the dashboard shows it until staff acknowledge it. Repeated
//! taps intentionally create repeated requests; an ignored first call
//! followed by silence would be worse than a duplicate banner.

use crate::store::{server_timestamp, DocumentStore, Query, WriteBatch};
use serde_json::json;
use shared::models::{collections, RequestKind, RequestStatus, ServiceRequest};
use shared::{AppError, AppResult, ErrorCode};

/// Standing query for the dashboard: unacknowledged requests, newest
/// first.
pub fn new_requests_query(cafe_id: &str) -> Query {
    Query::collection(collections::REQUESTS)
        .where_eq("cafeId", cafe_id)
        .where_eq("status", RequestStatus::New.as_str())
        .order_by_desc("createdAt")
}

/// Raise a request from a table. No dedup.
pub async fn raise(
    store: &DocumentStore,
    cafe_id: &str,
    table_id: &str,
    kind: RequestKind,
) -> AppResult<ServiceRequest> {
    let id = store
        .add(
            collections::REQUESTS,
            json!({
                "cafeId": cafe_id,
                "tableId": table_id,
                "type": kind,
                "status": RequestStatus::New,
                "createdAt": server_timestamp(),
            }),
        )
        .await?;
    tracing::info!(cafe_id, table_id, request_id = %id, "service request raised");

    let doc = store
        .get(collections::REQUESTS, &id)
        .await
        .ok_or_else(|| AppError::store("request vanished after commit"))?;
    serde_json::from_value(doc).map_err(|e| AppError::store(e.to_string()))
}

/// Staff acknowledgement: flips the request to done, which drops it from
/// the dashboard's standing query.
pub async fn acknowledge(store: &DocumentStore, request_id: &str) -> AppResult<()> {
    store
        .commit(WriteBatch::new().update(
            collections::REQUESTS,
            request_id,
            vec![("status".to_string(), json!(RequestStatus::Done))],
        ))
        .await
        .map_err(|err| {
            if err.code == ErrorCode::NotFound {
                AppError::new(ErrorCode::RequestNotFound)
            } else {
                err
            }
        })
}
