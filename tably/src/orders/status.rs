//! Order status progression
//!
//! Transitions are performed only by staff clients and only move
//! forward. The `Paid` transition stamps `paidAt` and vacates the
//! order's table in the SAME batch as the status write - a crash can
//! never leave a paid order against a still-occupied table.

use crate::store::{server_timestamp, DocumentStore, WriteBatch};
use serde_json::json;
use shared::models::{collections, Cafe, Order, OrderStatus};
use shared::{AppError, AppResult, ErrorCode};

/// Advance an order to `next`. Backward or repeated transitions are
/// rejected; only `Paid` carries side effects.
pub async fn advance_status(
    store: &DocumentStore,
    order_id: &str,
    next: OrderStatus,
) -> AppResult<Order> {
    let doc = store
        .get(collections::ORDERS, order_id)
        .await
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
    let order: Order = serde_json::from_value(doc)
        .map_err(|e| AppError::store(format!("malformed order document: {}", e)))?;

    if !order.status.can_advance_to(next) {
        return Err(AppError::with_message(
            ErrorCode::InvalidStatusTransition,
            format!(
                "cannot move order from {} to {}",
                order.status.as_str(),
                next.as_str()
            ),
        )
        .with_detail("from", order.status.as_str())
        .with_detail("to", next.as_str()));
    }

    let mut batch = WriteBatch::new();
    if next == OrderStatus::Paid {
        batch = batch.update(
            collections::ORDERS,
            order_id.to_string(),
            vec![
                ("status".to_string(), json!(OrderStatus::Paid)),
                ("paidAt".to_string(), server_timestamp()),
            ],
        );
        // Vacate the table in the same batch. A table the owner has since
        // removed is left alone rather than resurrected.
        if let Some(cafe_doc) = store.get(collections::CAFES, &order.cafe_id).await {
            let cafe: Cafe = serde_json::from_value(cafe_doc)
                .map_err(|e| AppError::store(format!("malformed cafe document: {}", e)))?;
            if let Some(cell) = cafe.table(&order.table_id) {
                batch = batch.update(
                    collections::CAFES,
                    order.cafe_id.clone(),
                    vec![(
                        format!("tableStatus.{}", order.table_id),
                        serde_json::to_value(cell.vacated())
                            .map_err(|e| AppError::internal(e.to_string()))?,
                    )],
                );
            } else {
                tracing::warn!(
                    table_id = %order.table_id,
                    "paid order references a removed table; skipping vacate"
                );
            }
        }
    } else {
        batch = batch.update(
            collections::ORDERS,
            order_id.to_string(),
            vec![("status".to_string(), json!(next))],
        );
    }

    store.commit(batch).await?;
    tracing::info!(order_id, table_id = %order.table_id, status = next.as_str(), "order status advanced");

    let doc = store
        .get(collections::ORDERS, order_id)
        .await
        .ok_or_else(|| AppError::store("order vanished after commit"))?;
    serde_json::from_value(doc).map_err(|e| AppError::store(e.to_string()))
}
