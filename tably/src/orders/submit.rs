//! Order submission protocol
//!
//! One atomic batch performs the whole cart-to-order transition:
//!
//! 1. create the order (status Pending, frozen lines, computed total,
//!    server timestamp)
//! 2. create the idempotency record for this attempt's token - a reused
//!    token makes this create fail, aborting the batch
//! 3. flip the cafe's table cell to Occupied with a bumped version
//!
//! A half-applied result (order without occupancy flip, or vice versa)
//! would corrupt the floor-status view staff seat customers by, so the
//! three writes never commit independently. On failure the caller's cart
//! is untouched and the customer can retry with a fresh token.

use crate::cart::Cart;
use crate::store::{server_timestamp, DocumentStore, WriteBatch};
use serde_json::json;
use shared::models::{collections, Cafe, Order, OrderStatus};
use shared::{AppError, AppResult, ErrorCode};

/// Idempotency token for one submission attempt. A retry after a
/// reported failure gets a fresh token; a duplicate delivery of the same
/// attempt does not.
pub fn new_submission_token() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Commit a non-empty cart as a new order for (cafe, table).
///
/// Returns the persisted order with its server-assigned timestamp.
/// The caller clears the cart only after this returns `Ok`.
pub async fn submit_order(
    store: &DocumentStore,
    cafe_id: &str,
    table_id: &str,
    cart: &Cart,
    token: &str,
) -> AppResult<Order> {
    if cart.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyCart));
    }

    let cafe_doc = store
        .get(collections::CAFES, cafe_id)
        .await
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::CafeNotFound, format!("Cafe \"{}\" not found", cafe_id))
        })?;
    let cafe: Cafe = serde_json::from_value(cafe_doc)
        .map_err(|e| AppError::store(format!("malformed cafe document: {}", e)))?;
    let cell = cafe.table(table_id).ok_or_else(|| {
        AppError::with_message(
            ErrorCode::TableNotFound,
            format!("Table \"{}\" not found at {}", table_id, cafe.name),
        )
    })?;
    let occupied = cell.occupied();

    let order_id = uuid::Uuid::new_v4().to_string();
    let items = serde_json::to_value(cart.to_order_lines())
        .map_err(|e| AppError::internal(e.to_string()))?;

    let batch = WriteBatch::new()
        .create(
            collections::ORDERS,
            order_id.clone(),
            json!({
                "cafeId": cafe_id,
                "tableId": table_id,
                "items": items,
                "total": cart.total(),
                "status": OrderStatus::Pending,
                "createdAt": server_timestamp(),
                "occupancyCycle": occupied.version,
            }),
        )
        .create(
            collections::SUBMISSIONS,
            token.to_string(),
            json!({
                "cafeId": cafe_id,
                "tableId": table_id,
                "orderId": order_id.clone(),
                "createdAt": server_timestamp(),
            }),
        )
        .update(
            collections::CAFES,
            cafe_id.to_string(),
            vec![(
                format!("tableStatus.{}", table_id),
                serde_json::to_value(occupied).map_err(|e| AppError::internal(e.to_string()))?,
            )],
        );

    store.commit(batch).await.map_err(|err| {
        if err.code == ErrorCode::AlreadyExists {
            AppError::new(ErrorCode::DuplicateSubmission)
        } else {
            err
        }
    })?;

    tracing::info!(order_id = %order_id, cafe_id, table_id, total = cart.total(), "order placed");

    let doc = store
        .get(collections::ORDERS, &order_id)
        .await
        .ok_or_else(|| AppError::store("order vanished after commit"))?;
    serde_json::from_value(doc).map_err(|e| AppError::store(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cafes;
    use shared::models::{CafeCreate, MenuItem, TableState};

    async fn seed_cafe(store: &DocumentStore) -> String {
        cafes::onboard_cafe(
            store,
            &CafeCreate {
                name: "Demo Cafe".into(),
                address: "1 Bay St".into(),
                table_count: 3,
            },
        )
        .await
        .unwrap()
        .id
    }

    fn latte() -> MenuItem {
        MenuItem {
            id: "latte".into(),
            cafe_id: "ignored".into(),
            name: "Latte".into(),
            description: String::new(),
            price: 4.0,
            category: "Beverages".into(),
            available: true,
            modifiers: Vec::new(),
            image_url: None,
        }
    }

    #[tokio::test]
    async fn submission_creates_order_and_occupies_table() {
        let store = DocumentStore::new();
        let cafe_id = seed_cafe(&store).await;

        let mut cart = Cart::new();
        cart.add_simple(&latte());
        cart.add_simple(&latte());

        let order = submit_order(&store, &cafe_id, "T1", &cart, &new_submission_token())
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total, 8.0);
        assert_eq!(order.occupancy_cycle, 1);
        assert!(!order.created_at.is_empty());

        let cafe: Cafe =
            serde_json::from_value(store.get(collections::CAFES, &cafe_id).await.unwrap())
                .unwrap();
        let cell = cafe.table("T1").unwrap();
        assert_eq!(cell.status, TableState::Occupied);
        assert_eq!(cell.version, 1);
        // Other tables untouched
        assert!(cafe.table("T2").unwrap().is_vacant());
    }

    #[tokio::test]
    async fn empty_cart_is_rejected_before_io() {
        let store = DocumentStore::new();
        let err = submit_order(&store, "whatever", "T1", &Cart::new(), "tok")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyCart);
    }

    #[tokio::test]
    async fn unknown_cafe_and_table_are_terminal() {
        let store = DocumentStore::new();
        let mut cart = Cart::new();
        cart.add_simple(&latte());

        let err = submit_order(&store, "missing", "T1", &cart, "tok")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CafeNotFound);

        let cafe_id = seed_cafe(&store).await;
        let err = submit_order(&store, &cafe_id, "T99", &cart, "tok")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::TableNotFound);
    }

    #[tokio::test]
    async fn reused_token_aborts_the_whole_batch() {
        let store = DocumentStore::new();
        let cafe_id = seed_cafe(&store).await;

        let mut cart = Cart::new();
        cart.add_simple(&latte());

        let token = new_submission_token();
        submit_order(&store, &cafe_id, "T1", &cart, &token)
            .await
            .unwrap();

        // Same token again: no new order, occupancy untouched.
        let err = submit_order(&store, &cafe_id, "T2", &cart, &token)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateSubmission);

        let orders = store
            .run_query(&crate::store::Query::collection(collections::ORDERS))
            .await;
        assert_eq!(orders.len(), 1);

        let cafe: Cafe =
            serde_json::from_value(store.get(collections::CAFES, &cafe_id).await.unwrap())
                .unwrap();
        assert!(cafe.table("T2").unwrap().is_vacant());
        assert_eq!(cafe.table("T2").unwrap().version, 0);
    }

    #[tokio::test]
    async fn order_total_is_frozen_against_menu_edits() {
        let store = DocumentStore::new();
        let cafe_id = seed_cafe(&store).await;

        let mut cart = Cart::new();
        cart.add_simple(&latte());
        let order = submit_order(&store, &cafe_id, "T1", &cart, &new_submission_token())
            .await
            .unwrap();
        assert_eq!(order.total, 4.0);

        // Later menu edits and deletes never touch the frozen snapshot.
        let fetched: Order =
            serde_json::from_value(store.get(collections::ORDERS, &order.id).await.unwrap())
                .unwrap();
        assert_eq!(fetched.items[0].price, 4.0);
        assert_eq!(fetched.total, 4.0);
    }
}
