//! Customer session
//!
//! One seated customer at one (cafe, table). Holds the session cart,
//! three standing queries - the available menu, the cafe document for
//! its display details, and the newest order for this table - and the
//! reduced [`TrackedOrder`] state the screen renders from.

use super::latest_order::{reduce, TrackedOrder};
use crate::cart::Cart;
use crate::menu::customer_menu_query;
use crate::orders::{new_submission_token, submit_order};
use crate::requests;
use crate::store::{DocumentStore, Query, Subscription};
use parking_lot::Mutex;
use shared::models::{collections, Cafe, MenuItem, Order, RequestKind, ServiceRequest};
use shared::{AppError, AppResult, ErrorCode};
use std::sync::atomic::{AtomicBool, Ordering};

/// Newest order for one table, or nothing
pub fn latest_order_query(cafe_id: &str, table_id: &str) -> Query {
    Query::collection(collections::ORDERS)
        .where_eq("cafeId", cafe_id)
        .where_eq("tableId", table_id)
        .order_by_desc("createdAt")
        .with_limit(1)
}

pub struct CustomerSession {
    store: DocumentStore,
    cafe_id: String,
    table_id: String,
    cart: Mutex<Cart>,
    /// Set for the duration of one submission; a second tap while the
    /// first is still committing is rejected, not queued.
    in_flight: AtomicBool,
    menu_sub: Subscription,
    cafe_sub: Subscription,
    order_sub: Subscription,
    tracked: Mutex<TrackedOrder>,
}

impl CustomerSession {
    /// Open a session for a seated customer. The subscriptions start
    /// delivering immediately; the initial order delivery is reduced so
    /// a stale paid order never greets a new customer.
    pub fn open(store: &DocumentStore, cafe_id: &str, table_id: &str) -> Self {
        let session = Self {
            store: store.clone(),
            cafe_id: cafe_id.to_string(),
            table_id: table_id.to_string(),
            cart: Mutex::new(Cart::new()),
            in_flight: AtomicBool::new(false),
            menu_sub: store.watch(customer_menu_query(cafe_id)),
            cafe_sub: store.watch(Query::doc(collections::CAFES, cafe_id)),
            order_sub: store.watch(latest_order_query(cafe_id, table_id)),
            tracked: Mutex::new(TrackedOrder::None),
        };
        session.apply_order_delivery();
        session
    }

    pub fn cafe_id(&self) -> &str {
        &self.cafe_id
    }

    pub fn table_id(&self) -> &str {
        &self.table_id
    }

    /// Latest delivered menu, already filtered to available items
    pub fn menu(&self) -> Vec<MenuItem> {
        self.menu_sub.current_as()
    }

    /// Latest delivered cafe document, if the cafe still exists
    pub fn cafe(&self) -> Option<Cafe> {
        self.cafe_sub.current_as().into_iter().next()
    }

    /// Run the caller's edits against the session cart
    pub fn with_cart<R>(&self, f: impl FnOnce(&mut Cart) -> R) -> R {
        f(&mut self.cart.lock())
    }

    /// What the order strip currently shows
    pub fn tracked_order(&self) -> TrackedOrder {
        self.tracked.lock().clone()
    }

    /// Suspend until the next latest-order delivery, fold it, and return
    /// the new tracked state.
    pub async fn order_changed(&mut self) -> AppResult<TrackedOrder> {
        self.order_sub.changed().await?;
        Ok(self.apply_order_delivery())
    }

    fn apply_order_delivery(&self) -> TrackedOrder {
        let incoming: Option<Order> = self.order_sub.current_as().into_iter().next();
        let mut tracked = self.tracked.lock();
        let next = reduce(&tracked, incoming);
        *tracked = next;
        tracked.clone()
    }

    /// Submit the session cart as an order. The cart is cleared only on
    /// success; on failure it stays intact for the retry.
    pub async fn place_order(&self) -> AppResult<Order> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Err(AppError::new(ErrorCode::SubmissionInFlight));
        }
        let cart = self.cart.lock().clone();
        let result = submit_order(
            &self.store,
            &self.cafe_id,
            &self.table_id,
            &cart,
            &new_submission_token(),
        )
        .await;
        self.in_flight.store(false, Ordering::SeqCst);

        let order = result?;
        self.cart.lock().clear();
        Ok(order)
    }

    /// Tap the "call server" button
    pub async fn call_server(&self) -> AppResult<ServiceRequest> {
        requests::raise(
            &self.store,
            &self.cafe_id,
            &self.table_id,
            RequestKind::ServerCall,
        )
        .await
    }

    /// Refill the cart from a past order at its historical prices
    pub fn reorder(&self, order: &Order) {
        let mut cart = self.cart.lock();
        *cart = Cart::from_order(order);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cafes;
    use crate::menu::create_item;
    use crate::orders::advance_status;
    use shared::models::{CafeCreate, MenuItemCreate, OrderStatus};

    async fn seed(store: &DocumentStore) -> String {
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
        create_item(
            store,
            &cafe.id,
            &MenuItemCreate {
                name: "Latte".into(),
                description: String::new(),
                price: 4.0,
                category: "Beverages".into(),
                available: true,
                modifiers: Vec::new(),
                image_url: None,
            },
        )
        .await
        .unwrap();
        cafe.id
    }

    #[tokio::test]
    async fn session_sees_menu_and_places_an_order() {
        let store = DocumentStore::new();
        let cafe_id = seed(&store).await;
        let mut session = CustomerSession::open(&store, &cafe_id, "T1");

        // Seeded before open, so the initial snapshot already has it.
        let menu = session.menu();
        assert_eq!(menu.len(), 1);

        session.with_cart(|cart| {
            cart.add_simple(&menu[0]);
        });
        let order = session.place_order().await.unwrap();
        assert_eq!(order.total, 4.0);
        // Cart cleared on success
        assert!(session.with_cart(|cart| cart.is_empty()));

        let tracked = session.order_changed().await.unwrap();
        assert_eq!(tracked.order().unwrap().id, order.id);
        assert!(matches!(tracked, TrackedOrder::Active(_)));
    }

    #[tokio::test]
    async fn empty_cart_submission_keeps_session_usable() {
        let store = DocumentStore::new();
        let cafe_id = seed(&store).await;
        let session = CustomerSession::open(&store, &cafe_id, "T1");

        let err = session.place_order().await.unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyCart);
        // The in-flight flag was released; a real order still goes through.
        let menu: Vec<MenuItem> = store
            .run_query(&customer_menu_query(&cafe_id))
            .await
            .into_iter()
            .map(|doc| serde_json::from_value(doc).unwrap())
            .collect();
        session.with_cart(|cart| {
            cart.add_simple(&menu[0]);
        });
        session.place_order().await.unwrap();
    }

    #[tokio::test]
    async fn paid_order_shows_complete_once_then_clears() {
        let store = DocumentStore::new();
        let cafe_id = seed(&store).await;
        let mut session = CustomerSession::open(&store, &cafe_id, "T1");
        let menu = session.menu();
        session.with_cart(|cart| {
            cart.add_simple(&menu[0]);
        });
        let order = session.place_order().await.unwrap();
        session.order_changed().await.unwrap();

        advance_status(&store, &order.id, OrderStatus::Paid)
            .await
            .unwrap();
        let tracked = session.order_changed().await.unwrap();
        assert!(matches!(tracked, TrackedOrder::Complete(_)));

        // A fresh session at the same table starts clean.
        let newcomer = CustomerSession::open(&store, &cafe_id, "T1");
        assert_eq!(newcomer.tracked_order(), TrackedOrder::None);
    }

    #[tokio::test]
    async fn reorder_refills_cart_at_historical_prices() {
        let store = DocumentStore::new();
        let cafe_id = seed(&store).await;
        let session = CustomerSession::open(&store, &cafe_id, "T1");
        let menu: Vec<MenuItem> = store
            .run_query(&customer_menu_query(&cafe_id))
            .await
            .into_iter()
            .map(|doc| serde_json::from_value(doc).unwrap())
            .collect();
        session.with_cart(|cart| {
            cart.add_simple(&menu[0]);
        });
        let order = session.place_order().await.unwrap();

        session.reorder(&order);
        assert_eq!(session.with_cart(|cart| cart.total()), 4.0);
    }
}
