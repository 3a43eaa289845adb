//! Owner dashboard
//!
//! Staff-side live view over one cafe: the kitchen queue of active
//! orders, unacknowledged service requests, and the table occupancy
//! grid. All three are standing queries; actions delegate to the order
//! and request modules.

use crate::orders::{self, advance_status};
use crate::requests;
use crate::store::{DocumentStore, Query, Subscription};
use shared::models::{collections, Cafe, Order, OrderStatus, ServiceRequest};
use shared::AppResult;

/// Kitchen queue: active orders grouped by status, oldest first within
/// each group. The wire statuses sort Pending, Preparing, Ready for
/// Delivery lexically, which is exactly the service order.
pub fn kitchen_queue_query(cafe_id: &str) -> Query {
    Query::collection(collections::ORDERS)
        .where_eq("cafeId", cafe_id)
        .where_ne("status", OrderStatus::Paid.as_str())
        .order_by_asc("status")
        .order_by_asc("createdAt")
}

pub struct OwnerDashboard {
    store: DocumentStore,
    cafe_id: String,
    orders_sub: Subscription,
    requests_sub: Subscription,
    cafe_sub: Subscription,
}

impl OwnerDashboard {
    pub fn open(store: &DocumentStore, cafe_id: &str) -> Self {
        Self {
            store: store.clone(),
            cafe_id: cafe_id.to_string(),
            orders_sub: store.watch(kitchen_queue_query(cafe_id)),
            requests_sub: store.watch(requests::new_requests_query(cafe_id)),
            cafe_sub: store.watch(Query::doc(collections::CAFES, cafe_id)),
        }
    }

    pub fn cafe_id(&self) -> &str {
        &self.cafe_id
    }

    /// The live kitchen queue
    pub fn active_orders(&self) -> Vec<Order> {
        self.orders_sub.current_as()
    }

    /// Unacknowledged service requests, newest first
    pub fn pending_requests(&self) -> Vec<ServiceRequest> {
        self.requests_sub.current_as()
    }

    /// The cafe document backing the occupancy grid
    pub fn cafe(&self) -> Option<Cafe> {
        self.cafe_sub.current_as().into_iter().next()
    }

    /// Tables with concurrent orders from the same occupancy cycle,
    /// surfaced as a banner for staff to resolve in person.
    pub fn double_booked(&self) -> Vec<String> {
        orders::double_booked_tables(&self.active_orders())
    }

    /// Suspend until the kitchen queue changes
    pub async fn orders_changed(&mut self) -> AppResult<()> {
        self.orders_sub.changed().await
    }

    /// Suspend until the request list changes
    pub async fn requests_changed(&mut self) -> AppResult<()> {
        self.requests_sub.changed().await
    }

    /// Suspend until the cafe document changes
    pub async fn cafe_changed(&mut self) -> AppResult<()> {
        self.cafe_sub.changed().await
    }

    /// Move an order one step forward
    pub async fn advance(&self, order_id: &str, next: OrderStatus) -> AppResult<Order> {
        advance_status(&self.store, order_id, next).await
    }

    /// Dismiss a service request
    pub async fn acknowledge(&self, request_id: &str) -> AppResult<()> {
        requests::acknowledge(&self.store, request_id).await
    }
}
