//! Sales analytics
//!
//! Owner-facing rollup over completed orders. Computed on demand from
//! the paid-order set; nothing here is live.

use crate::store::{DocumentStore, Query};
use serde::Serialize;
use shared::models::{collections, Order, OrderStatus};
use std::collections::HashMap;

const TOP_ITEM_COUNT: usize = 5;

/// One row of the best-sellers list
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopItem {
    pub name: String,
    pub quantity: u32,
}

/// Rollup over every paid order of one cafe
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub revenue: f64,
    pub order_count: usize,
    pub top_items: Vec<TopItem>,
}

/// Every completed order of one cafe
pub fn paid_orders_query(cafe_id: &str) -> Query {
    Query::collection(collections::ORDERS)
        .where_eq("cafeId", cafe_id)
        .where_eq("status", OrderStatus::Paid.as_str())
}

/// Fold a set of paid orders into the summary. Quantities are summed by
/// item name so the same dish ordered with different customizations
/// counts as one best-seller.
pub fn summarize(paid: &[Order]) -> SalesSummary {
    let mut quantities: HashMap<&str, u32> = HashMap::new();
    let mut revenue = 0.0;
    for order in paid {
        revenue += order.total;
        for line in &order.items {
            *quantities.entry(line.name.as_str()).or_default() += line.quantity;
        }
    }

    let mut top: Vec<TopItem> = quantities
        .into_iter()
        .map(|(name, quantity)| TopItem {
            name: name.to_string(),
            quantity,
        })
        .collect();
    top.sort_by(|a, b| b.quantity.cmp(&a.quantity).then_with(|| a.name.cmp(&b.name)));
    top.truncate(TOP_ITEM_COUNT);

    SalesSummary {
        revenue,
        order_count: paid.len(),
        top_items: top,
    }
}

/// Query-and-fold convenience for the dashboard's analytics tab
pub async fn sales_summary(store: &DocumentStore, cafe_id: &str) -> SalesSummary {
    let paid: Vec<Order> = store
        .run_query(&paid_orders_query(cafe_id))
        .await
        .into_iter()
        .filter_map(|doc| serde_json::from_value(doc).ok())
        .collect();
    summarize(&paid)
}
