//! Latest-order tracking for the customer screen
//!
//! The customer view follows the newest order for their table. The raw
//! subscription yields "newest order or nothing"; this reducer turns
//! that into what the screen should show:
//!
//! - an active order is always adopted and tracked,
//! - a Paid delivery while an order was being tracked shows it one last
//!   time as complete (the "thank you" state), even if the order id
//!   changed under a coalesced delivery,
//! - a Paid order with nothing tracked (session start, or the complete
//!   screen already shown) clears the tracker, returning the customer
//!   to the plain menu,
//! - no order at all clears the tracker.
//!
//! A newer order superseding the tracked one is just the first case
//! again: adopt whatever is newest.

use shared::models::{Order, OrderStatus};

/// What the customer screen is currently following
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TrackedOrder {
    /// Nothing to show; plain menu
    #[default]
    None,
    /// In-flight order with its progress strip
    Active(Order),
    /// Just-paid order, shown once as complete
    Complete(Order),
}

impl TrackedOrder {
    pub fn order(&self) -> Option<&Order> {
        match self {
            TrackedOrder::None => None,
            TrackedOrder::Active(order) | TrackedOrder::Complete(order) => Some(order),
        }
    }
}

/// Fold one subscription delivery into the tracked state.
pub fn reduce(previous: &TrackedOrder, incoming: Option<Order>) -> TrackedOrder {
    match incoming {
        None => TrackedOrder::None,
        Some(order) if order.status != OrderStatus::Paid => TrackedOrder::Active(order),
        Some(order) => match previous {
            // We were following an in-flight order and the newest doc is
            // now Paid: show it complete exactly once. Deliveries
            // coalesce, so the ids may differ; the payment still belongs
            // to this seating.
            TrackedOrder::Active(_) => TrackedOrder::Complete(order),
            // First delivery of a session, or the complete screen was
            // already shown: history, not news.
            TrackedOrder::None | TrackedOrder::Complete(_) => TrackedOrder::None,
        },
    }
}
