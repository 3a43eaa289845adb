//! Order lifecycle
//!
//! - [`submit`] - the atomic cart-to-order transition
//! - [`status`] - staff-driven, forward-only status progression

pub mod status;
pub mod submit;

pub use status::advance_status;
pub use submit::{new_submission_token, submit_order};

use shared::models::Order;
use std::collections::HashMap;

/// Tables carrying more than one active order within a single occupancy
/// cycle: the signature of two customers submitting against the same
/// table concurrently. Surfaced on the dashboard, not rejected.
pub fn double_booked_tables(active_orders: &[Order]) -> Vec<String> {
    let mut cycles: HashMap<(&str, u64), u32> = HashMap::new();
    for order in active_orders {
        *cycles
            .entry((order.table_id.as_str(), order.occupancy_cycle))
            .or_default() += 1;
    }
    let mut tables: Vec<String> = cycles
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|((table, _), _)| table.to_string())
        .collect();
    tables.sort();
    tables.dedup();
    tables
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::OrderStatus;

    fn order(id: &str, table: &str, cycle: u64) -> Order {
        Order {
            id: id.into(),
            cafe_id: "c1".into(),
            table_id: table.into(),
            items: Vec::new(),
            total: 0.0,
            status: OrderStatus::Pending,
            created_at: String::new(),
            paid_at: None,
            occupancy_cycle: cycle,
        }
    }

    #[test]
    fn same_cycle_on_one_table_is_flagged() {
        let orders = vec![order("a", "T1", 1), order("b", "T1", 1), order("c", "T2", 1)];
        assert_eq!(double_booked_tables(&orders), vec!["T1".to_string()]);
    }

    #[test]
    fn successive_cycles_are_normal() {
        // A second round of ordering on the same table gets a fresh cycle.
        let orders = vec![order("a", "T1", 1), order("b", "T1", 3)];
        assert!(double_booked_tables(&orders).is_empty());
    }
}
