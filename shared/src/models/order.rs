//! Order model
//!
//! An order is an immutable-after-creation snapshot: line items and total
//! are frozen at submission time, so later menu edits or deletions never
//! retroactively alter historical orders. Only `status` and `paidAt` move.

use serde::{Deserialize, Serialize};

/// Order lifecycle status, forward-only
///
/// Wire strings are the original vocabulary; their lexical ordering is
/// what the dashboard's `status asc` kitchen-queue sort relies on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    #[serde(rename = "Ready for Delivery")]
    ReadyForDelivery,
    Paid,
}

impl OrderStatus {
    /// `Paid` is the terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Paid)
    }

    /// Whether a staff transition from `self` to `next` is legal.
    /// Status only moves forward; repeating the current status is a no-op
    /// the caller should reject.
    pub fn can_advance_to(&self, next: OrderStatus) -> bool {
        next > *self
    }

    /// Customer progress indicator: the 3-step scale shown while active.
    /// `Paid` renders as a distinct terminal screen, not step 4.
    pub fn progress_step(&self) -> Option<u8> {
        match self {
            Self::Pending => Some(1),
            Self::Preparing => Some(2),
            Self::ReadyForDelivery => Some(3),
            Self::Paid => None,
        }
    }

    /// Wire string for this status
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Preparing => "Preparing",
            Self::ReadyForDelivery => "Ready for Delivery",
            Self::Paid => "Paid",
        }
    }
}

/// Selected value(s) for one modifier group
///
/// Single-select (radio) carries one label, multi-select (checkbox) a
/// list. The owning group's declared kind decides the variant at
/// construction, so consumers never type-check the shape at runtime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Selection {
    Single(String),
    Multi(Vec<String>),
}

impl Selection {
    /// Human-readable rendering ("Oat milk" / "Almond, Vanilla")
    pub fn display(&self) -> String {
        match self {
            Self::Single(label) => label.clone(),
            Self::Multi(labels) => labels.join(", "),
        }
    }
}

/// One chosen customization, travelling with the order snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Customization {
    /// Originating modifier-group name ("Milk", "Extras", "Notes")
    pub modifier_name: String,
    pub selection: Selection,
    /// Cumulative price delta for this group's selection
    #[serde(default)]
    pub price_adjustment: f64,
}

impl Customization {
    /// Free-text notes fold in as a zero-delta pseudo-customization so
    /// they travel with the order snapshot.
    pub fn note(text: impl Into<String>) -> Self {
        Self {
            modifier_name: "Notes".to_string(),
            selection: Selection::Single(text.into()),
            price_adjustment: 0.0,
        }
    }
}

/// One frozen line of an order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    /// Source menu item id (informational only once frozen)
    pub id: String,
    pub name: String,
    pub quantity: u32,
    /// Effective unit price: base price + customization deltas
    pub price: f64,
    #[serde(default)]
    pub customizations: Vec<Customization>,
}

impl OrderLine {
    /// Line total: unit price × quantity
    pub fn line_total(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub cafe_id: String,
    pub table_id: String,
    pub items: Vec<OrderLine>,
    /// Computed at submission time, never recomputed
    pub total: f64,
    pub status: OrderStatus,
    /// Server-assigned RFC3339 timestamp
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<String>,
    /// Table-cell version produced by this order's submission; two active
    /// orders sharing a cycle landed in one occupancy window.
    #[serde(default)]
    pub occupancy_cycle: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_only_moves_forward() {
        use OrderStatus::*;
        assert!(Pending.can_advance_to(Preparing));
        assert!(Pending.can_advance_to(Paid));
        assert!(Preparing.can_advance_to(ReadyForDelivery));
        assert!(!Preparing.can_advance_to(Pending));
        assert!(!Paid.can_advance_to(ReadyForDelivery));
        assert!(!Paid.can_advance_to(Paid));
    }

    #[test]
    fn wire_strings_match_original_vocabulary() {
        let json = serde_json::to_string(&OrderStatus::ReadyForDelivery).unwrap();
        assert_eq!(json, "\"Ready for Delivery\"");
        let back: OrderStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, OrderStatus::ReadyForDelivery);
    }

    #[test]
    fn selection_shape_follows_group_kind() {
        let single = serde_json::to_value(Selection::Single("Oat milk".into())).unwrap();
        assert!(single.is_string());
        let multi =
            serde_json::to_value(Selection::Multi(vec!["Almond".into(), "Vanilla".into()]))
                .unwrap();
        assert!(multi.is_array());

        // The untagged representation reads both shapes back
        let parsed: Selection = serde_json::from_str("[\"A\",\"B\"]").unwrap();
        assert_eq!(parsed, Selection::Multi(vec!["A".into(), "B".into()]));
    }

    #[test]
    fn progress_steps() {
        assert_eq!(OrderStatus::Pending.progress_step(), Some(1));
        assert_eq!(OrderStatus::Preparing.progress_step(), Some(2));
        assert_eq!(OrderStatus::ReadyForDelivery.progress_step(), Some(3));
        assert_eq!(OrderStatus::Paid.progress_step(), None);
    }
}
