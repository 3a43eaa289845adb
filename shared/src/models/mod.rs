//! Data models
//!
//! The documents persisted in the store's flat collections. Field names
//! stay camelCase on the wire so persisted documents read the same from
//! every client.

mod cafe;
mod menu_item;
mod order;
mod service_request;

pub use cafe::{Cafe, CafeCreate, TableCell, TableState, PENDING_OWNER};
pub use menu_item::{MenuItem, MenuItemCreate, MenuItemUpdate, ModifierGroup, ModifierOption, SelectionKind};
pub use order::{Customization, Order, OrderLine, OrderStatus, Selection};
pub use service_request::{RequestKind, RequestStatus, ServiceRequest};

/// Collection names in the document store
pub mod collections {
    pub const CAFES: &str = "cafes";
    pub const MENU_ITEMS: &str = "menuItems";
    pub const ORDERS: &str = "orders";
    pub const REQUESTS: &str = "requests";
    /// Idempotency records created alongside orders in the same batch
    pub const SUBMISSIONS: &str = "submissions";
}
