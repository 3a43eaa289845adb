//! Live views
//!
//! The role-specific session objects clients drive. Each holds the
//! standing queries its screen renders from and the actions that screen
//! can take. State flows one way: actions write to the store, the
//! store's subscriptions deliver the new result sets back.

pub mod admin;
pub mod customer;
pub mod dashboard;
pub mod diff;
pub mod latest_order;

pub use admin::AdminConsole;
pub use customer::CustomerSession;
pub use dashboard::OwnerDashboard;
pub use diff::{diff_snapshots, Change};
pub use latest_order::TrackedOrder;
