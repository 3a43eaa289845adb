//! Tably - QR-code table ordering for cafes
//!
//! Customers scan a per-table QR code, browse the live menu, and submit
//! orders; staff watch the kitchen queue, table grid and service
//! requests update in real time; a platform admin onboards cafes. All
//! state lives in a document store whose standing queries push full
//! result sets to every open session.
//!
//! # Layout
//!
//! - [`store`] - document store: queries, atomic batches, subscriptions
//! - [`session`] - QR entry-point parameters
//! - [`auth`] - identity provider seam, roles, login flows
//! - [`cart`] - the customer's local cart
//! - [`orders`] - submission protocol and status progression
//! - [`menu`], [`cafes`], [`requests`] - management and service surfaces
//! - [`live`] - role-specific live views (customer, dashboard, admin)
//! - [`analytics`] - paid-order rollups
//! - [`functions`] - server-side callables (bulk purge) and their router

pub mod analytics;
pub mod auth;
pub mod cafes;
pub mod cart;
pub mod functions;
pub mod live;
pub mod menu;
pub mod orders;
pub mod requests;
pub mod session;
pub mod store;
pub mod utils;
