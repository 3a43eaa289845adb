//! Server-side callables
//!
//! Work that must not run on a client: today, the bulk purge of old
//! orders and service requests. The logic is a plain async fn; the axum
//! router in [`http`] is a thin authenticated shell around it.

pub mod config;
pub mod http;
pub mod purge;

pub use config::Config;
pub use http::{router, FunctionsState};
pub use purge::{purge_old_data, PurgeOutcome, PurgeRequest, PURGE_BATCH_SIZE};
