//! Live subscription handle

use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::{AppError, AppResult, ErrorCode};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Handle to one standing query
///
/// Holds the latest full result set; `changed()` suspends until the next
/// re-delivery. Dropping the handle cancels the backing task, which is
/// how views tear their queries down on unmount.
#[derive(Debug)]
pub struct Subscription {
    rx: watch::Receiver<Vec<Value>>,
    cancel: CancellationToken,
}

impl Subscription {
    pub(crate) fn new(rx: watch::Receiver<Vec<Value>>, cancel: CancellationToken) -> Self {
        Self { rx, cancel }
    }

    /// The latest delivered result set
    pub fn current(&self) -> Vec<Value> {
        self.rx.borrow().clone()
    }

    /// The latest result set deserialized into models. Documents that do
    /// not fit the model are logged and skipped rather than poisoning the
    /// whole result set.
    pub fn current_as<T: DeserializeOwned>(&self) -> Vec<T> {
        self.rx
            .borrow()
            .iter()
            .filter_map(|doc| match serde_json::from_value(doc.clone()) {
                Ok(model) => Some(model),
                Err(err) => {
                    tracing::warn!(%err, "skipping malformed document in result set");
                    None
                }
            })
            .collect()
    }

    /// Suspend until the next re-delivery
    pub async fn changed(&mut self) -> AppResult<()> {
        self.rx
            .changed()
            .await
            .map_err(|_| AppError::new(ErrorCode::SubscriptionClosed))
    }

    /// A raw receiver for consumers that reduce deliveries in their own task
    pub fn receiver(&self) -> watch::Receiver<Vec<Value>> {
        self.rx.clone()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
