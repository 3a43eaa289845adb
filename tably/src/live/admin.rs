//! Platform admin console
//!
//! Lists every cafe on the platform and onboards new ones. The listing
//! is a standing query so a cafe created from another admin session
//! shows up without a refresh.

use crate::cafes::onboard_cafe;
use crate::store::{DocumentStore, Query, Subscription};
use shared::models::{collections, Cafe, CafeCreate};
use shared::AppResult;

/// Every cafe, newest first
pub fn all_cafes_query() -> Query {
    Query::collection(collections::CAFES).order_by_desc("createdAt")
}

pub struct AdminConsole {
    store: DocumentStore,
    cafes_sub: Subscription,
}

impl AdminConsole {
    pub fn open(store: &DocumentStore) -> Self {
        Self {
            store: store.clone(),
            cafes_sub: store.watch(all_cafes_query()),
        }
    }

    pub fn cafes(&self) -> Vec<Cafe> {
        self.cafes_sub.current_as()
    }

    pub async fn cafes_changed(&mut self) -> AppResult<()> {
        self.cafes_sub.changed().await
    }

    /// Onboard a cafe. The returned document carries the generated owner
    /// credentials, shown once to be handed to the owner.
    pub async fn onboard(&self, payload: &CafeCreate) -> AppResult<Cafe> {
        onboard_cafe(&self.store, payload).await
    }
}
